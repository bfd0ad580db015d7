//! Edge-weight tables.
//!
//! Provides the immutable symmetric distance matrix every ant reads.

mod matrix;

pub use matrix::DistanceMatrix;
