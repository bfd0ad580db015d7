//! Domain model types.
//!
//! A tour is an ordered permutation of every node, implicitly closed, kept
//! together with its length so the pair can never drift apart.

mod tour;

pub use tour::TourRecord;
pub(crate) use tour::check_permutation;
