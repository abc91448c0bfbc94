//! Matrix and vector types and basic operations.
//!
//! The sparse types ([`CscMatrix`], [`TripletMatrix`]) and the column-major
//! dense [`Matrix`] live here together with the supporting permutation and
//! scratch buffer types used by the factorization kernels.

mod csc;
pub use csc::*;
mod dense;
pub use dense::*;
mod error_types;
pub use error_types::*;
mod floats;
pub use floats::*;
mod growarray;
pub use growarray::*;
mod matrix_traits;
pub use matrix_traits::*;
mod permutation;
pub use permutation::*;
mod triplet;
pub use triplet::*;
mod vecmath;
pub use vecmath::*;

#[cfg(test)]
mod tests;
