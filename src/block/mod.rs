//! Dense decompositions on row-block-major matrices.
//!
//! Kernels take the backing [`BlockMatrix`] and a [`Submatrix`] view of it
//! as separate arguments.

mod core;
pub use self::core::*;
mod bidiagonal;
pub use bidiagonal::*;
pub(crate) mod householder;
mod qr;
pub use qr::*;
pub mod triangular;
