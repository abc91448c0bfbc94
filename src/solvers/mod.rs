//! Solver objects binding a decomposition to right-hand sides.
//!
//! The sparse solvers share [`SolverSettings`] and implement
//! [`SparseLinearSolver`].  Each owns its decomposition and reusable
//! scratch space, so repeated solves against systems of one size do not
//! allocate.

mod block_qr;
mod cholesky;
mod lu;
mod qr;
mod settings;
mod traits;

pub use block_qr::*;
pub use cholesky::*;
pub use lu::*;
pub use qr::*;
pub use settings::*;
pub use traits::*;
