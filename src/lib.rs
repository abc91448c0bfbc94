//! __blocksparse__ is a numerical linear-algebra engine providing
//!
//! * sparse factorizations over compressed sparse column (CSC) matrices:
//!   up-looking Cholesky, LU with threshold partial pivoting and
//!   left-looking Householder QR,
//! * fill-reducing permutations (none, identity, seeded random, AMD)
//!   applied before factorization,
//! * dense Householder kernels over row-block-major matrices: QR and
//!   the outer-block bidiagonalization step,
//! * solver objects binding a decomposition to right-hand sides, with
//!   reusable scratch buffers.
//!
//! All kernels are single threaded and synchronous.
//!
//! __Example usage__ : solve a small symmetric positive definite system
//!
//! ```no_run
//! use blocksparse::algebra::*;
//! use blocksparse::solvers::*;
//!
//! // A = diag(4, 9, 16)
//! let A = CscMatrix::new(
//!     3,
//!     3,
//!     vec![0, 1, 2, 3],
//!     vec![0, 1, 2],
//!     vec![4., 9., 16.],
//! );
//!
//! let mut solver = SparseCholeskySolver::<f64>::new(SolverSettings::default());
//! assert!(solver.set_a(&A).unwrap());
//!
//! let B = Matrix::<f64>::identity(3);
//! let mut X = Matrix::<f64>::zeros((3, 3));
//! solver.solve(&B, &mut X).unwrap();
//! ```
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

pub mod algebra;
pub mod block;
pub mod fillreduce;
pub mod sparse;
pub mod solvers;

#[cfg(feature = "serde")]
pub mod io;
