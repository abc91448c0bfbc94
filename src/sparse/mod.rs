//! Sparse direct decompositions of [`CscMatrix`](crate::algebra::CscMatrix) data.
//!
//! Each decomposition owns a fill-reducing permutation binding and its
//! workspaces.  The numeric phases work on the permuted copy of the input.
//! After a successful `decompose` the factors have sorted row indices.

use crate::algebra::{FloatT, SparsityPattern};

mod etree;
pub mod householder;
pub mod triangular;

mod cholesky;
pub use cholesky::*;
mod lu;
pub use lu::*;
mod qr;
pub use qr::*;

// product of |d[i]| / max|d| over a factor diagonal
fn diagonal_quality<T: FloatT>(diag: impl Iterator<Item = T> + Clone) -> T {
    let max = diag.clone().fold(T::zero(), |m, d| T::max(m, T::abs(d)));
    if max == T::zero() {
        return T::zero();
    }
    diag.fold(T::one(), |q, d| q * T::abs(d) / max)
}

// structure of the matrix a symbolic analysis was computed for
#[derive(Debug, Clone)]
struct AnalysedPattern {
    m: usize,
    n: usize,
    colptr: Vec<usize>,
    rowval: Vec<usize>,
}

impl AnalysedPattern {
    fn new(p: SparsityPattern<'_>) -> Self {
        Self {
            m: p.m,
            n: p.n,
            colptr: p.colptr.to_vec(),
            rowval: p.rowval[..p.nnz()].to_vec(),
        }
    }

    fn matches(&self, p: SparsityPattern<'_>) -> bool {
        self.m == p.m && self.n == p.n && self.colptr == p.colptr && self.rowval == p.rowval[..p.nnz()]
    }
}
