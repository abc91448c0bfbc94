use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by sparse matrix format checks.
pub enum SparseFormatError {
    /// Matrix dimension fields and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// Data is not sorted by row index within each column
    #[error("Data is not sorted by row index within each column")]
    BadRowOrdering,
    #[error("Row value exceeds the matrix row dimension")]
    /// Row value exceeds the matrix row dimension
    BadRowval,
    #[error("Bad column pointer values")]
    /// Matrix column pointer values are defective
    BadColptr,
}

/// Error type returned by factorizations, solvers and matrix kernels
/// when a precondition is violated.
///
/// Numerical breakdown of a factorization (a non-positive Cholesky pivot,
/// a singular LU or QR) is __not__ an error.  It is reported by a `false`
/// return from `decompose` / `set_a`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinalgError {
    /// Matrix dimensions are incompatible for the requested operation
    #[error("Matrix dimensions are incompatible")]
    IncompatibleDimension,
    /// Block matrices jointly operated on have different block lengths
    #[error("All block matrices must have the same block length")]
    IncompatibleBlockLength,
    /// Generic precondition violation
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A locked factorization was given a matrix with another pattern
    #[error("Sparsity pattern differs from the locked structure")]
    SparsityMismatch,
    /// Permutation vector is not a bijection
    #[error("Invalid permutation vector")]
    InvalidPermutation,
    /// Malformed sparse input
    #[error("Malformed sparse matrix: {0}")]
    SparseFormat(#[from] SparseFormatError),
}
