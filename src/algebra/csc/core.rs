#![allow(non_snake_case)]

use crate::algebra::{FloatT, LinalgError, Matrix, ShapedMatrix, SparseFormatError};

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Sparse matrix in standard Compressed Sparse Column (CSC) format
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```no_run
/// use blocksparse::algebra::CscMatrix;
///
/// let A : CscMatrix<f64> = CscMatrix::new(
///    3,                                // m
///    3,                                // n
///    vec![0, 2, 4, 7],                 //colptr
///    vec![0, 1, 0, 2, 0, 1, 2],        //rowval
///    vec![1., 2., 3., 4., 5., 6., 7.], //nzval
///  );
///
/// // optional correctness check
/// assert!(A.check_format().is_ok());
///
/// ```
///
/// The factorizations in this crate require that row indices within
/// each column are sorted and unique.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct CscMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSC format column pointer.
    ///
    /// Ths field should have length `n+1`. The last entry corresponds
    /// to the the number of nonzeros and should agree with the lengths
    /// of the `rowval` and `nzval` fields.
    pub colptr: Vec<usize>,
    /// vector of row indices
    pub rowval: Vec<usize>,
    /// vector of non-zero matrix elements
    pub nzval: Vec<T>,
}

/// Borrowed structural part of a sparse matrix.
///
/// Fill-reducing orderings and symbolic analysis depend only on the
/// position of the nonzeros, never on their values.
#[derive(Debug, Clone, Copy)]
pub struct SparsityPattern<'a> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// column pointer of length `n+1`
    pub colptr: &'a [usize],
    /// row indices of length `colptr[n]`
    pub rowval: &'a [usize],
}

impl SparsityPattern<'_> {
    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    /// Checks the array lengths and index bounds of the pattern
    pub fn check(&self) -> Result<(), LinalgError> {
        if self.colptr.len() != self.n + 1 || self.colptr[self.n] > self.rowval.len() {
            return Err(LinalgError::InvalidArgument(
                "pattern arrays are inconsistent with the matrix dimensions",
            ));
        }
        if self.colptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr.into());
        }
        if self.rowval[..self.nnz()].iter().any(|&r| r >= self.m) {
            return Err(SparseFormatError::BadRowval.into());
        }
        Ok(())
    }

    /// Row indices stored in column `col`
    pub fn column(&self, col: usize) -> &[usize] {
        &self.rowval[self.colptr[col]..self.colptr[col + 1]]
    }
}

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// `CscMatrix` constructor.
    ///
    /// # Panics
    /// Makes rudimentary dimensional compatibility checks and panics on
    /// failure.   This constructor does __not__
    /// ensure that rows indices are all in bounds or that data is arranged
    /// such that entries within each column appear in order of increasing
    /// row index.   Responsibility for ensuring these conditions hold
    /// is left to the caller.
    ///
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(rowval.len(), nzval.len());
        assert_eq!(colptr.len(), n + 1);
        assert_eq!(colptr[n], rowval.len());
        CscMatrix {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// allocate space for a sparse matrix with `nnz` elements
    ///
    /// To make an m x n matrix of zeros, use
    /// ```no_run
    /// use blocksparse::algebra::CscMatrix;
    /// let A : CscMatrix<f64> = CscMatrix::spalloc((3, 4), 0);
    /// ```
    pub fn spalloc(size: (usize, usize), nnz: usize) -> Self {
        let (m, n) = size;
        let mut colptr = vec![0; n + 1];
        let rowval = vec![0; nnz];
        let nzval = vec![T::zero(); nnz];
        colptr[n] = nnz;

        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    /// Sparse matrix of zeros of size `m` x `n`
    pub fn zeros(size: (usize, usize)) -> Self {
        Self::spalloc(size, 0)
    }

    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        let colptr = (0usize..=n).collect();
        let rowval = (0usize..n).collect();
        let nzval = vec![T::one(); n];

        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// Square matrix with the given diagonal
    pub fn from_diag(d: &[T]) -> Self {
        let n = d.len();
        CscMatrix::new(
            n,
            n,
            (0usize..=n).collect(),
            (0usize..n).collect(),
            d.to_vec(),
        )
    }

    /// number of nonzeros
    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    /// structural view of the matrix
    pub fn pattern(&self) -> SparsityPattern<'_> {
        SparsityPattern {
            m: self.m,
            n: self.n,
            colptr: &self.colptr,
            rowval: &self.rowval,
        }
    }

    /// Check that matrix data is correctly formatted.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.rowval.len() != self.nzval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        if self.colptr.is_empty()
            || (self.colptr.len() - 1) != self.n
            || self.colptr[self.n] != self.rowval.len()
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        //check for colptr monotonicity
        if self.colptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr);
        }

        //check for rowval monotonicity within each column
        for col in 0..self.n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            if self.rowval[rng].windows(2).any(|c| c[0] >= c[1]) {
                return Err(SparseFormatError::BadRowOrdering);
            }
        }
        //check for row values out of bounds
        if !self.rowval.iter().all(|r| r < &self.m) {
            return Err(SparseFormatError::BadRowval);
        }

        Ok(())
    }

    /// True if the matrix is upper triangular
    pub fn is_triu(&self) -> bool {
        // check lower triangle for any structural entries, regardless
        // of the values that may be assigned to them
        (0..self.n).all(|col| {
            let rows = &self.rowval[self.colptr[col]..self.colptr[col + 1]];
            rows.iter().all(|&row| row <= col)
        })
    }

    /// Allocates a new matrix containing only entries from the upper triangular part
    pub fn to_triu(&self) -> Self {
        let mut colptr = vec![0; self.n + 1];
        let mut rowval = Vec::with_capacity(self.nnz());
        let mut nzval = Vec::with_capacity(self.nnz());

        for col in 0..self.n {
            for p in self.colptr[col]..self.colptr[col + 1] {
                if self.rowval[p] <= col {
                    rowval.push(self.rowval[p]);
                    nzval.push(self.nzval[p]);
                }
            }
            colptr[col + 1] = rowval.len();
        }
        CscMatrix::new(self.m, self.n, colptr, rowval, nzval)
    }

    /// Returns the value at the given (row,col) index as an Option.
    /// Returns None if the given index is not a structural nonzero.
    ///
    /// # Panics
    /// Panics if the given index is out of bounds.
    pub fn get_entry(&self, idx: (usize, usize)) -> Option<T> {
        let (row, col) = idx;
        assert!(row < self.nrows() && col < self.ncols());

        let first = self.colptr[col];
        let last = self.colptr[col + 1];
        let rows_in_this_column = &self.rowval[first..last];
        match rows_in_this_column.binary_search(&row) {
            Ok(idx) => Some(self.nzval[first + idx]),
            Err(_) => None,
        }
    }

    /// Value at (row,col), with zero for structural zeros
    pub fn get(&self, row: usize, col: usize) -> T {
        self.get_entry((row, col)).unwrap_or(T::zero())
    }

    /// Diagonal entries as a dense vector
    pub fn diag(&self) -> Vec<T> {
        (0..usize::min(self.m, self.n))
            .map(|i| self.get(i, i))
            .collect()
    }

    /// Creates a sparse matrix from the nonzero entries of a dense one
    pub fn from_dense(A: &Matrix<T>) -> Self {
        let mut colptr = vec![0; A.n + 1];
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();
        for col in 0..A.n {
            for (row, &v) in A.col_slice(col).iter().enumerate() {
                if v != T::zero() {
                    rowval.push(row);
                    nzval.push(v);
                }
            }
            colptr[col + 1] = rowval.len();
        }
        CscMatrix::new(A.m, A.n, colptr, rowval, nzval)
    }

    /// Dense copy of the matrix.  Duplicate entries are summed.
    pub fn to_dense(&self) -> Matrix<T> {
        let mut D = Matrix::zeros((self.m, self.n));
        for col in 0..self.n {
            for p in self.colptr[col]..self.colptr[col + 1] {
                D[(self.rowval[p], col)] += self.nzval[p];
            }
        }
        D
    }
}

impl<T> ShapedMatrix for CscMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

#[test]
fn test_csc_get_entry() {
    // A =
    //[ ⋅   4.0    ⋅    ⋅   12.0]
    //[1.0  5.0    ⋅    ⋅     ⋅ ]
    //[ ⋅   6.0    ⋅    ⋅   13.0]
    //[2.0  7.0  10.0   ⋅     ⋅ ]
    //[ ⋅   8.0  11.0   ⋅   14.0]
    //[3.0  9.0    ⋅    ⋅     ⋅ ]

    let A = CscMatrix::new(
        6,                                                                 // m
        5,                                                                 // n
        vec![0, 3, 9, 11, 11, 14],                                         // colptr
        vec![1, 3, 5, 0, 1, 2, 3, 4, 5, 3, 4, 0, 2, 4],                    // rowval
        vec![1., 2., 3., 4., 5., 6., 7., 8., 9., 10., 11., 12., 13., 14.], // nzval
    );

    assert_eq!(A.get_entry((1, 0)).unwrap(), 1.);
    assert_eq!(A.get_entry((5, 0)).unwrap(), 3.);
    assert_eq!(A.get_entry((0, 1)).unwrap(), 4.);
    assert_eq!(A.get_entry((3, 1)).unwrap(), 7.);
    assert_eq!(A.get_entry((4, 2)).unwrap(), 11.);
    assert_eq!(A.get_entry((4, 4)).unwrap(), 14.);

    assert!(A.get_entry((0, 0)).is_none());
    assert!(A.get_entry((2, 2)).is_none());
    assert!(A.get_entry((1, 3)).is_none());
    assert!(A.get_entry((3, 4)).is_none());

    assert!(A.check_format().is_ok());
    assert!(A.pattern().check().is_ok());
    assert_eq!(A.pattern().column(2), &[3, 4]);
}
