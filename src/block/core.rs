#![allow(non_snake_case)]

use crate::algebra::{FloatT, LinalgError, Matrix, ShapedMatrix};

/// Dense matrix stored in row-block-major order.
///
/// The matrix is partitioned into square blocks of size `block_length`.
/// Blocks are stored one block-row after another, and each block is
/// stored row major using its actual height and width, which are smaller
/// than `block_length` in the last block-row and block-column when the
/// dimensions are not multiples of the block length.
///
/// Element `(i,j)` lives at
/// ```text
/// bi*bl*n + bj*h*bl + (i%bl)*w + (j%bl)
/// ```
/// with `bi = i/bl`, `bj = j/bl`, `h` the height of block-row `bi` and
/// `w` the width of block-column `bj`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// edge length of a full block
    pub block_length: usize,
    /// data in row-block-major order
    pub data: Vec<T>,
}

/// A rectangular range `[row0,row1) x [col0,col1)` of a [`BlockMatrix`].
///
/// A view owns nothing.  Kernels receive the backing matrix and the view
/// separately, and all indices passed alongside a view are relative to
/// `(row0, col0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submatrix {
    pub row0: usize,
    pub row1: usize,
    pub col0: usize,
    pub col1: usize,
}

impl Submatrix {
    pub fn new(row0: usize, row1: usize, col0: usize, col1: usize) -> Self {
        Self {
            row0,
            row1,
            col0,
            col1,
        }
    }

    /// View covering the whole of `A`
    pub fn full<T>(A: &BlockMatrix<T>) -> Self {
        Self::new(0, A.m, 0, A.n)
    }

    pub fn rows(&self) -> usize {
        self.row1 - self.row0
    }

    pub fn cols(&self) -> usize {
        self.col1 - self.col0
    }

    /// Fails unless the view is a well formed range inside `A`
    pub fn check_within<T>(&self, A: &BlockMatrix<T>) -> Result<(), LinalgError> {
        if self.row0 > self.row1 || self.col0 > self.col1 || self.row1 > A.m || self.col1 > A.n {
            return Err(LinalgError::InvalidArgument("submatrix exceeds the backing matrix"));
        }
        Ok(())
    }
}

impl<T> ShapedMatrix for BlockMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

impl<T> BlockMatrix<T>
where
    T: FloatT,
{
    /// `m` x `n` matrix of zeros
    ///
    /// # Panics
    /// Panics if `block_length` is zero.  See [`try_new`](Self::try_new)
    /// for a fallible version.
    pub fn new(m: usize, n: usize, block_length: usize) -> Self {
        assert!(block_length > 0, "block length must be positive");
        Self {
            m,
            n,
            block_length,
            data: vec![T::zero(); m * n],
        }
    }

    /// `m` x `n` matrix of zeros, failing if `block_length` is zero
    pub fn try_new(m: usize, n: usize, block_length: usize) -> Result<Self, LinalgError> {
        if block_length == 0 {
            return Err(LinalgError::InvalidArgument("block length must be positive"));
        }
        Ok(Self::new(m, n, block_length))
    }

    /// # Panics
    /// Panics if `block_length` is zero.
    pub fn zeros(size: (usize, usize), block_length: usize) -> Self {
        Self::new(size.0, size.1, block_length)
    }

    /// # Panics
    /// Panics if `block_length` is zero.
    pub fn identity(n: usize, block_length: usize) -> Self {
        let mut A = Self::new(n, n, block_length);
        A.set_identity();
        A
    }

    pub fn set_identity(&mut self) {
        self.data.fill(T::zero());
        for i in 0..usize::min(self.m, self.n) {
            self.set(i, i, T::one());
        }
    }

    /// Position of element `(i,j)` in `data`
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.m && j < self.n);
        let bl = self.block_length;
        let (bi, bj) = (i / bl, j / bl);
        let h = usize::min(bl, self.m - bi * bl);
        let w = usize::min(bl, self.n - bj * bl);
        bi * bl * self.n + bj * h * bl + (i % bl) * w + (j % bl)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[self.index(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, v: T) {
        let idx = self.index(i, j);
        self.data[idx] = v;
    }

    #[inline]
    pub(crate) fn sub(&mut self, i: usize, j: usize, v: T) {
        let idx = self.index(i, j);
        self.data[idx] -= v;
    }

    pub fn from_dense(A: &Matrix<T>, block_length: usize) -> Self {
        let mut B = Self::new(A.m, A.n, block_length);
        for j in 0..A.n {
            for i in 0..A.m {
                B.set(i, j, A[(i, j)]);
            }
        }
        B
    }

    pub fn to_dense(&self) -> Matrix<T> {
        let mut D = Matrix::zeros((self.m, self.n));
        for j in 0..self.n {
            for i in 0..self.m {
                D[(i, j)] = self.get(i, j);
            }
        }
        D
    }

    /// Copies the range `view` of `self` into `dst`, with its upper left
    /// corner placed at `(row0, col0)`.
    pub fn extract(
        &self,
        view: Submatrix,
        dst: &mut BlockMatrix<T>,
        row0: usize,
        col0: usize,
    ) -> Result<(), LinalgError> {
        view.check_within(self)?;
        Submatrix::new(row0, row0 + view.rows(), col0, col0 + view.cols()).check_within(dst)?;

        for i in 0..view.rows() {
            for j in 0..view.cols() {
                dst.set(row0 + i, col0 + j, self.get(view.row0 + i, view.col0 + j));
            }
        }
        Ok(())
    }

    /// Computes `self*B`, block by block.
    pub fn mul(&self, B: &BlockMatrix<T>) -> Result<BlockMatrix<T>, LinalgError> {
        if self.block_length != B.block_length {
            return Err(LinalgError::IncompatibleBlockLength);
        }
        if self.n != B.m {
            return Err(LinalgError::IncompatibleDimension);
        }
        let bl = self.block_length;
        let mut C = BlockMatrix::new(self.m, B.n, bl);

        for i0 in (0..self.m).step_by(bl) {
            let i1 = usize::min(i0 + bl, self.m);
            for j0 in (0..B.n).step_by(bl) {
                let j1 = usize::min(j0 + bl, B.n);
                for k0 in (0..self.n).step_by(bl) {
                    let k1 = usize::min(k0 + bl, self.n);
                    // C(i,j) += A(i,k)*B(k,j) on one block triple
                    for i in i0..i1 {
                        for j in j0..j1 {
                            let mut total = T::zero();
                            for k in k0..k1 {
                                total += self.get(i, k) * B.get(k, j);
                            }
                            let idx = C.index(i, j);
                            C.data[idx] += total;
                        }
                    }
                }
            }
        }
        Ok(C)
    }
}
