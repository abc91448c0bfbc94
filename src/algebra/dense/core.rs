#![allow(non_snake_case)]

use crate::algebra::{FloatT, ShapedMatrix};
use std::ops::{Index, IndexMut};

/// Dense matrix in column major format
///
/// Used as the right-hand side and solution type of the sparse solvers,
/// and as the common conversion target of the sparse and block types.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// vector of data in column major format
    pub data: Vec<T>,
}

impl<T> ShapedMatrix for Matrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

impl<T> Matrix<T>
where
    T: FloatT,
{
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let data = vec![T::zero(); m * n];
        Self { m, n, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        mat.set_identity();
        mat
    }

    pub fn set_identity(&mut self) {
        self.data.fill(T::zero());
        for i in 0..usize::min(self.m, self.n) {
            self[(i, i)] = T::one();
        }
    }

    /// Creates a matrix from a column major data slice
    ///
    /// # Panics
    /// Panics if the slice length is not `m*n`
    pub fn new_from_slice(size: (usize, usize), src: &[T]) -> Self {
        let (m, n) = size;
        assert_eq!(src.len(), m * n);
        Self {
            m,
            n,
            data: src.to_vec(),
        }
    }

    #[inline]
    pub fn index_linear(&self, idx: (usize, usize)) -> usize {
        idx.0 + self.m * idx.1
    }

    pub fn col_slice(&self, col: usize) -> &[T] {
        assert!(col < self.n);
        &self.data[(col * self.m)..(col + 1) * self.m]
    }

    pub fn col_slice_mut(&mut self, col: usize) -> &mut [T] {
        assert!(col < self.n);
        &mut self.data[(col * self.m)..(col + 1) * self.m]
    }

    /// transposed copy
    pub fn transpose(&self) -> Self {
        let mut out = Matrix::zeros((self.n, self.m));
        for c in 0..self.n {
            for r in 0..self.m {
                out[(c, r)] = self[(r, c)];
            }
        }
        out
    }

    /// implements self = C = αA*B + βC
    ///
    /// # Panics
    /// Panics if dimensions are incompatible
    pub fn mul(&mut self, A: &Matrix<T>, B: &Matrix<T>, α: T, β: T) -> &Self {
        assert!(A.n == B.m && self.m == A.m && self.n == B.n);

        for j in 0..B.n {
            let C = self.col_slice_mut(j);
            C.iter_mut().for_each(|c| *c *= β);
            for k in 0..A.n {
                let bkj = α * B[(k, j)];
                if bkj == T::zero() {
                    continue;
                }
                for (c, &a) in C.iter_mut().zip(A.col_slice(k)) {
                    *c += a * bkj;
                }
            }
        }
        self
    }
}

impl<T> Index<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &T {
        &self.data[self.index_linear(idx)]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut T {
        let lidx = self.index_linear(idx);
        &mut self.data[lidx]
    }
}

// row-major literal construction, i.e. Matrix::from(&[[1., 2.], [3., 4.]])
impl<T, const M: usize, const N: usize> From<&[[T; N]; M]> for Matrix<T>
where
    T: FloatT,
{
    fn from(rows: &[[T; N]; M]) -> Self {
        let mut mat = Matrix::zeros((M, N));
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                mat[(r, c)] = v;
            }
        }
        mat
    }
}
