#![allow(non_snake_case)]

use crate::algebra::*;
use std::iter::zip;

impl<T: FloatT> CscMatrix<T> {
    /// BLAS-like matrix-vector product `y = a*A*x + b*y`
    ///
    /// # Panics
    /// Panics if `x` or `y` are incompatible with the dimensions of `A`.
    pub fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        _csc_axpby_N(self, y, x, a, b);
    }

    /// BLAS-like transposed product `y = a*Aᵀ*x + b*y`
    pub fn gemv_t(&self, y: &mut [T], x: &[T], a: T, b: T) {
        _csc_axpby_T(self, y, x, a, b);
    }

    /// Dense product `C = a*A*B + b*C`, one column at a time
    pub fn mul_dense(&self, C: &mut Matrix<T>, B: &Matrix<T>, a: T, b: T) {
        assert!(self.n == B.m && C.m == self.m && C.n == B.n);
        for j in 0..B.n {
            self.gemv(C.col_slice_mut(j), B.col_slice(j), a, b);
        }
    }

    /// Allocates the transpose `Aᵀ`.  Row indices of the result are sorted.
    pub fn transpose(&self) -> Self {
        let nnz = self.nnz();
        let mut colptr = vec![0; self.m + 1];
        let mut rowval = vec![0; nnz];
        let mut nzval = vec![T::zero(); nnz];

        // row counts of A become the column counts of Aᵀ
        let mut next = vec![0; self.m];
        for &r in &self.rowval[0..nnz] {
            next[r] += 1;
        }
        cumsum(&mut colptr, &mut next);

        for col in 0..self.n {
            for p in self.colptr[col]..self.colptr[col + 1] {
                let q = next[self.rowval[p]];
                next[self.rowval[p]] += 1;
                rowval[q] = col;
                nzval[q] = self.nzval[p];
            }
        }
        CscMatrix::new(self.n, self.m, colptr, rowval, nzval)
    }

    /// Sparse product `A*B`.  Row indices of the result are sorted.
    pub fn mul(&self, B: &CscMatrix<T>) -> Result<CscMatrix<T>, LinalgError> {
        if self.n != B.m {
            return Err(LinalgError::IncompatibleDimension);
        }
        Ok(_csc_mul(self, B))
    }

    /// Compares two matrices entry by entry.  Entries missing from one
    /// matrix are treated as zero, so structural zeros do not matter.
    pub fn is_equals(&self, B: &CscMatrix<T>, tol: T) -> bool {
        if self.m != B.m || self.n != B.n {
            return false;
        }
        let mut x = vec![T::zero(); self.m];
        for col in 0..self.n {
            for p in self.colptr[col]..self.colptr[col + 1] {
                x[self.rowval[p]] += self.nzval[p];
            }
            for p in B.colptr[col]..B.colptr[col + 1] {
                x[B.rowval[p]] -= B.nzval[p];
            }
            // checks and clears the touched entries
            for p in self.colptr[col]..self.colptr[col + 1] {
                if T::abs(x[self.rowval[p]]) > tol {
                    return false;
                }
                x[self.rowval[p]] = T::zero();
            }
            for p in B.colptr[col]..B.colptr[col + 1] {
                if T::abs(x[B.rowval[p]]) > tol {
                    return false;
                }
                x[B.rowval[p]] = T::zero();
            }
        }
        true
    }
}

/// Writes the prefix sums of `counts` into `colptr` and overwrites
/// `counts` with the column starts, ready to be used as insertion cursors.
pub(crate) fn cumsum(colptr: &mut [usize], counts: &mut [usize]) {
    debug_assert_eq!(colptr.len(), counts.len() + 1);
    colptr[0] = 0;
    let mut acc = 0;
    for (cp, c) in zip(&mut colptr[1..], counts.iter_mut()) {
        let ci = *c;
        *c = acc;
        acc += ci;
        *cp = acc;
    }
}

// sparse product without dimension checks
pub(crate) fn _csc_mul<T: FloatT>(A: &CscMatrix<T>, B: &CscMatrix<T>) -> CscMatrix<T> {
    let (m, n) = (A.m, B.n);

    let mut colptr = vec![0; n + 1];
    let mut rowval = Vec::with_capacity(A.nnz() + B.nnz());
    let mut nzval = Vec::with_capacity(A.nnz() + B.nnz());

    // dense accumulator with a stamp marking live rows of column j
    let mut w = vec![NONE; m];
    let mut x = vec![T::zero(); m];

    for j in 0..n {
        let start = rowval.len();
        for p in B.colptr[j]..B.colptr[j + 1] {
            let k = B.rowval[p];
            let bkj = B.nzval[p];
            for q in A.colptr[k]..A.colptr[k + 1] {
                let i = A.rowval[q];
                if w[i] != j {
                    w[i] = j;
                    rowval.push(i);
                    x[i] = A.nzval[q] * bkj;
                } else {
                    x[i] += A.nzval[q] * bkj;
                }
            }
        }
        rowval[start..].sort_unstable();
        nzval.extend(rowval[start..].iter().map(|&i| x[i]));
        colptr[j + 1] = rowval.len();
    }
    CscMatrix::new(m, n, colptr, rowval, nzval)
}

#[allow(non_snake_case)]
fn _csc_axpby_N<T: FloatT>(A: &CscMatrix<T>, y: &mut [T], x: &[T], a: T, b: T) {
    //first do the b*y part
    if b == T::zero() {
        y.fill(T::zero());
    } else if b == T::one() {
    } else if b == -T::one() {
        y.negate();
    } else {
        y.scale(b);
    }

    // if a is zero, we're done
    if a == T::zero() {
        return;
    }

    assert_eq!(x.len(), A.n);
    assert_eq!(y.len(), A.m);

    //y += A*x
    for (j, &xj) in x.iter().enumerate() {
        let ax = a * xj;
        for i in A.colptr[j]..A.colptr[j + 1] {
            y[A.rowval[i]] += A.nzval[i] * ax;
        }
    }
}

#[allow(non_snake_case)]
fn _csc_axpby_T<T: FloatT>(A: &CscMatrix<T>, y: &mut [T], x: &[T], a: T, b: T) {
    if b == T::zero() {
        y.fill(T::zero());
    } else if b != T::one() {
        y.scale(b);
    }

    if a == T::zero() {
        return;
    }

    assert_eq!(x.len(), A.m);
    assert_eq!(y.len(), A.n);

    //y += A'*x
    for (j, yj) in y.iter_mut().enumerate() {
        let rng = A.colptr[j]..A.colptr[j + 1];
        let dot = zip(&A.rowval[rng.clone()], &A.nzval[rng])
            .fold(T::zero(), |acc, (&i, &v)| acc + v * x[i]);
        *yj += a * dot;
    }
}
