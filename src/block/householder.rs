#![allow(non_snake_case)]

//! Householder reflector kernels on block matrices.
//!
//! A reflector is `H = I - γ u uᵀ` where the leading element of `u` is an
//! implicit 1.  The remaining elements of `u` are stored in place of the
//! entries they eliminate.  Column reflectors store `u` below the
//! diagonal of column `i`, row reflectors store it to the right of the
//! superdiagonal of row `i`.  All indices are relative to the view `Y`.

use super::{BlockMatrix, Submatrix};
use crate::algebra::FloatT;
use std::ops::Range;

/// Largest absolute value in column `i` of `Y`, rows `i..`
pub(crate) fn find_max_col<T: FloatT>(A: &BlockMatrix<T>, Y: Submatrix, i: usize) -> T {
    (i..Y.rows()).fold(T::zero(), |m, r| T::max(m, T::abs(A.get(Y.row0 + r, Y.col0 + i))))
}

/// Largest absolute value in row `i` of `Y`, columns `col_start..`
pub(crate) fn find_max_row<T: FloatT>(
    A: &BlockMatrix<T>,
    Y: Submatrix,
    i: usize,
    col_start: usize,
) -> T {
    (col_start..Y.cols()).fold(T::zero(), |m, c| T::max(m, T::abs(A.get(Y.row0 + i, Y.col0 + c))))
}

/// Computes the column reflector eliminating `Y(i+1.., i)`.
///
/// On return `Y(i,i)` holds the new diagonal value, `Y(i+1.., i)` the
/// reflector and `gamma[Y.col0 + i]` its scalar.  Returns false if the
/// column segment is entirely zero.
pub(crate) fn compute_householder_col<T: FloatT>(
    A: &mut BlockMatrix<T>,
    Y: Submatrix,
    gamma: &mut [T],
    i: usize,
) -> bool {
    let max = find_max_col(A, Y, i);
    if max == T::zero() {
        return false;
    }
    let (r0, c) = (Y.row0, Y.col0 + i);

    // scale by max to avoid overflow in the norm
    let mut norm = T::zero();
    for r in i..Y.rows() {
        let v = A.get(r0 + r, c) / max;
        A.set(r0 + r, c, v);
        norm += v * v;
    }
    let mut tau = norm.sqrt();
    let x0 = A.get(r0 + i, c);
    if x0 < T::zero() {
        tau = -tau;
    }

    let u0 = x0 + tau;
    for r in (i + 1)..Y.rows() {
        let v = A.get(r0 + r, c) / u0;
        A.set(r0 + r, c, v);
    }
    gamma[c] = u0 / tau;
    A.set(r0 + i, c, -tau * max);
    true
}

/// Computes the row reflector eliminating `Y(i, i+2..)`.
///
/// On return `Y(i,i+1)` holds the new superdiagonal value, `Y(i, i+2..)`
/// the reflector and `gamma[Y.row0 + i]` its scalar.  Returns false if
/// the row segment is entirely zero.
pub(crate) fn compute_householder_row<T: FloatT>(
    A: &mut BlockMatrix<T>,
    Y: Submatrix,
    gamma: &mut [T],
    i: usize,
) -> bool {
    let max = find_max_row(A, Y, i, i + 1);
    if max == T::zero() {
        return false;
    }
    let (r, c0) = (Y.row0 + i, Y.col0);

    let mut norm = T::zero();
    for c in (i + 1)..Y.cols() {
        let v = A.get(r, c0 + c) / max;
        A.set(r, c0 + c, v);
        norm += v * v;
    }
    let mut tau = norm.sqrt();
    let x0 = A.get(r, c0 + i + 1);
    if x0 < T::zero() {
        tau = -tau;
    }

    let u0 = x0 + tau;
    for c in (i + 2)..Y.cols() {
        let v = A.get(r, c0 + c) / u0;
        A.set(r, c0 + c, v);
    }
    gamma[Y.row0 + i] = u0 / tau;
    A.set(r, c0 + i + 1, -tau * max);
    true
}

/// `uᵀ Y(:,j)` where `u` is the column reflector stored in column `col`
pub(crate) fn inner_prod_col<T: FloatT>(A: &BlockMatrix<T>, Y: Submatrix, col: usize, j: usize) -> T {
    let (r0, c0) = (Y.row0, Y.col0);
    let mut total = A.get(r0 + col, c0 + j);
    for r in (col + 1)..Y.rows() {
        total += A.get(r0 + r, c0 + col) * A.get(r0 + r, c0 + j);
    }
    total
}

/// `Y(i,:) u` where `u` is the row reflector stored in row `row`, with
/// its implicit unit element in column `col_start`
pub(crate) fn inner_prod_row<T: FloatT>(
    A: &BlockMatrix<T>,
    Y: Submatrix,
    row: usize,
    i: usize,
    col_start: usize,
) -> T {
    if col_start >= Y.cols() {
        return T::zero();
    }
    let (r0, c0) = (Y.row0, Y.col0);
    let mut total = A.get(r0 + i, c0 + col_start);
    for c in (col_start + 1)..Y.cols() {
        total += A.get(r0 + row, c0 + c) * A.get(r0 + i, c0 + c);
    }
    total
}

/// Applies the column reflector in column `col` from the left to the
/// columns `cols` of `Y`, touching only rows `col..row_end`.
///
/// The inner product always runs over every row of the view.
pub(crate) fn rank1_update_mult_r<T: FloatT>(
    A: &mut BlockMatrix<T>,
    Y: Submatrix,
    col: usize,
    gamma: T,
    cols: Range<usize>,
    row_end: usize,
) {
    let (r0, c0) = (Y.row0, Y.col0);
    for j in cols {
        let total = inner_prod_col(A, Y, col, j) * gamma;
        A.sub(r0 + col, c0 + j, total);
        for r in (col + 1)..row_end {
            let u = A.get(r0 + r, c0 + col);
            A.sub(r0 + r, c0 + j, total * u);
        }
    }
}

/// Applies the column reflector in column `col` to the remaining columns
/// of the leading block column.
pub(crate) fn rank1_update_mult_r_col<T: FloatT>(
    A: &mut BlockMatrix<T>,
    Y: Submatrix,
    col: usize,
    gamma: T,
) {
    let width = usize::min(A.block_length, Y.cols());
    rank1_update_mult_r(A, Y, col, gamma, (col + 1)..width, Y.rows());
}

/// Applies the column reflector in column `col` to the columns right of
/// the leading block column, updating only the top block row.
pub(crate) fn rank1_update_mult_r_top_row<T: FloatT>(
    A: &mut BlockMatrix<T>,
    Y: Submatrix,
    col: usize,
    gamma: T,
) {
    let height = usize::min(A.block_length, Y.rows());
    let start = usize::min(A.block_length, Y.cols());
    rank1_update_mult_r(A, Y, col, gamma, start..Y.cols(), height);
}

/// Applies the row reflector in row `row` (unit element in `col_start`)
/// from the right to the remaining rows of the leading block row.
pub(crate) fn rank1_update_mult_l_row<T: FloatT>(
    A: &mut BlockMatrix<T>,
    Y: Submatrix,
    row: usize,
    col_start: usize,
    gamma: T,
) {
    if col_start >= Y.cols() {
        return;
    }
    let height = usize::min(A.block_length, Y.rows());
    let (r0, c0) = (Y.row0, Y.col0);
    for i in (row + 1)..height {
        let total = inner_prod_row(A, Y, row, i, col_start) * gamma;
        A.sub(r0 + i, c0 + col_start, total);
        for c in (col_start + 1)..Y.cols() {
            let u = A.get(r0 + row, c0 + c);
            A.sub(r0 + i, c0 + c, total * u);
        }
    }
}

/// Applies the column reflector stored in column `col` of `Y` to every
/// column of `B`, where the rows of `B` correspond to the rows of `Y`.
pub(crate) fn apply_reflector_col<T: FloatT>(
    A: &BlockMatrix<T>,
    Y: Submatrix,
    col: usize,
    gamma: T,
    B: &mut BlockMatrix<T>,
) {
    if gamma == T::zero() {
        return;
    }
    let (r0, c0) = (Y.row0, Y.col0);
    for j in 0..B.n {
        let mut total = B.get(r0 + col, j);
        for r in (col + 1)..Y.rows() {
            total += A.get(r0 + r, c0 + col) * B.get(r0 + r, j);
        }
        total *= gamma;
        B.sub(r0 + col, j, total);
        for r in (col + 1)..Y.rows() {
            B.sub(r0 + r, j, total * A.get(r0 + r, c0 + col));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Matrix;

    #[test]
    fn test_householder_col_zeroes_column() {
        let D: Matrix<f64> = Matrix::from(&[[3., 1.], [4., 2.], [0., 5.]]);
        let mut A = BlockMatrix::from_dense(&D, 2);
        let Y = Submatrix::full(&A);
        let mut gamma = vec![0.; 2];

        assert!(compute_householder_col(&mut A, Y, &mut gamma, 0));
        // x = [3,4,0] maps to -5 e1
        assert!((A.get(0, 0) + 5.).abs() < 1e-14);

        // H applied to the second column preserves its norm
        rank1_update_mult_r_col(&mut A, Y, 0, gamma[0]);
        let norm2 = (0..3).map(|r| A.get(r, 1).powi(2)).sum::<f64>();
        assert!((norm2 - 30.).abs() < 1e-12);
    }

    #[test]
    fn test_householder_zero_segment() {
        let mut A = BlockMatrix::<f64>::new(3, 3, 2);
        let Y = Submatrix::full(&A);
        let mut gamma = vec![0.; 3];
        assert!(!compute_householder_col(&mut A, Y, &mut gamma, 0));
        assert!(!compute_householder_row(&mut A, Y, &mut gamma, 0));
    }
}
