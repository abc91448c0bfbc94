#![allow(non_snake_case)]

use super::{BlockMatrix, Submatrix};
use crate::algebra::{FloatT, LinalgError, MatrixTriangle};

/// Solves `T X = B` in place of `B`, with `T` the square triangular view
/// `t` of `Tm` and `B` the view `b` of `Bm`.
///
/// Works one block row at a time: the contribution of the already solved
/// block rows is subtracted, then the diagonal block is solved by
/// substitution.  Only the triangle named by `triangle` is read.
pub fn solve<T: FloatT>(
    Tm: &BlockMatrix<T>,
    t: Submatrix,
    triangle: MatrixTriangle,
    Bm: &mut BlockMatrix<T>,
    b: Submatrix,
) -> Result<(), LinalgError> {
    if Tm.block_length != Bm.block_length {
        return Err(LinalgError::IncompatibleBlockLength);
    }
    t.check_within(Tm)?;
    b.check_within(Bm)?;
    if t.rows() != t.cols() || t.rows() != b.rows() {
        return Err(LinalgError::IncompatibleDimension);
    }

    let n = t.rows();
    let bl = Tm.block_length;
    let starts: Vec<usize> = (0..n).step_by(bl).collect();

    match triangle {
        MatrixTriangle::Triu => {
            for &i0 in starts.iter().rev() {
                let i1 = usize::min(i0 + bl, n);
                _subtract_solved(Tm, t, Bm, b, i0..i1, i1..n);
                _solve_diag_block(Tm, t, Bm, b, i0, i1, triangle);
            }
        }
        MatrixTriangle::Tril => {
            for &i0 in starts.iter() {
                let i1 = usize::min(i0 + bl, n);
                _subtract_solved(Tm, t, Bm, b, i0..i1, 0..i0);
                _solve_diag_block(Tm, t, Bm, b, i0, i1, triangle);
            }
        }
    }
    Ok(())
}

// B(rows,:) -= T(rows, solved) * X(solved,:)
fn _subtract_solved<T: FloatT>(
    Tm: &BlockMatrix<T>,
    t: Submatrix,
    Bm: &mut BlockMatrix<T>,
    b: Submatrix,
    rows: std::ops::Range<usize>,
    solved: std::ops::Range<usize>,
) {
    if solved.is_empty() {
        return;
    }
    for j in 0..b.cols() {
        for i in rows.clone() {
            let mut total = T::zero();
            for k in solved.clone() {
                total += Tm.get(t.row0 + i, t.col0 + k) * Bm.get(b.row0 + k, b.col0 + j);
            }
            Bm.sub(b.row0 + i, b.col0 + j, total);
        }
    }
}

fn _solve_diag_block<T: FloatT>(
    Tm: &BlockMatrix<T>,
    t: Submatrix,
    Bm: &mut BlockMatrix<T>,
    b: Submatrix,
    i0: usize,
    i1: usize,
    triangle: MatrixTriangle,
) {
    let tget = |i: usize, k: usize| Tm.get(t.row0 + i, t.col0 + k);

    for j in 0..b.cols() {
        let col = b.col0 + j;
        match triangle {
            MatrixTriangle::Triu => {
                for i in (i0..i1).rev() {
                    let mut v = Bm.get(b.row0 + i, col);
                    for k in (i + 1)..i1 {
                        v -= tget(i, k) * Bm.get(b.row0 + k, col);
                    }
                    Bm.set(b.row0 + i, col, v / tget(i, i));
                }
            }
            MatrixTriangle::Tril => {
                for i in i0..i1 {
                    let mut v = Bm.get(b.row0 + i, col);
                    for k in i0..i {
                        v -= tget(i, k) * Bm.get(b.row0 + k, col);
                    }
                    Bm.set(b.row0 + i, col, v / tget(i, i));
                }
            }
        }
    }
}
