#![allow(non_snake_case)]

use super::householder::*;
use super::{BlockMatrix, Submatrix};
use crate::algebra::{FloatT, LinalgError};

/// Reduces the leading block of the view `Y` of `A` toward bidiagonal
/// form.
///
/// For each of the `min(width, height)` steps of the leading block, a
/// column reflector eliminates the entries below the diagonal (over all
/// rows of the view) and is applied to the rest of the leading block
/// column and to the top block row.  A row reflector then eliminates the
/// entries right of the superdiagonal (over all columns of the view) and
/// is applied to the rest of the leading block row.  Reflector scalars
/// are written to `gammas_u[Y.col0 + i]` and `gammas_v[Y.row0 + i]`.
///
/// A step with nothing to eliminate (the last row or the last two
/// columns of the view) stores an identity reflector with scalar zero.
/// The row reflectors are not propagated to the block columns left of
/// the view.
///
/// Returns `Ok(false)` if a reflector could not be computed because the
/// segment it is built from is entirely zero.  For a row reflector that
/// segment starts at the superdiagonal entry, so a row with nothing right
/// of its diagonal (any row of the identity, for instance) returns
/// `Ok(false)` rather than storing an identity reflector.
pub fn bidiag_outer_blocks<T: FloatT>(
    A: &mut BlockMatrix<T>,
    Y: Submatrix,
    gammas_u: &mut [T],
    gammas_v: &mut [T],
) -> Result<bool, LinalgError> {
    Y.check_within(A)?;

    let width = usize::min(A.block_length, Y.cols());
    let height = usize::min(A.block_length, Y.rows());
    let steps = usize::min(width, height);

    if gammas_u.len() < Y.col0 + steps || gammas_v.len() < Y.row0 + steps {
        return Err(LinalgError::InvalidArgument("gamma arrays are too short"));
    }

    for i in 0..steps {
        // column reflector
        if i + 1 < Y.rows() {
            if !compute_householder_col(A, Y, gammas_u, i) {
                log::debug!(target: "blocksparse::bidiagonal", "zero column segment at column {}", Y.col0 + i);
                return Ok(false);
            }
            let gamma = gammas_u[Y.col0 + i];
            rank1_update_mult_r_col(A, Y, i, gamma);
            rank1_update_mult_r_top_row(A, Y, i, gamma);
        } else {
            gammas_u[Y.col0 + i] = T::zero();
        }

        // row reflector
        if i + 2 < Y.cols() {
            if !compute_householder_row(A, Y, gammas_v, i) {
                log::debug!(target: "blocksparse::bidiagonal", "zero row segment at row {}", Y.row0 + i);
                return Ok(false);
            }
            let gamma = gammas_v[Y.row0 + i];
            rank1_update_mult_l_row(A, Y, i, i + 1, gamma);
        } else {
            gammas_v[Y.row0 + i] = T::zero();
        }
    }
    Ok(true)
}
