#![allow(non_snake_case)]

use super::householder::*;
use super::{BlockMatrix, Submatrix};
use crate::algebra::{FloatT, LinalgError, MatrixTriangle};

/// QR decomposition of a block matrix with Householder reflectors.
///
/// The decomposition is computed in place: after [`decompose`](Self::decompose)
/// the owned matrix holds `R` on and above the diagonal and the
/// reflectors below it.  `Q` is never formed explicitly.
#[derive(Debug, Clone)]
pub struct QrHouseholderBlock<T = f64> {
    QR: BlockMatrix<T>,
    gammas: Vec<T>,
}

impl<T: FloatT> Default for QrHouseholderBlock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatT> QrHouseholderBlock<T> {
    pub fn new() -> Self {
        Self {
            QR: BlockMatrix::new(0, 0, 1),
            gammas: Vec::new(),
        }
    }

    /// Decomposes `A`, taking ownership of it.
    ///
    /// Each column reflector is applied to all trailing columns before
    /// the next one is computed.  Returns false if some column on and
    /// below the diagonal is entirely zero.
    pub fn decompose(&mut self, A: BlockMatrix<T>) -> bool {
        self.QR = A;
        let (m, n) = (self.QR.m, self.QR.n);
        let steps = usize::min(m, n);

        self.gammas.clear();
        self.gammas.resize(n, T::zero());

        for c in 0..steps {
            let Y = Submatrix::new(c, m, c, n);
            if !compute_householder_col(&mut self.QR, Y, &mut self.gammas, 0) {
                log::debug!(target: "blocksparse::block_qr", "zero column below the diagonal at column {}", c);
                return false;
            }
            let gamma = self.gammas[c];
            rank1_update_mult_r(&mut self.QR, Y, 0, gamma, 1..Y.cols(), Y.rows());
        }
        true
    }

    /// Overwrites `B` with `Qᵀ B`.
    pub fn apply_q_tran(&self, B: &mut BlockMatrix<T>) -> Result<(), LinalgError> {
        self.check_rhs(B)?;
        let m = self.QR.m;
        for j in 0..usize::min(m, self.QR.n) {
            let Y = Submatrix::new(j, m, j, j + 1);
            apply_reflector_col(&self.QR, Y, 0, self.gammas[j], B);
        }
        Ok(())
    }

    /// Overwrites `B` with `Q B`.
    pub fn apply_q(&self, B: &mut BlockMatrix<T>) -> Result<(), LinalgError> {
        self.check_rhs(B)?;
        let m = self.QR.m;
        for j in (0..usize::min(m, self.QR.n)).rev() {
            let Y = Submatrix::new(j, m, j, j + 1);
            apply_reflector_col(&self.QR, Y, 0, self.gammas[j], B);
        }
        Ok(())
    }

    fn check_rhs(&self, B: &BlockMatrix<T>) -> Result<(), LinalgError> {
        if B.block_length != self.QR.block_length {
            return Err(LinalgError::IncompatibleBlockLength);
        }
        if B.m != self.QR.m {
            return Err(LinalgError::IncompatibleDimension);
        }
        Ok(())
    }

    /// Solves `R X = B` in place, with `B` the leading `n` rows of its
    /// backing matrix.
    pub(crate) fn solve_r(&self, B: &mut BlockMatrix<T>) -> Result<(), LinalgError> {
        let n = self.QR.n;
        let t = Submatrix::new(0, n, 0, n);
        let b = Submatrix::new(0, n, 0, B.n);
        super::triangular::solve(&self.QR, t, MatrixTriangle::Triu, B, b)
    }

    /// The upper triangular factor `R` as a new `min(m,n)` x `n` matrix
    pub fn r(&self) -> BlockMatrix<T> {
        let k = usize::min(self.QR.m, self.QR.n);
        let mut R = BlockMatrix::new(k, self.QR.n, self.QR.block_length);
        for i in 0..k {
            for j in i..self.QR.n {
                R.set(i, j, self.QR.get(i, j));
            }
        }
        R
    }

    /// Reflector scalars, one per column
    pub fn gammas(&self) -> &[T] {
        &self.gammas
    }

    /// The in-place factorization
    pub fn qr(&self) -> &BlockMatrix<T> {
        &self.QR
    }

    /// Product of `|R(i,i)| / max|R(k,k)|` over the diagonal
    pub fn quality(&self) -> T {
        let k = usize::min(self.QR.m, self.QR.n);
        let max = (0..k).fold(T::zero(), |m, i| T::max(m, T::abs(self.QR.get(i, i))));
        if max == T::zero() {
            return T::zero();
        }
        (0..k).fold(T::one(), |q, i| q * T::abs(self.QR.get(i, i)) / max)
    }
}
