#![allow(non_snake_case)]

use super::*;
use crate::algebra::*;
use crate::block::{BlockMatrix, QrHouseholderBlock, Submatrix};

/// Least-squares solver for dense block matrices with at least as many
/// rows as columns.
///
/// `set_a` takes ownership of `A` and decomposes it in place, and `solve`
/// overwrites its right-hand side with `Qᵀ B`.
#[derive(Debug, Clone)]
pub struct BlockQrSolver<T = f64> {
    qr: QrHouseholderBlock<T>,
    size: (usize, usize),
    block_length: usize,
    factored: bool,
}

impl<T: FloatT> Default for BlockQrSolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatT> BlockQrSolver<T> {
    pub fn new() -> Self {
        Self {
            qr: QrHouseholderBlock::new(),
            size: (0, 0),
            block_length: 1,
            factored: false,
        }
    }

    /// Decomposes `A`.  Returns `Ok(false)` if `A` has a column that is
    /// zero on and below the diagonal once the previous reflectors are
    /// applied.
    pub fn set_a(&mut self, A: BlockMatrix<T>) -> Result<bool, LinalgError> {
        if A.m < A.n {
            return Err(LinalgError::InvalidArgument("QR requires at least as many rows as columns"));
        }
        self.size = (A.m, A.n);
        self.block_length = A.block_length;
        self.factored = self.qr.decompose(A);
        Ok(self.factored)
    }

    /// Solves `A X = B` in the least-squares sense.  `B` is overwritten.
    pub fn solve(&mut self, B: &mut BlockMatrix<T>, X: &mut BlockMatrix<T>) -> Result<(), LinalgError> {
        debug_assert!(self.factored, "solve without a successful set_a");
        let (m, n) = self.size;
        if B.block_length != self.block_length || X.block_length != self.block_length {
            return Err(LinalgError::IncompatibleBlockLength);
        }
        if B.m != m || X.m != n || B.n != X.n {
            return Err(LinalgError::IncompatibleDimension);
        }

        self.qr.apply_q_tran(B)?;
        B.extract(Submatrix::new(0, n, 0, B.n), X, 0, 0)?;
        self.qr.solve_r(X)
    }

    /// Writes `A⁻¹` into `A_inv`.  Square systems only.
    pub fn invert(&mut self, A_inv: &mut BlockMatrix<T>) -> Result<(), LinalgError> {
        debug_assert!(self.factored, "invert without a successful set_a");
        let (m, n) = self.size;
        if m != n {
            return Err(LinalgError::InvalidArgument("only square systems can be inverted"));
        }
        if A_inv.block_length != self.block_length {
            return Err(LinalgError::IncompatibleBlockLength);
        }
        if A_inv.m != n || A_inv.n != n {
            return Err(LinalgError::IncompatibleDimension);
        }

        A_inv.set_identity();
        self.qr.apply_q_tran(A_inv)?;
        self.qr.solve_r(A_inv)
    }

    /// the underlying decomposition
    pub fn decomposition(&self) -> &QrHouseholderBlock<T> {
        &self.qr
    }
}

impl<T: FloatT> LinearSolver<T> for BlockQrSolver<T> {
    fn quality(&self) -> T {
        self.qr.quality()
    }
    fn modifies_a(&self) -> bool {
        true
    }
    fn modifies_b(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_qr_solver_checks() {
        let mut solver = BlockQrSolver::<f64>::new();
        assert!(matches!(
            solver.set_a(BlockMatrix::new(2, 3, 2)),
            Err(LinalgError::InvalidArgument(_))
        ));

        let A = BlockMatrix::from_dense(&Matrix::from(&[[2., 1.], [1., 3.], [0., 1.]]), 2);
        assert!(solver.set_a(A).unwrap());
        assert!(solver.modifies_a() && solver.modifies_b());

        let mut B = BlockMatrix::new(3, 1, 3);
        let mut X = BlockMatrix::new(2, 1, 2);
        assert_eq!(solver.solve(&mut B, &mut X), Err(LinalgError::IncompatibleBlockLength));

        let mut B = BlockMatrix::new(2, 1, 2);
        assert_eq!(solver.solve(&mut B, &mut X), Err(LinalgError::IncompatibleDimension));

        // tall systems have no inverse
        let mut A_inv = BlockMatrix::new(2, 2, 2);
        assert!(matches!(solver.invert(&mut A_inv), Err(LinalgError::InvalidArgument(_))));
    }

    #[test]
    fn test_block_qr_least_squares() {
        // x = [1, 2] fits exactly
        let D: Matrix<f64> = Matrix::from(&[[2., 1.], [1., 3.], [0., 1.]]);
        let mut solver = BlockQrSolver::new();
        assert!(solver.set_a(BlockMatrix::from_dense(&D, 2)).unwrap());

        let mut B = BlockMatrix::from_dense(&Matrix::from(&[[4.], [7.], [2.]]), 2);
        let mut X = BlockMatrix::new(2, 1, 2);
        solver.solve(&mut B, &mut X).unwrap();
        assert!((X.get(0, 0) - 1.).abs() < 1e-12);
        assert!((X.get(1, 0) - 2.).abs() < 1e-12);
    }
}
