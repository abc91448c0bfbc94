#![allow(non_snake_case)]

use super::traits::check_vector_dims;
use super::*;
use crate::algebra::*;
use crate::sparse::householder::happly;
use crate::sparse::triangular::usolve;
use crate::sparse::QrLeftLooking;

/// Least-squares solver for sparse systems with at least as many rows as
/// columns.
#[derive(Debug, Clone)]
pub struct SparseQrSolver<T = f64> {
    qr: QrLeftLooking<T>,
    size: (usize, usize),
    work: GrowArray<T>,
}

impl<T: FloatT> SparseQrSolver<T> {
    pub fn new(settings: SolverSettings<T>) -> Self {
        let strategy = settings
            .fill_reducing
            .build(false, true, settings.seed, settings.amd_dense_scale);
        Self {
            qr: QrLeftLooking::new(strategy, settings.singular_tol),
            size: (0, 0),
            work: GrowArray::new(),
        }
    }

    /// the underlying decomposition
    pub fn decomposition(&self) -> &QrLeftLooking<T> {
        &self.qr
    }
}

impl<T: FloatT> LinearSolver<T> for SparseQrSolver<T> {
    fn quality(&self) -> T {
        self.qr.quality()
    }
    fn modifies_a(&self) -> bool {
        false
    }
    fn modifies_b(&self) -> bool {
        false
    }
}

impl<T: FloatT> SparseLinearSolver<T> for SparseQrSolver<T> {
    fn set_a(&mut self, A: &CscMatrix<T>) -> Result<bool, LinalgError> {
        let ok = self.qr.decompose(A)?;
        self.size = (A.m, A.n);
        Ok(ok)
    }

    fn size(&self) -> (usize, usize) {
        self.size
    }

    fn solve_vector(&mut self, b: &[T], x: &mut [T]) -> Result<(), LinalgError> {
        check_vector_dims(self.size(), b, x)?;
        debug_assert!(self.qr.is_factored(), "solve without a successful set_a");
        let (m, n) = self.size;

        // fictitious rows stay zero
        let w = self.work.adjust(self.qr.m2());
        ipermute(w, b, &self.qr.pinv()[..m]);

        // w = Qᵀ w, then R x = w
        let (V, beta) = (self.qr.v(), self.qr.beta());
        for k in 0..n {
            happly(V, k, beta[k], w);
        }
        usolve(self.qr.r(), w);

        match self.qr.column_permutation() {
            Some(q) => ipermute(x, &w[..n], q.perm()),
            None => x.copy_from_slice(&w[..n]),
        }
        Ok(())
    }

    fn lock_structure(&mut self) {
        self.qr.lock_structure();
    }

    fn is_structure_locked(&self) -> bool {
        self.qr.is_structure_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tall(rows: &[[f64; 3]]) -> CscMatrix<f64> {
        let mut D = Matrix::zeros((rows.len(), 3));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                D[(i, j)] = v;
            }
        }
        CscMatrix::from_dense(&D)
    }

    #[test]
    fn test_qr_solver_reuses_scratch() {
        // no fictitious rows are needed, so m2 = m
        let A = tall(&[[2., 0., 1.], [1., 3., 0.], [0., 1., 4.], [1., 1., 1.]]);
        let mut solver = SparseQrSolver::new(SolverSettings::default());
        assert!(solver.set_a(&A).unwrap());
        assert_eq!(solver.decomposition().m2(), 4);

        let B = Matrix::identity(4);
        let mut X = Matrix::zeros((3, 4));
        solver.solve(&B, &mut X).unwrap();
        solver.invert(&mut X).unwrap();
        assert_eq!(solver.work.reallocations(), 1);

        let A2 = tall(&[
            [2., 0., 1.],
            [1., 3., 0.],
            [0., 1., 4.],
            [1., 1., 1.],
            [1., -1., 2.],
            [3., 0., 1.],
        ]);
        assert!(solver.set_a(&A2).unwrap());
        let mut x = vec![0.; 3];
        solver.solve_vector(&[1.; 6], &mut x).unwrap();
        solver.solve_vector(&[2.; 6], &mut x).unwrap();
        assert_eq!(solver.work.reallocations(), 2);
    }

    #[test]
    fn test_qr_solve_vector_dims() {
        // a right-hand side with one entry per column instead of per row
        let A = tall(&[[2., 0., 1.], [1., 3., 0.], [0., 1., 4.], [1., 1., 1.]]);
        let mut solver = SparseQrSolver::new(SolverSettings::default());
        assert!(solver.set_a(&A).unwrap());

        let mut x = vec![0.; 3];
        assert_eq!(solver.solve_vector(&[1., 2., 3.], &mut x), Err(LinalgError::IncompatibleDimension));
        let mut x = vec![0.; 4];
        assert_eq!(solver.solve_vector(&[1.; 4], &mut x), Err(LinalgError::IncompatibleDimension));
    }
}
