#![allow(non_snake_case)]

use super::traits::check_vector_dims;
use super::*;
use crate::algebra::*;
use crate::sparse::triangular::{lsolve, ltsolve};
use crate::sparse::CholeskyUpLooking;

/// Solver for symmetric positive definite sparse systems.
///
/// Only the upper triangle of `A` is read.
#[derive(Debug, Clone)]
pub struct SparseCholeskySolver<T = f64> {
    chol: CholeskyUpLooking<T>,
    n: usize,
    work: GrowArray<T>,
}

impl<T: FloatT> SparseCholeskySolver<T> {
    pub fn new(settings: SolverSettings<T>) -> Self {
        let strategy = settings
            .fill_reducing
            .build(true, true, settings.seed, settings.amd_dense_scale);
        Self {
            chol: CholeskyUpLooking::new(strategy),
            n: 0,
            work: GrowArray::new(),
        }
    }

    /// the underlying decomposition
    pub fn decomposition(&self) -> &CholeskyUpLooking<T> {
        &self.chol
    }
}

impl<T: FloatT> LinearSolver<T> for SparseCholeskySolver<T> {
    fn quality(&self) -> T {
        self.chol.quality()
    }
    fn modifies_a(&self) -> bool {
        false
    }
    fn modifies_b(&self) -> bool {
        false
    }
}

impl<T: FloatT> SparseLinearSolver<T> for SparseCholeskySolver<T> {
    fn set_a(&mut self, A: &CscMatrix<T>) -> Result<bool, LinalgError> {
        let ok = self.chol.decompose(A)?;
        self.n = A.n;
        Ok(ok)
    }

    fn size(&self) -> (usize, usize) {
        (self.n, self.n)
    }

    fn solve_vector(&mut self, b: &[T], x: &mut [T]) -> Result<(), LinalgError> {
        check_vector_dims(self.size(), b, x)?;
        debug_assert!(self.chol.is_factored(), "solve without a successful set_a");

        self.work.reshape(self.n);
        let w = self.work.data_mut();
        let L = self.chol.l();

        match self.chol.permutation() {
            Some(p) => permute(w, b, p.perm()),
            None => w.copy_from_slice(b),
        }
        lsolve(L, w);
        ltsolve(L, w);
        match self.chol.permutation() {
            Some(p) => ipermute(x, w, p.perm()),
            None => x.copy_from_slice(w),
        }
        Ok(())
    }

    fn lock_structure(&mut self) {
        self.chol.lock_structure();
    }

    fn is_structure_locked(&self) -> bool {
        self.chol.is_structure_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cholesky_solver_reuses_scratch() {
        let mut solver = SparseCholeskySolver::new(SolverSettings::default());
        assert!(solver.set_a(&CscMatrix::from_diag(&[1., 2., 3., 4., 5.])).unwrap());

        let B = Matrix::identity(5);
        let mut X = Matrix::zeros((5, 5));
        solver.solve(&B, &mut X).unwrap();
        solver.invert(&mut X).unwrap();
        assert_eq!(solver.work.reallocations(), 1);

        // a smaller system fits in the same buffer
        assert!(solver.set_a(&CscMatrix::from_diag(&[1., 4., 16.])).unwrap());
        let mut x = vec![0.; 3];
        solver.solve_vector(&[1., 1., 1.], &mut x).unwrap();
        assert_eq!(x, vec![1., 0.25, 0.0625]);
        assert_eq!(solver.work.reallocations(), 1);
        assert_eq!(solver.work.capacity(), 5);

        // a larger one grows it once
        assert!(solver.set_a(&CscMatrix::from_diag(&[2.; 8])).unwrap());
        let mut A_inv = Matrix::zeros((8, 8));
        solver.invert(&mut A_inv).unwrap();
        solver.invert(&mut A_inv).unwrap();
        assert_eq!(solver.work.reallocations(), 2);
    }

    #[test]
    fn test_cholesky_solve_vector_dims() {
        let mut solver = SparseCholeskySolver::new(SolverSettings::default());
        assert!(solver.set_a(&CscMatrix::from_diag(&[1., 2., 3.])).unwrap());

        let mut x = vec![0.; 3];
        assert_eq!(solver.solve_vector(&[1., 2.], &mut x), Err(LinalgError::IncompatibleDimension));
        let mut x = vec![0.; 4];
        assert_eq!(solver.solve_vector(&[1., 2., 3.], &mut x), Err(LinalgError::IncompatibleDimension));
    }
}
