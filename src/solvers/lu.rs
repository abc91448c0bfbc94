#![allow(non_snake_case)]

use super::traits::check_vector_dims;
use super::*;
use crate::algebra::*;
use crate::sparse::triangular::{lsolve, usolve};
use crate::sparse::LuUpLooking;

/// Solver for general square sparse systems.
#[derive(Debug, Clone)]
pub struct SparseLuSolver<T = f64> {
    lu: LuUpLooking<T>,
    n: usize,
    work: GrowArray<T>,
}

impl<T: FloatT> SparseLuSolver<T> {
    pub fn new(settings: SolverSettings<T>) -> Self {
        let strategy = settings
            .fill_reducing
            .build(false, true, settings.seed, settings.amd_dense_scale);
        Self {
            lu: LuUpLooking::new(strategy, settings.pivot_tol),
            n: 0,
            work: GrowArray::new(),
        }
    }

    /// the underlying decomposition
    pub fn decomposition(&self) -> &LuUpLooking<T> {
        &self.lu
    }
}

impl<T: FloatT> LinearSolver<T> for SparseLuSolver<T> {
    fn quality(&self) -> T {
        self.lu.quality()
    }
    fn modifies_a(&self) -> bool {
        false
    }
    fn modifies_b(&self) -> bool {
        false
    }
}

impl<T: FloatT> SparseLinearSolver<T> for SparseLuSolver<T> {
    fn set_a(&mut self, A: &CscMatrix<T>) -> Result<bool, LinalgError> {
        let ok = self.lu.decompose(A)?;
        self.n = A.n;
        Ok(ok)
    }

    fn size(&self) -> (usize, usize) {
        (self.n, self.n)
    }

    fn solve_vector(&mut self, b: &[T], x: &mut [T]) -> Result<(), LinalgError> {
        check_vector_dims(self.size(), b, x)?;
        debug_assert!(self.lu.is_factored(), "solve without a successful set_a");

        self.work.reshape(self.n);
        let w = self.work.data_mut();

        ipermute(w, b, self.lu.pinv());
        lsolve(self.lu.l(), w);
        usolve(self.lu.u(), w);
        match self.lu.column_permutation() {
            Some(q) => ipermute(x, w, q.perm()),
            None => x.copy_from_slice(w),
        }
        Ok(())
    }

    fn lock_structure(&mut self) {
        self.lu.lock_structure();
    }

    fn is_structure_locked(&self) -> bool {
        self.lu.is_structure_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // [2 1]
    // [1 3]
    fn test_matrix() -> CscMatrix<f64> {
        CscMatrix::new(2, 2, vec![0, 2, 4], vec![0, 1, 0, 1], vec![2., 1., 1., 3.])
    }

    #[test]
    fn test_lu_solver_reuses_scratch() {
        let mut solver = SparseLuSolver::new(SolverSettings::default());
        assert!(solver.set_a(&test_matrix()).unwrap());

        let mut x = vec![0.; 2];
        for _ in 0..3 {
            solver.solve_vector(&[3., 4.], &mut x).unwrap();
        }
        assert!(x.norm_inf_diff(&[1., 1.]) < 1e-14);
        assert_eq!(solver.work.reallocations(), 1);

        // same size, new values
        let mut B = test_matrix();
        B.nzval[0] = 4.;
        assert!(solver.set_a(&B).unwrap());
        let mut B_inv = Matrix::zeros((2, 2));
        solver.invert(&mut B_inv).unwrap();
        assert_eq!(solver.work.reallocations(), 1);

        assert!(solver.set_a(&CscMatrix::identity(6)).unwrap());
        let mut I_inv = Matrix::zeros((6, 6));
        solver.invert(&mut I_inv).unwrap();
        assert_eq!(solver.work.reallocations(), 2);
        assert_eq!(I_inv, Matrix::identity(6));
    }

    #[test]
    fn test_lu_solve_vector_dims() {
        let mut solver = SparseLuSolver::new(SolverSettings::default());
        assert!(solver.set_a(&test_matrix()).unwrap());
        let mut x = vec![0.; 2];
        assert_eq!(solver.solve_vector(&[1.], &mut x), Err(LinalgError::IncompatibleDimension));
    }
}
