#![allow(non_snake_case)]

use crate::algebra::*;

/// Properties common to all solver objects.
pub trait LinearSolver<T: FloatT> {
    /// Product of the relative magnitudes of the factor's diagonal, in
    /// `[0,1]`.  Smaller values indicate a worse conditioned system.
    fn quality(&self) -> T;

    /// true if `set_a` consumes or overwrites the matrix it is given
    fn modifies_a(&self) -> bool;

    /// true if `solve` overwrites its right-hand side
    fn modifies_b(&self) -> bool;
}

/// Solver interface for [`CscMatrix`] systems `A X = B`.
///
/// `set_a` reports a numerical failure of the decomposition by returning
/// `Ok(false)`.  Calling `solve` after such a failure is a logic error.
pub trait SparseLinearSolver<T: FloatT>: LinearSolver<T> {
    /// Decomposes `A`.  Returns `Ok(false)` if the decomposition failed.
    fn set_a(&mut self, A: &CscMatrix<T>) -> Result<bool, LinalgError>;

    /// `(rows, columns)` of the matrix given to the last `set_a`
    fn size(&self) -> (usize, usize);

    /// Solves for a single right-hand side column.  `b` must have one
    /// entry per row of `A` and `x` one per column.
    fn solve_vector(&mut self, b: &[T], x: &mut [T]) -> Result<(), LinalgError>;

    /// Reuses the permutation and symbolic analysis of the last `set_a`
    /// for later matrices with the same sparsity pattern.
    fn lock_structure(&mut self);

    fn is_structure_locked(&self) -> bool;

    /// Solves `A X = B` one column at a time.  For tall `A` the solution
    /// is in the least-squares sense.
    fn solve(&mut self, B: &Matrix<T>, X: &mut Matrix<T>) -> Result<(), LinalgError> {
        let (m, n) = self.size();
        if B.m != m || X.m != n || B.n != X.n {
            return Err(LinalgError::IncompatibleDimension);
        }
        for col in 0..B.n {
            self.solve_vector(B.col_slice(col), X.col_slice_mut(col))?;
        }
        Ok(())
    }

    /// Writes the inverse of `A` into `A_inv` by solving against the
    /// identity.  For tall `A` this is the pseudo-inverse.
    fn invert(&mut self, A_inv: &mut Matrix<T>) -> Result<(), LinalgError> {
        let I = Matrix::identity(self.size().0);
        self.solve(&I, A_inv)
    }
}

// lengths of a right-hand side and solution against an `(m, n)` system
pub(crate) fn check_vector_dims<T>(size: (usize, usize), b: &[T], x: &[T]) -> Result<(), LinalgError> {
    if b.len() != size.0 || x.len() != size.1 {
        return Err(LinalgError::IncompatibleDimension);
    }
    Ok(())
}
