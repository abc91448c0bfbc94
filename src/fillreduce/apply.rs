#![allow(non_snake_case)]

use super::*;
use std::borrow::Cow;

/// Binds a fill-reducing strategy to the matrices given to a factorization.
///
/// In symmetric mode the column permutation `P` is applied on both sides
/// and the upper triangle of `P·A·Pᵀ` is produced.  Otherwise the result
/// is `P·A·Q`, using whichever of the row and column permutations the
/// strategy computed.  Once locked, the permutations computed by the last
/// unlocked call are reused without consulting the strategy.
#[derive(Debug, Clone)]
pub struct ApplyFillReduction {
    strategy: ComputePermutation,
    symmetric: bool,
    locked: bool,
    processed: Option<(usize, usize)>,
}

impl ApplyFillReduction {
    pub fn new(strategy: ComputePermutation, symmetric: bool) -> Self {
        Self {
            strategy,
            symmetric,
            locked: false,
            processed: None,
        }
    }

    /// Returns `A` itself when no permutation applies, or a permuted copy
    /// with sorted row indices.
    pub fn apply<'a, T: FloatT>(&mut self, A: &'a CscMatrix<T>) -> Result<Cow<'a, CscMatrix<T>>, LinalgError> {
        match (self.locked, self.processed) {
            (true, Some(size)) => {
                if size != (A.m, A.n) {
                    return Err(LinalgError::SparsityMismatch);
                }
            }
            _ => {
                self.strategy.process(A.pattern())?;
                self.processed = Some((A.m, A.n));
            }
        }

        if self.symmetric {
            return match self.strategy.column() {
                None => Ok(Cow::Borrowed(A)),
                Some(p) => {
                    let mut C = A.permute_symmetric(p.iperm())?;
                    C.sort_indices();
                    Ok(Cow::Owned(C))
                }
            };
        }

        let (row, column) = (self.strategy.row(), self.strategy.column());
        if row.is_none() && column.is_none() {
            return Ok(Cow::Borrowed(A));
        }
        let mut C = A.permute(row.map(|p| p.iperm()), column.map(|p| p.perm()))?;
        C.sort_indices();
        Ok(Cow::Owned(C))
    }

    /// Row permutation applied by the last call to `apply`
    pub fn row(&self) -> Option<&Permutation> {
        if self.symmetric {
            return self.strategy.column();
        }
        self.strategy.row()
    }

    /// Column permutation applied by the last call to `apply`
    pub fn column(&self) -> Option<&Permutation> {
        self.strategy.column()
    }

    /// Stops recomputing permutations on later calls to `apply`
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}
