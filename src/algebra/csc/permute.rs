#![allow(non_snake_case)]

use crate::algebra::*;
use std::cmp::{max, min};

impl<T: FloatT> CscMatrix<T> {
    /// Computes `C = P*A*Q`, where `P` is given by the inverse row
    /// permutation `pinv` (row `i` of `A` becomes row `pinv[i]` of `C`) and
    /// `Q` by the column permutation `q` (column `k` of `C` is column
    /// `q[k]` of `A`).  Either may be absent.
    ///
    /// Row indices of the result are left unsorted; see [`sort_indices`](Self::sort_indices).
    pub fn permute(&self, pinv: Option<&[usize]>, q: Option<&[usize]>) -> Result<Self, LinalgError> {
        if pinv.is_some_and(|p| p.len() != self.m) || q.is_some_and(|q| q.len() != self.n) {
            return Err(LinalgError::IncompatibleDimension);
        }
        let mut C = CscMatrix::spalloc((self.m, self.n), self.nnz());
        let mut nz = 0;

        for k in 0..self.n {
            C.colptr[k] = nz;
            let j = q.map_or(k, |q| q[k]);
            for p in self.colptr[j]..self.colptr[j + 1] {
                C.rowval[nz] = pinv.map_or(self.rowval[p], |pinv| pinv[self.rowval[p]]);
                C.nzval[nz] = self.nzval[p];
                nz += 1;
            }
        }
        C.colptr[self.n] = nz;
        Ok(C)
    }

    /// Computes the upper triangle of `P*A*Pᵀ` from the upper triangle of a
    /// square `A`, with `iperm` the inverse permutation of `P`.  Entries of
    /// `A` below the diagonal are ignored.
    ///
    /// Row indices of the result are left unsorted.
    pub fn permute_symmetric(&self, iperm: &[usize]) -> Result<Self, LinalgError> {
        if self.m != self.n || iperm.len() != self.n {
            return Err(LinalgError::IncompatibleDimension);
        }
        let n = self.n;
        let mut P = CscMatrix::<T>::spalloc((n, n), self.nnz());
        let Ar = &self.rowval;
        let Ac = &self.colptr;
        let Av = &self.nzval;

        // 1. count number of entries that each column of P will have,
        // keeping in mind the row permutation
        let mut row_starts = vec![0; n];
        for colA in 0..n {
            let colP = iperm[colA];
            for &rowA in &Ar[Ac[colA]..Ac[colA + 1]] {
                if rowA <= colA {
                    row_starts[max(iperm[rowA], colP)] += 1;
                }
            }
        }

        // 2. colptr of P from the counts, which become insertion cursors
        cumsum(&mut P.colptr, &mut row_starts);

        // 3. move the upper triangular entries to their permuted place
        for colA in 0..n {
            let colP = iperm[colA];
            for rowA_idx in Ac[colA]..Ac[colA + 1] {
                let rowA = Ar[rowA_idx];
                if rowA <= colA {
                    let rowP = iperm[rowA];
                    let col_idx = max(colP, rowP);
                    let rowP_idx = row_starts[col_idx];

                    P.rowval[rowP_idx] = min(colP, rowP);
                    P.nzval[rowP_idx] = Av[rowA_idx];
                    row_starts[col_idx] += 1;
                }
            }
        }

        // drop the space reserved for lower triangular entries of A
        let nnz = P.colptr[n];
        P.rowval.truncate(nnz);
        P.nzval.truncate(nnz);
        Ok(P)
    }

    /// Sorts the row indices within each column, carrying the values along.
    pub fn sort_indices(&mut self) {
        let mut scratch: Vec<(usize, T)> = Vec::new();
        for col in 0..self.n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            let rows = &mut self.rowval[rng.clone()];
            if rows.windows(2).all(|w| w[0] <= w[1]) {
                continue;
            }
            let vals = &mut self.nzval[rng];
            scratch.clear();
            scratch.extend(rows.iter().copied().zip(vals.iter().copied()));
            scratch.sort_unstable_by_key(|&(r, _)| r);
            for (k, (r, v)) in scratch.iter().enumerate() {
                rows[k] = *r;
                vals[k] = *v;
            }
        }
    }
}
