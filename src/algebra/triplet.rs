#![allow(non_snake_case)]

use crate::algebra::*;
use itertools::izip;
use rand::seq::index;
use rand::Rng;
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Sparse matrix stored as an unordered list of `(row, col, value)`
/// entries.
///
/// Meant for assembling matrices entry by entry.  Convert with
/// [`to_csc`](TripletMatrix::to_csc) before factorizing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct TripletMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// row index of each entry
    pub rowval: Vec<usize>,
    /// column index of each entry
    pub colval: Vec<usize>,
    /// value of each entry
    pub nzval: Vec<T>,
}

impl<T> TripletMatrix<T>
where
    T: FloatT,
{
    /// Empty `m` x `n` matrix
    pub fn new(m: usize, n: usize) -> Self {
        Self::with_capacity(m, n, 0)
    }

    /// Empty `m` x `n` matrix with space reserved for `nnz` entries
    pub fn with_capacity(m: usize, n: usize, nnz: usize) -> Self {
        Self {
            m,
            n,
            rowval: Vec::with_capacity(nnz),
            colval: Vec::with_capacity(nnz),
            nzval: Vec::with_capacity(nnz),
        }
    }

    pub fn nnz(&self) -> usize {
        self.nzval.len()
    }

    /// Appends an entry without looking for an existing one at the same
    /// coordinate.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    pub fn add_item(&mut self, row: usize, col: usize, val: T) {
        assert!(row < self.m && col < self.n);
        self.rowval.push(row);
        self.colval.push(col);
        self.nzval.push(val);
    }

    /// Assigns `val` at `(row, col)`, overwriting an existing entry if
    /// there is one.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, val: T) {
        match self.find(row, col) {
            Some(idx) => self.nzval[idx] = val,
            None => self.add_item(row, col, val),
        }
    }

    /// Value at `(row, col)`, zero if no entry is stored there.
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(row < self.m && col < self.n);
        self.find(row, col).map_or(T::zero(), |idx| self.nzval[idx])
    }

    fn find(&self, row: usize, col: usize) -> Option<usize> {
        (0..self.nnz()).find(|&k| self.rowval[k] == row && self.colval[k] == col)
    }

    /// Converts to compressed column format.  Entries sharing a
    /// coordinate are summed.
    pub fn to_csc(&self) -> CscMatrix<T> {
        let nnz = self.nnz();
        let mut colptr = vec![0; self.n + 1];
        let mut rowval = vec![0; nnz];
        let mut nzval = vec![T::zero(); nnz];

        let mut next = vec![0; self.n];
        for &c in &self.colval {
            next[c] += 1;
        }
        cumsum(&mut colptr, &mut next);

        for (&r, &c, &v) in izip!(&self.rowval, &self.colval, &self.nzval) {
            let p = next[c];
            next[c] += 1;
            rowval[p] = r;
            nzval[p] = v;
        }

        let mut A = CscMatrix::new(self.m, self.n, colptr, rowval, nzval);
        A.sort_indices();
        _sum_duplicates(&mut A);
        A
    }

    /// Converts from compressed column format.
    pub fn from_csc(A: &CscMatrix<T>) -> Self {
        let mut M = Self::with_capacity(A.m, A.n, A.nnz());
        for col in 0..A.n {
            for p in A.colptr[col]..A.colptr[col + 1] {
                M.add_item(A.rowval[p], col, A.nzval[p]);
            }
        }
        M
    }

    /// True if both matrices have the same shape and the same entries,
    /// with matching values differing by at most `tol`.  The order in
    /// which entries were stored does not matter.
    pub fn is_equals(&self, B: &TripletMatrix<T>, tol: T) -> bool {
        if self.m != B.m || self.n != B.n || self.nnz() != B.nnz() {
            return false;
        }
        let a = self.sorted_order();
        let b = B.sorted_order();
        a.iter().zip(b.iter()).all(|(&i, &j)| {
            self.rowval[i] == B.rowval[j]
                && self.colval[i] == B.colval[j]
                && T::abs(self.nzval[i] - B.nzval[j]) <= tol
        })
    }

    // entry indices ordered by column, then row
    fn sorted_order(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.nnz()).collect();
        idx.sort_unstable_by_key(|&k| (self.colval[k], self.rowval[k]));
        idx
    }

    /// Random `m` x `n` matrix with `min(nz_total, m*n)` entries drawn
    /// uniformly from `[min, max)`.  Coordinates are sampled without
    /// replacement, so no coordinate appears twice, even when `m*n`
    /// exceeds `usize::MAX`.
    pub fn random_uniform<R: Rng + ?Sized>(
        m: usize,
        n: usize,
        nz_total: usize,
        min: T,
        max: T,
        rng: &mut R,
    ) -> Self {
        let positions = m.checked_mul(n);
        let nz = positions.map_or(nz_total, |mn| usize::min(nz_total, mn));
        let mut A = Self::with_capacity(m, n, nz);
        let value = |rng: &mut R| {
            let u = T::from_f64(rng.gen::<f64>()).unwrap_or(T::zero());
            min + (max - min) * u
        };

        match positions {
            Some(mn) => {
                for idx in index::sample(rng, mn, nz).into_iter() {
                    let v = value(&mut *rng);
                    A.add_item(idx / n, idx % n, v);
                }
            }
            // m*n is not representable, draw coordinates and reject repeats
            None => {
                let mut seen = HashSet::with_capacity(nz);
                while A.nnz() < nz {
                    let (r, c) = (rng.gen_range(0..m), rng.gen_range(0..n));
                    if seen.insert((r, c)) {
                        let v = value(&mut *rng);
                        A.add_item(r, c, v);
                    }
                }
            }
        }
        A
    }
}

impl<T> ShapedMatrix for TripletMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

// merges adjacent entries with equal row index in each (sorted) column
fn _sum_duplicates<T: FloatT>(A: &mut CscMatrix<T>) {
    let mut nz = 0;
    let mut start = 0;
    for col in 0..A.n {
        let end = A.colptr[col + 1];
        let first = nz;
        for p in start..end {
            if nz > first && A.rowval[nz - 1] == A.rowval[p] {
                let v = A.nzval[p];
                A.nzval[nz - 1] += v;
            } else {
                A.rowval[nz] = A.rowval[p];
                A.nzval[nz] = A.nzval[p];
                nz += 1;
            }
        }
        start = end;
        A.colptr[col + 1] = nz;
    }
    A.rowval.truncate(nz);
    A.nzval.truncate(nz);
}
