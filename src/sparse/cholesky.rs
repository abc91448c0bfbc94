#![allow(non_snake_case)]

use super::etree::*;
use super::AnalysedPattern;
use crate::algebra::*;
use crate::fillreduce::*;

/// Up-looking sparse Cholesky decomposition `P A Pᵀ = L Lᵀ`.
///
/// Only the upper triangle of `A` is read.  The factor `L` is stored with
/// sorted row indices, diagonal first in each column.
#[derive(Debug, Clone)]
pub struct CholeskyUpLooking<T = f64> {
    fill: ApplyFillReduction,
    L: CscMatrix<T>,
    // elimination tree and strict column counts of L
    parent: Vec<usize>,
    Lnz: Vec<usize>,
    // pattern the symbolic analysis was done for
    analysed: Option<AnalysedPattern>,
    locked: bool,
    factored: bool,

    // workspace
    iwork: GrowArray<usize>,
    cursor: GrowArray<usize>,
    stack: GrowArray<usize>,
    stamp: GrowArray<usize>,
    x: GrowArray<T>,
}

impl<T: FloatT> CholeskyUpLooking<T> {
    /// `strategy` should offer a column permutation; it is applied on
    /// both sides of `A`.
    pub fn new(strategy: ComputePermutation) -> Self {
        Self {
            fill: ApplyFillReduction::new(strategy, true),
            L: CscMatrix::zeros((0, 0)),
            parent: Vec::new(),
            Lnz: Vec::new(),
            analysed: None,
            locked: false,
            factored: false,
            iwork: GrowArray::new(),
            cursor: GrowArray::new(),
            stack: GrowArray::new(),
            stamp: GrowArray::new(),
            x: GrowArray::new(),
        }
    }

    /// Decomposes `A`.  Returns `Ok(false)` if a non-positive pivot is
    /// encountered, in which case the factor is unusable.
    pub fn decompose(&mut self, A: &CscMatrix<T>) -> Result<bool, LinalgError> {
        if !A.is_square() {
            return Err(LinalgError::InvalidArgument("Cholesky requires a square matrix"));
        }
        A.check_format()?;

        let reuse = match (self.locked, &self.analysed) {
            (true, Some(analysed)) => {
                if !analysed.matches(A.pattern()) {
                    return Err(LinalgError::SparsityMismatch);
                }
                log::trace!(target: "blocksparse::cholesky", "structure locked, skipping symbolic analysis");
                true
            }
            _ => false,
        };

        let C = self.fill.apply(A)?;
        if !reuse {
            self.symbolic(&C);
            self.analysed = Some(AnalysedPattern::new(A.pattern()));
        }
        self.factored = self.numeric(&C);
        Ok(self.factored)
    }

    fn symbolic(&mut self, C: &CscMatrix<T>) {
        let n = C.n;
        self.parent.resize(n, NONE);
        self.Lnz.resize(n, 0);
        let work = self.iwork.adjust(n);
        etree_cholesky(n, &C.colptr, &C.rowval, work, &mut self.Lnz, &mut self.parent);

        // room for the strict lower part plus the diagonal
        let mut counts: Vec<usize> = self.Lnz.iter().map(|c| c + 1).collect();
        let mut colptr = vec![0; n + 1];
        cumsum(&mut colptr, &mut counts);
        let nnz = colptr[n];

        self.L = CscMatrix::spalloc((n, n), nnz);
        self.L.colptr = colptr;
    }

    fn numeric(&mut self, C: &CscMatrix<T>) -> bool {
        let n = C.n;
        let (Cp, Ci, Cx) = (&C.colptr, &C.rowval, &C.nzval);
        let (Lp, Li, Lx) = (&self.L.colptr, &mut self.L.rowval, &mut self.L.nzval);

        // next free slot in each column of L
        let c = self.cursor.adjust(n);
        c.copy_from_slice(&Lp[..n]);
        let s = self.stack.adjust(n);
        let w = self.stamp.adjust(n);
        w.fill(NONE);
        let x = self.x.adjust(n);

        for k in 0..n {
            // nonzero pattern of L(k,:)
            let mut top = ereach(n, Cp, Ci, k, &self.parent, s, w);

            // scatter the upper part of C(:,k)
            x[k] = T::zero();
            for p in Cp[k]..Cp[k + 1] {
                if Ci[p] <= k {
                    x[Ci[p]] = Cx[p];
                }
            }
            let mut d = x[k];
            x[k] = T::zero();

            // triangular solve for L(k,:)
            while top < n {
                let i = s[top];
                let lki = x[i] / Lx[Lp[i]];
                x[i] = T::zero();
                for p in (Lp[i] + 1)..c[i] {
                    x[Li[p]] -= Lx[p] * lki;
                }
                d -= lki * lki;
                Li[c[i]] = k;
                Lx[c[i]] = lki;
                c[i] += 1;
                top += 1;
            }

            if d <= T::zero() {
                log::debug!(target: "blocksparse::cholesky", "non-positive pivot {:e} at column {}", d, k);
                return false;
            }
            Li[c[k]] = k;
            Lx[c[k]] = T::sqrt(d);
            c[k] += 1;
        }
        true
    }

    /// Reuses the fill-reducing permutation and symbolic analysis of the
    /// last decomposition for later matrices with the same pattern.
    pub fn lock_structure(&mut self) {
        self.locked = true;
        self.fill.lock();
    }

    pub fn is_structure_locked(&self) -> bool {
        self.locked
    }

    /// true if the last decomposition succeeded
    pub fn is_factored(&self) -> bool {
        self.factored
    }

    /// lower triangular factor
    pub fn l(&self) -> &CscMatrix<T> {
        &self.L
    }

    /// the symmetric permutation `P`, if any was applied
    pub fn permutation(&self) -> Option<&Permutation> {
        self.fill.column()
    }

    /// elimination tree of `P A Pᵀ`
    pub fn etree(&self) -> &[usize] {
        &self.parent
    }

    /// Product of `|L(i,i)| / max|L(k,k)|` over the diagonal
    pub fn quality(&self) -> T {
        if !self.factored {
            return T::zero();
        }
        let L = &self.L;
        super::diagonal_quality((0..L.n).map(|j| L.nzval[L.colptr[j]]))
    }
}
