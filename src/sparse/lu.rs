#![allow(non_snake_case)]

use super::triangular::spsolve;
use super::AnalysedPattern;
use crate::algebra::*;
use crate::fillreduce::*;

/// Up-looking sparse LU decomposition with threshold partial pivoting,
/// `P A Q = L U`.
///
/// `L` is unit lower triangular with its diagonal stored first, `U` is
/// upper triangular with its diagonal stored last.  Row `i` of `A` is row
/// `pinv[i]` of `L U`; `Q` is the optional fill-reducing column
/// permutation.
#[derive(Debug, Clone)]
pub struct LuUpLooking<T = f64> {
    fill: ApplyFillReduction,
    pivot_tol: T,
    L: CscMatrix<T>,
    U: CscMatrix<T>,
    pinv: Vec<usize>,
    analysed: Option<AnalysedPattern>,
    locked: bool,
    factored: bool,

    // workspace
    xi: GrowArray<usize>,
    pstack: GrowArray<usize>,
    marked: GrowArray<bool>,
    x: GrowArray<T>,
}

impl<T: FloatT> LuUpLooking<T> {
    /// `pivot_tol` in `(0,1]` is the fraction of the largest candidate
    /// magnitude the diagonal needs in order to be kept as pivot.  `1`
    /// gives classic partial pivoting.
    pub fn new(strategy: ComputePermutation, pivot_tol: T) -> Self {
        Self {
            fill: ApplyFillReduction::new(strategy, false),
            pivot_tol,
            L: CscMatrix::zeros((0, 0)),
            U: CscMatrix::zeros((0, 0)),
            pinv: Vec::new(),
            analysed: None,
            locked: false,
            factored: false,
            xi: GrowArray::new(),
            pstack: GrowArray::new(),
            marked: GrowArray::new(),
            x: GrowArray::new(),
        }
    }

    /// Decomposes `A`.  Returns `Ok(false)` if some column has no
    /// admissible pivot, i.e. `A` is structurally or numerically singular.
    pub fn decompose(&mut self, A: &CscMatrix<T>) -> Result<bool, LinalgError> {
        if !A.is_square() {
            return Err(LinalgError::InvalidArgument("LU requires a square matrix"));
        }
        A.check_format()?;

        if let (true, Some(analysed)) = (self.locked, &self.analysed) {
            if !analysed.matches(A.pattern()) {
                return Err(LinalgError::SparsityMismatch);
            }
            log::trace!(target: "blocksparse::lu", "structure locked, reusing column permutation");
        }

        let C = self.fill.apply(A)?;
        if !self.locked || self.analysed.is_none() {
            self.analysed = Some(AnalysedPattern::new(A.pattern()));
        }
        self.factored = self.numeric(&C);
        Ok(self.factored)
    }

    fn numeric(&mut self, C: &CscMatrix<T>) -> bool {
        let n = C.n;
        let tol = self.pivot_tol;
        let q = self.fill.column().map(|q| q.perm());

        let xi = self.xi.adjust(n);
        let pstack = self.pstack.adjust(n);
        let marked = self.marked.adjust(n);
        let x = self.x.adjust(n);

        let (L, U, pinv) = (&mut self.L, &mut self.U, &mut self.pinv);
        for F in [&mut *L, &mut *U] {
            F.m = n;
            F.n = n;
            F.colptr.clear();
            F.colptr.resize(n + 1, 0);
            F.rowval.clear();
            F.nzval.clear();
        }
        pinv.clear();
        pinv.resize(n, NONE);

        for k in 0..n {
            L.colptr[k] = L.rowval.len();
            U.colptr[k] = U.rowval.len();

            // x = L \ C(:,k)
            let top = spsolve(L, C, k, xi, pstack, marked, x, Some(&pinv[..]), true);

            // largest candidate among the rows not yet pivotal
            let mut ipiv = NONE;
            let mut a = -T::one();
            for &i in &xi[top..n] {
                if pinv[i] == NONE {
                    let t = T::abs(x[i]);
                    if t > a {
                        a = t;
                        ipiv = i;
                    }
                } else {
                    U.rowval.push(pinv[i]);
                    U.nzval.push(x[i]);
                }
            }
            if ipiv == NONE || a <= T::zero() {
                log::debug!(target: "blocksparse::lu", "no admissible pivot in column {}", k);
                return false;
            }

            // keep the original diagonal when it is large enough
            let diag = q.map_or(k, |q| q[k]);
            if pinv[diag] == NONE && T::abs(x[diag]) >= a * tol {
                ipiv = diag;
            }

            let pivot = x[ipiv];
            U.rowval.push(k);
            U.nzval.push(pivot);
            pinv[ipiv] = k;
            L.rowval.push(ipiv);
            L.nzval.push(T::one());

            for &i in &xi[top..n] {
                if pinv[i] == NONE {
                    L.rowval.push(i);
                    L.nzval.push(x[i] / pivot);
                }
                x[i] = T::zero();
            }
        }
        L.colptr[n] = L.rowval.len();
        U.colptr[n] = U.rowval.len();

        // final row indices of L
        L.rowval.iter_mut().for_each(|i| *i = pinv[*i]);
        L.sort_indices();
        U.sort_indices();
        true
    }

    /// Reuses the column permutation of the last decomposition for later
    /// matrices with the same pattern.
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

    /// unit lower triangular factor
    pub fn l(&self) -> &CscMatrix<T> {
        &self.L
    }

    /// upper triangular factor
    pub fn u(&self) -> &CscMatrix<T> {
        &self.U
    }

    /// row pivots: row `i` of `A` is row `pinv[i]` of `L U`
    pub fn pinv(&self) -> &[usize] {
        &self.pinv
    }

    /// fill-reducing column permutation, if any was applied
    pub fn column_permutation(&self) -> Option<&Permutation> {
        self.fill.column()
    }

    /// Product of `|U(i,i)| / max|U(k,k)|` over the diagonal
    pub fn quality(&self) -> T {
        if !self.factored {
            return T::zero();
        }
        let U = &self.U;
        super::diagonal_quality((0..U.n).map(|j| U.nzval[U.colptr[j + 1] - 1]))
    }
}
