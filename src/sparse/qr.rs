#![allow(non_snake_case)]

use super::etree::etree;
use super::householder::*;
use super::AnalysedPattern;
use crate::algebra::*;
use crate::fillreduce::*;

/// Left-looking sparse Householder QR decomposition of an `m x n` matrix
/// with `m ≥ n`, `P A Q = Q_h R`.
///
/// `Q_h` is held implicitly as Householder vectors (columns of `V`) and
/// scalars `beta`.  The row permutation `pinv` may add fictitious empty
/// rows, so `V` and `R` have `m2 ≥ m` rows.
#[derive(Debug, Clone)]
pub struct QrLeftLooking<T = f64> {
    fill: ApplyFillReduction,
    singular_tol: T,
    V: CscMatrix<T>,
    beta: Vec<T>,
    R: CscMatrix<T>,

    // symbolic analysis
    parent: Vec<usize>,
    leftmost: Vec<usize>,
    pinv: Vec<usize>,
    m2: usize,
    analysed: Option<AnalysedPattern>,
    locked: bool,
    factored: bool,

    // workspace
    stamp: GrowArray<usize>,
    stack: GrowArray<usize>,
    x: GrowArray<T>,
}

impl<T: FloatT> QrLeftLooking<T> {
    /// `R` is declared singular when some `|R(k,k)|` is at most
    /// `singular_tol` times the largest diagonal magnitude.
    pub fn new(strategy: ComputePermutation, singular_tol: T) -> Self {
        Self {
            fill: ApplyFillReduction::new(strategy, false),
            singular_tol,
            V: CscMatrix::zeros((0, 0)),
            beta: Vec::new(),
            R: CscMatrix::zeros((0, 0)),
            parent: Vec::new(),
            leftmost: Vec::new(),
            pinv: Vec::new(),
            m2: 0,
            analysed: None,
            locked: false,
            factored: false,
            stamp: GrowArray::new(),
            stack: GrowArray::new(),
            x: GrowArray::new(),
        }
    }

    /// Decomposes `A`.  Returns `Ok(false)` if `R` is singular to within
    /// the configured tolerance.
    pub fn decompose(&mut self, A: &CscMatrix<T>) -> Result<bool, LinalgError> {
        if A.m < A.n {
            return Err(LinalgError::InvalidArgument("QR requires at least as many rows as columns"));
        }
        A.check_format()?;

        let reuse = match (self.locked, &self.analysed) {
            (true, Some(analysed)) => {
                if !analysed.matches(A.pattern()) {
                    return Err(LinalgError::SparsityMismatch);
                }
                log::trace!(target: "blocksparse::qr", "structure locked, skipping symbolic analysis");
                true
            }
            _ => false,
        };

        let C = self.fill.apply(A)?;
        if !reuse {
            self.symbolic(&C);
            self.analysed = Some(AnalysedPattern::new(A.pattern()));
        }
        self.factored = false;
        self.numeric(&C);
        self.factored = self.check_rank();
        Ok(self.factored)
    }

    fn symbolic(&mut self, C: &CscMatrix<T>) {
        let (m, n) = (C.m, C.n);

        // column elimination tree, the etree of CᵀC
        self.parent.resize(n, NONE);
        let mut ancestor = vec![NONE; n];
        let mut prev = vec![NONE; m];
        etree(m, n, &C.colptr, &C.rowval, true, &mut self.parent, &mut ancestor, &mut prev);

        self.m2 = vcount(C.pattern(), &self.parent, &mut self.pinv, &mut self.leftmost);
    }

    fn numeric(&mut self, C: &CscMatrix<T>) {
        let (m2, n) = (self.m2, C.n);
        let (parent, leftmost, pinv) = (&self.parent, &self.leftmost, &self.pinv);
        let (V, R, beta) = (&mut self.V, &mut self.R, &mut self.beta);

        for F in [&mut *V, &mut *R] {
            F.m = m2;
            F.n = n;
            F.colptr.clear();
            F.colptr.resize(n + 1, 0);
            F.rowval.clear();
            F.nzval.clear();
        }
        beta.clear();
        beta.resize(n, T::zero());

        // w[i] == k + 1 marks row or column i as visited in step k
        let w = self.stamp.adjust(m2);
        let s = self.stack.adjust(n);
        let x = self.x.adjust(m2);

        for k in 0..n {
            let mark = k + 1;
            R.colptr[k] = R.rowval.len();
            let p1 = V.rowval.len();
            V.colptr[k] = p1;

            // V(:,k) starts with the pivot row
            w[k] = mark;
            V.rowval.push(k);
            V.nzval.push(T::zero());

            let mut top = n;
            for p in C.colptr[k]..C.colptr[k + 1] {
                let row = C.rowval[p];

                // pattern of R(:,k): path from leftmost[row] up the tree
                let mut i = leftmost[row];
                let mut len = 0;
                while w[i] != mark {
                    s[len] = i;
                    len += 1;
                    w[i] = mark;
                    i = parent[i];
                }
                while len > 0 {
                    len -= 1;
                    top -= 1;
                    s[top] = s[len];
                }

                // scatter C(:,k) in permuted row order
                let i = pinv[row];
                x[i] = C.nzval[p];
                if i > k && w[i] < mark {
                    V.rowval.push(i);
                    V.nzval.push(T::zero());
                    w[i] = mark;
                }
            }

            // apply the previous reflectors along the pattern of R(:,k)
            for &i in &s[top..n] {
                happly(V, i, beta[i], x);
                R.rowval.push(i);
                R.nzval.push(x[i]);
                x[i] = T::zero();
                if parent[i] == k {
                    // V(:,k) inherits the pattern of its etree child
                    for q in V.colptr[i]..V.colptr[i + 1] {
                        let r = V.rowval[q];
                        if w[r] < mark {
                            w[r] = mark;
                            V.rowval.push(r);
                            V.nzval.push(T::zero());
                        }
                    }
                }
            }

            // gather V(:,k) and reduce it
            for p in p1..V.rowval.len() {
                V.nzval[p] = x[V.rowval[p]];
                x[V.rowval[p]] = T::zero();
            }
            let (rkk, bk) = house(&mut V.nzval[p1..]);
            beta[k] = bk;
            R.rowval.push(k);
            R.nzval.push(rkk);
        }
        R.colptr[n] = R.rowval.len();
        V.colptr[n] = V.rowval.len();

        R.sort_indices();
        V.sort_indices();
    }

    fn check_rank(&self) -> bool {
        let R = &self.R;
        let diag = |k: usize| T::abs(R.nzval[R.colptr[k + 1] - 1]);
        let max = (0..R.n).fold(T::zero(), |m, k| T::max(m, diag(k)));
        if R.n > 0 && max == T::zero() {
            log::debug!(target: "blocksparse::qr", "R is identically zero");
            return false;
        }
        for k in 0..R.n {
            if diag(k) <= self.singular_tol * max {
                log::debug!(target: "blocksparse::qr", "rank deficient at column {}: |R(k,k)| = {:e}", k, diag(k));
                return false;
            }
        }
        true
    }

    /// Reuses the column permutation and symbolic analysis of the last
    /// decomposition for later matrices with the same pattern.
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

    /// Householder vectors, one per column
    pub fn v(&self) -> &CscMatrix<T> {
        &self.V
    }

    /// Householder scalars, one per column
    pub fn beta(&self) -> &[T] {
        &self.beta
    }

    /// upper triangular factor, `m2 x n`
    pub fn r(&self) -> &CscMatrix<T> {
        &self.R
    }

    /// row permutation: row `i` of `A` is row `pinv[i]` of `V` and `R`.
    /// Entries from `m` on belong to fictitious rows.
    pub fn pinv(&self) -> &[usize] {
        &self.pinv
    }

    /// number of rows after adding fictitious rows
    pub fn m2(&self) -> usize {
        self.m2
    }

    /// fill-reducing column permutation, if any was applied
    pub fn column_permutation(&self) -> Option<&Permutation> {
        self.fill.column()
    }

    /// Product of `|R(i,i)| / max|R(k,k)|` over the diagonal
    pub fn quality(&self) -> T {
        if !self.factored {
            return T::zero();
        }
        let R = &self.R;
        super::diagonal_quality((0..R.n).map(|j| R.nzval[R.colptr[j + 1] - 1]))
    }
}

/// Row permutation for sparse QR and the leftmost column of each row.
///
/// Every column `k` gets a pivot row whose leftmost entry is in column
/// `k`; rows not chosen are passed up the column elimination tree.  When
/// no row is available a fictitious one is created.  Returns the number of
/// rows including fictitious ones; `pinv` has that length.
fn vcount(C: SparsityPattern<'_>, parent: &[usize], pinv: &mut Vec<usize>, leftmost: &mut Vec<usize>) -> usize {
    let (m, n) = (C.m, C.n);

    leftmost.clear();
    leftmost.resize(m, NONE);
    for k in (0..n).rev() {
        for &i in C.column(k) {
            leftmost[i] = k;
        }
    }

    // queue of rows for each column, linked through next
    let mut next = vec![NONE; m];
    let mut head = vec![NONE; n];
    let mut tail = vec![NONE; n];
    let mut nque = vec![0usize; n];
    for i in (0..m).rev() {
        let k = leftmost[i];
        if k == NONE {
            continue;
        }
        if nque[k] == 0 {
            tail[k] = i;
        }
        nque[k] += 1;
        next[i] = head[k];
        head[k] = i;
    }

    pinv.clear();
    pinv.resize(m + n, NONE);
    let mut m2 = m;
    for k in 0..n {
        let mut i = head[k];
        if i == NONE {
            i = m2;
            m2 += 1;
        }
        pinv[i] = k;
        if nque[k] <= 1 {
            continue;
        }
        nque[k] -= 1;
        let pa = parent[k];
        if pa != NONE {
            if nque[pa] == 0 {
                tail[pa] = tail[k];
            }
            next[tail[k]] = head[pa];
            head[pa] = next[i];
            nque[pa] += nque[k];
        }
    }

    // rows never chosen go last
    let mut k = n;
    for p in pinv.iter_mut().take(m) {
        if *p == NONE {
            *p = k;
            k += 1;
        }
    }
    pinv.truncate(m2);
    m2
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // [1. . 2.]
    // [. 3. .]
    // [4. . .]
    // [. 5. 6.]
    // [. . 7.]
    fn test_matrix() -> CscMatrix<f64> {
        CscMatrix::new(
            5,
            3,
            vec![0, 2, 4, 7],
            vec![0, 2, 1, 3, 0, 3, 4],
            vec![1., 4., 3., 5., 2., 6., 7.],
        )
    }

    fn qr(fill: FillReducing) -> QrLeftLooking<f64> {
        QrLeftLooking::new(fill.build(false, true, 5, 1.0), f64::EPSILON)
    }

    // RᵀR = (AQ)ᵀ(AQ) holds whatever the row permutation and reflectors
    fn check_normal_equations(f: &QrLeftLooking<f64>, A: &CscMatrix<f64>) {
        let R = f.r();
        let RtR = R.transpose().mul(R).unwrap();
        let AQ = A.permute(None, f.column_permutation().map(|q| q.perm())).unwrap();
        let AtA = AQ.transpose().mul(&AQ).unwrap();
        assert!(RtR.is_equals(&AtA, 1e-10));
    }

    #[test]
    fn test_qr_factors() {
        let A = test_matrix();
        for fill in [FillReducing::None, FillReducing::Identity, FillReducing::Random, FillReducing::Amd] {
            let mut f = qr(fill);
            assert!(f.decompose(&A).unwrap());
            assert!(f.m2() >= 5);
            assert_eq!(f.pinv().len(), f.m2());
            assert!(Permutation::new(f.pinv().to_vec()).is_ok());
            assert!(f.r().check_format().is_ok());
            assert!(f.v().check_format().is_ok());
            check_normal_equations(&f, &A);
            assert!(f.quality() > 0.);
        }
    }

    #[test]
    fn test_qr_random() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut A = CscMatrix::<f64>::random_uniform(40, 25, 120, -1., 1., &mut rng);
        // make full column rank certain
        for j in 0..25 {
            A = add_entry(&A, j, j, 10.);
        }
        let mut f = qr(FillReducing::Amd);
        assert!(f.decompose(&A).unwrap());
        check_normal_equations(&f, &A);
    }

    fn add_entry(A: &CscMatrix<f64>, i: usize, j: usize, v: f64) -> CscMatrix<f64> {
        let mut trip = TripletMatrix::from_csc(A);
        trip.add_item(i, j, v);
        trip.to_csc()
    }

    #[test]
    fn test_qr_rows_passed_up() {
        // rows 0 and 1 both start in column 0, so row 1 is handed to
        // column 1 through the column elimination tree
        // [1 1]
        // [1 2]
        // [. .]
        let A = CscMatrix::new(3, 2, vec![0, 2, 4], vec![0, 1, 0, 1], vec![1., 1., 1., 2.]);
        let mut f = qr(FillReducing::None);
        assert!(f.decompose(&A).unwrap());
        assert_eq!(f.m2(), 3);
        assert_eq!(f.pinv(), &[0, 1, 2]);
        check_normal_equations(&f, &A);
    }

    #[test]
    fn test_qr_fictitious_rows() {
        // no row starts in column 1, so a fictitious one is added
        // [1 1]
        // [. .]
        // [. .]
        let A = CscMatrix::new(3, 2, vec![0, 1, 2], vec![0, 0], vec![1., 1.]);
        let mut f = qr(FillReducing::None);
        assert!(!f.decompose(&A).unwrap());
        assert_eq!(f.m2(), 4);
        assert_eq!(f.pinv(), &[0, 2, 3, 1]);
    }

    #[test]
    fn test_qr_rank_deficient() {
        let A = CscMatrix::new(3, 2, vec![0, 2, 4], vec![0, 1, 0, 1], vec![1., 2., 2., 4.]);
        assert!(!qr(FillReducing::None).decompose(&A).unwrap());

        let Z = CscMatrix::<f64>::zeros((3, 2));
        assert!(!qr(FillReducing::None).decompose(&Z).unwrap());
    }

    #[test]
    fn test_qr_wide_matrix() {
        let A = CscMatrix::<f64>::zeros((2, 3));
        assert!(matches!(qr(FillReducing::None).decompose(&A), Err(LinalgError::InvalidArgument(_))));
    }

    #[test]
    fn test_qr_locked_structure() {
        // [1 .]      [. 1]
        // [1 .]  vs  [. 1]
        // [. 1]      [1 .]
        let A = CscMatrix::new(3, 2, vec![0, 2, 3], vec![0, 1, 2], vec![1., 1., 1.]);
        let B = CscMatrix::new(3, 2, vec![0, 1, 3], vec![2, 0, 1], vec![1., 1., 1.]);

        let mut f = qr(FillReducing::None);
        assert!(f.decompose(&A).unwrap());
        f.lock_structure();
        assert!(f.is_structure_locked());

        // same pattern, new values
        let mut A2 = A.clone();
        A2.nzval[1] = 3.;
        assert!(f.decompose(&A2).unwrap());
        check_normal_equations(&f, &A2);

        assert_eq!(f.decompose(&B), Err(LinalgError::SparsityMismatch));
    }
}
