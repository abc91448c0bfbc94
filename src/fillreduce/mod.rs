//! Fill-reducing permutations.
//!
//! A strategy computes a row and/or column permutation from the sparsity
//! pattern of a matrix.  [`ApplyFillReduction`] binds a strategy to the
//! matrices handed to a sparse factorization.

use crate::algebra::*;
use enum_dispatch::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod apply;
pub use apply::*;

/// User facing choice of fill-reducing strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FillReducing {
    /// factorize the matrix as given
    None,
    /// identity permutations, exercising the permuted code paths
    Identity,
    /// uniformly random permutations from a seeded generator
    Random,
    /// approximate minimum degree ordering
    #[default]
    Amd,
}

impl FillReducing {
    /// Builds the strategy for the requested kinds of permutation.
    pub fn build(
        &self,
        has_row: bool,
        has_column: bool,
        seed: u64,
        amd_dense_scale: f64,
    ) -> ComputePermutation {
        match self {
            FillReducing::None => NoPermutation::new().into(),
            FillReducing::Identity => IdentityPermutation::new(has_row, has_column).into(),
            FillReducing::Random => RandomPermutation::new(has_row, has_column, seed).into(),
            FillReducing::Amd => AmdPermutation::new(has_row, has_column, amd_dense_scale).into(),
        }
    }
}

#[enum_dispatch(ComputePermutationTrait)]
#[derive(Debug, Clone)]
pub enum ComputePermutation {
    NoPermutation(NoPermutation),
    IdentityPermutation(IdentityPermutation),
    RandomPermutation(RandomPermutation),
    AmdPermutation(AmdPermutation),
}

/// Capability interface of the fill-reducing strategies.
#[enum_dispatch]
pub trait ComputePermutationTrait {
    /// Computes and stores the requested permutations for `pattern`.
    fn process(&mut self, pattern: SparsityPattern<'_>) -> Result<(), LinalgError>;

    /// Row permutation from the last call to `process`, if one was requested
    fn row(&self) -> Option<&Permutation>;

    /// Column permutation from the last call to `process`, if one was requested
    fn column(&self) -> Option<&Permutation>;

    fn has_row(&self) -> bool;
    fn has_column(&self) -> bool;
}

// ---------------------------------
// no permutation
// ---------------------------------

#[derive(Debug, Clone, Default)]
pub struct NoPermutation;

impl NoPermutation {
    pub fn new() -> Self {
        Self
    }
}

impl ComputePermutationTrait for NoPermutation {
    fn process(&mut self, pattern: SparsityPattern<'_>) -> Result<(), LinalgError> {
        pattern.check()
    }
    fn row(&self) -> Option<&Permutation> {
        None
    }
    fn column(&self) -> Option<&Permutation> {
        None
    }
    fn has_row(&self) -> bool {
        false
    }
    fn has_column(&self) -> bool {
        false
    }
}

// ---------------------------------
// identity
// ---------------------------------

#[derive(Debug, Clone)]
pub struct IdentityPermutation {
    has_row: bool,
    has_column: bool,
    row: Option<Permutation>,
    column: Option<Permutation>,
}

impl IdentityPermutation {
    pub fn new(has_row: bool, has_column: bool) -> Self {
        Self {
            has_row,
            has_column,
            row: None,
            column: None,
        }
    }
}

impl ComputePermutationTrait for IdentityPermutation {
    fn process(&mut self, pattern: SparsityPattern<'_>) -> Result<(), LinalgError> {
        pattern.check()?;
        self.row = self.has_row.then(|| Permutation::identity(pattern.m));
        self.column = self.has_column.then(|| Permutation::identity(pattern.n));
        Ok(())
    }
    fn row(&self) -> Option<&Permutation> {
        self.row.as_ref()
    }
    fn column(&self) -> Option<&Permutation> {
        self.column.as_ref()
    }
    fn has_row(&self) -> bool {
        self.has_row
    }
    fn has_column(&self) -> bool {
        self.has_column
    }
}

// ---------------------------------
// random
// ---------------------------------

#[derive(Debug, Clone)]
pub struct RandomPermutation {
    has_row: bool,
    has_column: bool,
    rng: StdRng,
    row: Option<Permutation>,
    column: Option<Permutation>,
}

impl RandomPermutation {
    pub fn new(has_row: bool, has_column: bool, seed: u64) -> Self {
        Self {
            has_row,
            has_column,
            rng: StdRng::seed_from_u64(seed),
            row: None,
            column: None,
        }
    }
}

impl ComputePermutationTrait for RandomPermutation {
    fn process(&mut self, pattern: SparsityPattern<'_>) -> Result<(), LinalgError> {
        pattern.check()?;
        self.row = None;
        self.column = None;
        if self.has_row {
            self.row = Some(Permutation::random(pattern.m, &mut self.rng));
        }
        if self.has_column {
            self.column = Some(Permutation::random(pattern.n, &mut self.rng));
        }
        Ok(())
    }
    fn row(&self) -> Option<&Permutation> {
        self.row.as_ref()
    }
    fn column(&self) -> Option<&Permutation> {
        self.column.as_ref()
    }
    fn has_row(&self) -> bool {
        self.has_row
    }
    fn has_column(&self) -> bool {
        self.has_column
    }
}

// ---------------------------------
// approximate minimum degree
// ---------------------------------

/// Approximate minimum degree ordering.
///
/// With both kinds requested on a square pattern, a single symmetric
/// ordering of `A+Aᵀ` is computed and returned as both the row and the
/// column permutation.  Otherwise columns are ordered on the pattern of
/// `AᵀA` and rows on the pattern of `AAᵀ`.
#[derive(Debug, Clone)]
pub struct AmdPermutation {
    has_row: bool,
    has_column: bool,
    dense_scale: f64,
    row: Option<Permutation>,
    column: Option<Permutation>,
}

impl AmdPermutation {
    pub fn new(has_row: bool, has_column: bool, dense_scale: f64) -> Self {
        Self {
            has_row,
            has_column,
            dense_scale,
            row: None,
            column: None,
        }
    }

    fn order(&self, n: usize, colptr: &[usize], rowval: &[usize]) -> Permutation {
        // computes a permutation using AMD default parameters, with the
        // dense row threshold scaled
        let mut control = amd::Control::default();
        control.dense *= self.dense_scale;

        match amd::order(n, colptr, &rowval[..colptr[n]], &control) {
            Ok((perm, iperm, _info)) => Permutation::from_parts_unchecked(perm, iperm),
            Err(_) => {
                log::warn!(target: "blocksparse::fillreduce", "amd ordering failed for n = {}, using the identity", n);
                Permutation::identity(n)
            }
        }
    }
}

impl ComputePermutationTrait for AmdPermutation {
    fn process(&mut self, pattern: SparsityPattern<'_>) -> Result<(), LinalgError> {
        pattern.check()?;
        self.row = None;
        self.column = None;

        if self.has_row && self.has_column && pattern.m == pattern.n {
            // amd orders the pattern of A+Aᵀ
            let p = self.order(pattern.n, pattern.colptr, pattern.rowval);
            self.row = Some(p.clone());
            self.column = Some(p);
            return Ok(());
        }
        if self.has_column {
            let (colptr, rowval) = pattern_ata(pattern);
            self.column = Some(self.order(pattern.n, &colptr, &rowval));
        }
        if self.has_row {
            let (tp, ti) = pattern_transpose(pattern);
            let t = SparsityPattern {
                m: pattern.n,
                n: pattern.m,
                colptr: &tp,
                rowval: &ti,
            };
            let (colptr, rowval) = pattern_ata(t);
            self.row = Some(self.order(pattern.m, &colptr, &rowval));
        }
        Ok(())
    }
    fn row(&self) -> Option<&Permutation> {
        self.row.as_ref()
    }
    fn column(&self) -> Option<&Permutation> {
        self.column.as_ref()
    }
    fn has_row(&self) -> bool {
        self.has_row
    }
    fn has_column(&self) -> bool {
        self.has_column
    }
}

/// Pattern of `Aᵀ`, with sorted row indices
pub fn pattern_transpose(p: SparsityPattern<'_>) -> (Vec<usize>, Vec<usize>) {
    let nnz = p.nnz();
    let mut colptr = vec![0; p.m + 1];
    let mut rowval = vec![0; nnz];
    let mut next = vec![0; p.m];
    for &r in &p.rowval[..nnz] {
        next[r] += 1;
    }
    cumsum(&mut colptr, &mut next);
    for col in 0..p.n {
        for &r in p.column(col) {
            rowval[next[r]] = col;
            next[r] += 1;
        }
    }
    (colptr, rowval)
}

/// Pattern of `AᵀA`, with sorted row indices
pub fn pattern_ata(p: SparsityPattern<'_>) -> (Vec<usize>, Vec<usize>) {
    let (tp, ti) = pattern_transpose(p);
    let mut colptr = vec![0; p.n + 1];
    let mut rowval = Vec::with_capacity(p.nnz());
    let mut mark = vec![NONE; p.n];

    // column j of AᵀA is the union of the rows of Aᵀ hit by column j of A
    for j in 0..p.n {
        let start = rowval.len();
        for &i in p.column(j) {
            for &k in &ti[tp[i]..tp[i + 1]] {
                if mark[k] != j {
                    mark[k] = j;
                    rowval.push(k);
                }
            }
        }
        rowval[start..].sort_unstable();
        colptr[j + 1] = rowval.len();
    }
    (colptr, rowval)
}

#[cfg(test)]
mod tests {
    use super::*;

    // arrow matrix, dense first row and column: natural order fills completely
    fn arrow(n: usize) -> CscMatrix<f64> {
        let mut A = TripletMatrix::new(n, n);
        for i in 0..n {
            A.add_item(i, i, 4.);
            if i > 0 {
                A.add_item(0, i, 1.);
            }
        }
        A.to_csc()
    }

    #[test]
    fn test_no_permutation() {
        let A = arrow(4);
        let mut p = FillReducing::None.build(true, true, 0, 1.0);
        p.process(A.pattern()).unwrap();
        assert!(p.row().is_none() && p.column().is_none());
    }

    #[test]
    fn test_identity_permutation() {
        let A = CscMatrix::<f64>::spalloc((3, 5), 0);
        let mut p = FillReducing::Identity.build(false, true, 0, 1.0);
        p.process(A.pattern()).unwrap();
        assert!(p.row().is_none());
        assert_eq!(p.column().unwrap().perm(), &[0, 1, 2, 3, 4]);
        assert!(!p.has_row() && p.has_column());
    }

    #[test]
    fn test_random_permutation_reproducible() {
        let A = arrow(10);
        let mut p1 = FillReducing::Random.build(true, true, 17, 1.0);
        let mut p2 = FillReducing::Random.build(true, true, 17, 1.0);
        p1.process(A.pattern()).unwrap();
        p2.process(A.pattern()).unwrap();
        assert_eq!(p1.row(), p2.row());
        assert_eq!(p1.column(), p2.column());
        assert_eq!(p1.column().unwrap().len(), 10);
    }

    #[test]
    fn test_amd_moves_dense_node_back() {
        let A = arrow(6).to_triu();
        let mut p = FillReducing::Amd.build(true, true, 0, 1.0);
        p.process(A.pattern()).unwrap();
        let perm = p.column().unwrap();
        assert!(Permutation::new(perm.perm().to_vec()).is_ok());
        // the hub is only eliminated once at most one leaf is left
        assert!(perm.iperm()[0] >= 4);
        assert_eq!(p.row(), p.column());
    }

    #[test]
    fn test_amd_rectangular() {
        let A = CscMatrix::<f64>::random_uniform(8, 5, 15, -1., 1., &mut StdRng::seed_from_u64(5));
        let mut p = FillReducing::Amd.build(true, true, 0, 1.0);
        p.process(A.pattern()).unwrap();
        assert_eq!(p.row().unwrap().len(), 8);
        assert_eq!(p.column().unwrap().len(), 5);
    }

    #[test]
    fn test_bad_pattern() {
        let colptr = [0, 2, 1];
        let rowval = [0, 1];
        let pattern = SparsityPattern {
            m: 2,
            n: 2,
            colptr: &colptr,
            rowval: &rowval,
        };
        let mut p = FillReducing::Identity.build(true, true, 0, 1.0);
        assert!(p.process(pattern).is_err());

        let pattern = SparsityPattern {
            m: 2,
            n: 3,
            colptr: &colptr,
            rowval: &rowval,
        };
        assert_eq!(
            p.process(pattern),
            Err(LinalgError::InvalidArgument(
                "pattern arrays are inconsistent with the matrix dimensions"
            ))
        );
    }

    #[test]
    fn test_pattern_ata() {
        // [x . x]
        // [. x .]
        let colptr = [0, 1, 2, 3];
        let rowval = [0, 1, 0];
        let p = SparsityPattern {
            m: 2,
            n: 3,
            colptr: &colptr,
            rowval: &rowval,
        };
        let (cp, ri) = pattern_ata(p);
        assert_eq!(cp, vec![0, 2, 3, 5]);
        assert_eq!(ri, vec![0, 2, 1, 0, 2]);
    }
}
