use crate::algebra::LinalgError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::iter::zip;

/// Marker for an unassigned index in elimination trees, pivot maps etc.
pub(crate) const NONE: usize = usize::MAX;

/// A permutation of `0..n` together with its inverse.
///
/// `perm[k]` is the original index placed at position `k`, and
/// `iperm[perm[k]] == k`.  Applying the permutation to a vector `b`
/// yields `x[k] = b[perm[k]]`, see [`permute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    perm: Vec<usize>,
    iperm: Vec<usize>,
}

impl Permutation {
    /// Creates a permutation from its forward vector.
    ///
    /// Fails if `perm` is not a bijection on `0..perm.len()`.
    pub fn new(perm: Vec<usize>) -> Result<Self, LinalgError> {
        let iperm = invperm(&perm)?;
        Ok(Self { perm, iperm })
    }

    /// Identity permutation of length `n`
    pub fn identity(n: usize) -> Self {
        let perm: Vec<usize> = (0..n).collect();
        Self {
            iperm: perm.clone(),
            perm,
        }
    }

    /// Uniformly random permutation of length `n`
    pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut perm: Vec<usize> = (0..n).collect();
        perm.shuffle(rng);
        let mut iperm = vec![0; n];
        ipermute(&mut iperm, &(0..n).collect::<Vec<_>>(), &perm);
        Self { perm, iperm }
    }

    pub(crate) fn from_parts_unchecked(perm: Vec<usize>, iperm: Vec<usize>) -> Self {
        debug_assert_eq!(perm.len(), iperm.len());
        Self { perm, iperm }
    }

    pub fn len(&self) -> usize {
        self.perm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    /// forward permutation vector
    pub fn perm(&self) -> &[usize] {
        &self.perm
    }

    /// inverse permutation vector
    pub fn iperm(&self) -> &[usize] {
        &self.iperm
    }

    /// The inverse permutation as a new object
    pub fn inverse(&self) -> Self {
        Self {
            perm: self.iperm.clone(),
            iperm: self.perm.clone(),
        }
    }
}

/// Construct an inverse permutation from a permutation
pub fn invperm(p: &[usize]) -> Result<Vec<usize>, LinalgError> {
    let mut b = vec![NONE; p.len()];

    for (i, j) in p.iter().enumerate() {
        if *j < p.len() && b[*j] == NONE {
            b[*j] = i;
        } else {
            return Err(LinalgError::InvalidPermutation);
        }
    }
    Ok(b)
}

/// Gathers `x[k] = b[p[k]]`.  No memory allocations.
pub fn permute<T: Copy>(x: &mut [T], b: &[T], p: &[usize]) {
    zip(p, x).for_each(|(p, x)| *x = b[*p]);
}

/// Scatters `x[p[k]] = b[k]`, the inverse of [`permute`].  No memory allocations.
pub fn ipermute<T: Copy>(x: &mut [T], b: &[T], p: &[usize]) {
    zip(p, b).for_each(|(p, b)| x[*p] = *b);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_invperm() {
        let perm = vec![3, 0, 2, 1];
        assert_eq!(invperm(&perm).unwrap(), vec![1, 3, 2, 0]);
    }

    //test fail on bad permutation
    #[test]
    fn test_invperm_bad_perm() {
        assert!(invperm(&[3, 0, 2, 0]).is_err()); //repeated index
        assert!(invperm(&[4, 0, 2, 1]).is_err()); //index too big
        assert!(Permutation::new(vec![1, 1]).is_err());
    }

    #[test]
    fn test_permute_ipermute() {
        let perm = vec![3, 0, 2, 1];
        let b = vec![1., 2., 3., 4.];
        let mut x = vec![0.; 4];
        let mut y = vec![0.; 4];

        permute(&mut x, &b, &perm);
        assert_eq!(x, vec![4., 1., 3., 2.]);

        ipermute(&mut y, &x, &perm);
        assert_eq!(y, b);
    }

    #[test]
    fn test_random_permutation_is_reproducible() {
        let p1 = Permutation::random(20, &mut StdRng::seed_from_u64(7));
        let p2 = Permutation::random(20, &mut StdRng::seed_from_u64(7));
        assert_eq!(p1, p2);
        assert!(Permutation::new(p1.perm().to_vec()).is_ok());
        for (k, &i) in p1.perm().iter().enumerate() {
            assert_eq!(p1.iperm()[i], k);
        }
    }
}
