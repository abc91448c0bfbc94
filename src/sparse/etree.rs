#![allow(non_snake_case)]

use crate::algebra::NONE;

/// Elimination tree of a symmetric matrix given by its upper triangle,
/// together with the number of strictly subdiagonal nonzeros in each
/// column of its Cholesky factor.
///
/// Entries below the diagonal are ignored.  Roots have parent `NONE`.
pub(crate) fn etree_cholesky(
    n: usize,
    Ap: &[usize],
    Ai: &[usize],
    work: &mut [usize],
    Lnz: &mut [usize],
    etree: &mut [usize],
) {
    // zero out Lnz and work.  Set all etree values to unknown
    work.fill(0);
    Lnz.fill(0);
    etree.fill(NONE);

    for j in 0..n {
        work[j] = j;
        for &istart in &Ai[Ap[j]..Ap[j + 1]] {
            if istart > j {
                continue;
            }
            let mut i = istart;
            while work[i] != j {
                if etree[i] == NONE {
                    etree[i] = j;
                }
                Lnz[i] += 1; // nonzeros in this column
                work[i] = j;
                i = etree[i];
            }
        }
    }
}

/// Elimination tree of `A` (upper triangle used), or of `AᵀA` when `ata`
/// is set, without forming `AᵀA`.
///
/// `ancestor` needs length `n`, `prev` length `m` when `ata` is set.
#[allow(clippy::too_many_arguments)]
pub(crate) fn etree(
    m: usize,
    n: usize,
    Ap: &[usize],
    Ai: &[usize],
    ata: bool,
    parent: &mut [usize],
    ancestor: &mut [usize],
    prev: &mut [usize],
) {
    parent[..n].fill(NONE);
    ancestor[..n].fill(NONE);
    if ata {
        prev[..m].fill(NONE);
    }

    for k in 0..n {
        for p in Ap[k]..Ap[k + 1] {
            let mut i = if ata { prev[Ai[p]] } else { Ai[p] };
            // traverse from i to k, compressing the path
            while i != NONE && i < k {
                let inext = ancestor[i];
                ancestor[i] = k;
                if inext == NONE {
                    parent[i] = k;
                }
                i = inext;
            }
            if ata {
                prev[Ai[p]] = k;
            }
        }
    }
}

/// Nonzero pattern of row `k` of the Cholesky factor, found by walking
/// the elimination tree from the entries of column `k` of the upper
/// triangle.
///
/// The pattern is written to `s[top..n]` in topological order and `top`
/// is returned.  `w` holds stamps: `w[i] == k` marks `i` visited for row
/// `k`, so it never needs clearing between rows.
pub(crate) fn ereach(
    n: usize,
    Ap: &[usize],
    Ai: &[usize],
    k: usize,
    parent: &[usize],
    s: &mut [usize],
    w: &mut [usize],
) -> usize {
    let mut top = n;
    w[k] = k;
    for &row in &Ai[Ap[k]..Ap[k + 1]] {
        if row > k {
            continue;
        }
        // find the path from row to the root of the marked subtree
        let mut i = row;
        let mut len = 0;
        while w[i] != k {
            s[len] = i;
            len += 1;
            w[i] = k;
            i = parent[i];
        }
        // push the path onto the stack
        while len > 0 {
            len -= 1;
            top -= 1;
            s[top] = s[len];
        }
    }
    top
}

#[cfg(test)]
mod tests {
    use super::*;

    // upper triangle of the pattern
    // [x x . x]
    // [x x . .]
    // [. . x x]
    // [x . x x]
    fn pattern() -> (Vec<usize>, Vec<usize>) {
        (vec![0, 1, 3, 4, 7], vec![0, 0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn test_etree_cholesky() {
        let (Ap, Ai) = pattern();
        let mut work = vec![0; 4];
        let mut Lnz = vec![0; 4];
        let mut tree = vec![0; 4];
        etree_cholesky(4, &Ap, &Ai, &mut work, &mut Lnz, &mut tree);

        // L(1,0), L(3,0), L(3,1) fill, L(3,2)
        assert_eq!(tree, vec![1, 3, 3, NONE]);
        assert_eq!(Lnz, vec![2, 1, 1, 0]);

        // the general version agrees
        let mut parent = vec![0; 4];
        let mut ancestor = vec![0; 4];
        etree(4, 4, &Ap, &Ai, false, &mut parent, &mut ancestor, &mut []);
        assert_eq!(parent, tree);
    }

    #[test]
    fn test_ereach() {
        let (Ap, Ai) = pattern();
        let parent = vec![1, 3, 3, NONE];
        let mut s = vec![0; 4];
        let mut w = vec![NONE; 4];

        // row 3 of L has entries in columns 0, 1 and 2
        let top = ereach(4, &Ap, &Ai, 3, &parent, &mut s, &mut w);
        let mut row: Vec<usize> = s[top..].to_vec();
        row.sort();
        assert_eq!(row, vec![0, 1, 2]);

        // row 1 has only column 0
        let top = ereach(4, &Ap, &Ai, 1, &parent, &mut s, &mut w);
        assert_eq!(&s[top..], &[0]);
    }

    #[test]
    fn test_column_etree() {
        // A = [x x]
        //     [. x]
        //     [x .]   AᵀA is full, so column 0 has parent 1
        let Ap = vec![0, 2, 4];
        let Ai = vec![0, 2, 0, 1];
        let mut parent = vec![0; 2];
        let mut ancestor = vec![0; 2];
        let mut prev = vec![0; 3];
        etree(3, 2, &Ap, &Ai, true, &mut parent, &mut ancestor, &mut prev);
        assert_eq!(parent, vec![1, NONE]);
    }
}
