#![allow(non_snake_case)]
//! Triangular solves against CSC factors.
//!
//! Lower triangular factors store their diagonal first in each column and
//! upper triangular factors store it last, which is the layout produced by
//! the decompositions in this module.

use crate::algebra::*;

/// Solves `L x = b` in place, `L` lower triangular with its diagonal
/// stored first in each column.
pub fn lsolve<T: FloatT>(L: &CscMatrix<T>, x: &mut [T]) {
    let (Lp, Li, Lx) = (&L.colptr, &L.rowval, &L.nzval);
    for j in 0..L.n {
        x[j] /= Lx[Lp[j]];
        let xj = x[j];
        for p in (Lp[j] + 1)..Lp[j + 1] {
            x[Li[p]] -= Lx[p] * xj;
        }
    }
}

/// Solves `Lᵀ x = b` in place, `L` as in [`lsolve`].
pub fn ltsolve<T: FloatT>(L: &CscMatrix<T>, x: &mut [T]) {
    let (Lp, Li, Lx) = (&L.colptr, &L.rowval, &L.nzval);
    for j in (0..L.n).rev() {
        let mut xj = x[j];
        for p in (Lp[j] + 1)..Lp[j + 1] {
            xj -= Lx[p] * x[Li[p]];
        }
        x[j] = xj / Lx[Lp[j]];
    }
}

/// Solves `U x = b` in place, `U` upper triangular with its diagonal
/// stored last in each column.  Only the leading `U.n` entries of `x` are
/// touched.
pub fn usolve<T: FloatT>(U: &CscMatrix<T>, x: &mut [T]) {
    let (Up, Ui, Ux) = (&U.colptr, &U.rowval, &U.nzval);
    for j in (0..U.n).rev() {
        x[j] /= Ux[Up[j + 1] - 1];
        let xj = x[j];
        for p in Up[j]..(Up[j + 1] - 1) {
            x[Ui[p]] -= Ux[p] * xj;
        }
    }
}

/// Solves `Uᵀ x = b` in place, `U` as in [`usolve`].
pub fn utsolve<T: FloatT>(U: &CscMatrix<T>, x: &mut [T]) {
    let (Up, Ui, Ux) = (&U.colptr, &U.rowval, &U.nzval);
    for j in 0..U.n {
        let mut xj = x[j];
        for p in Up[j]..(Up[j + 1] - 1) {
            xj -= Ux[p] * x[Ui[p]];
        }
        x[j] = xj / Ux[Up[j + 1] - 1];
    }
}

/// Depth-first search of the graph of `G` starting at node `j`.
///
/// Node `j` of the graph is column `pinv[j]` of `G`; nodes whose column is
/// `NONE` have no outgoing edges.  Finished nodes are pushed onto
/// `xi[top..]` and the new `top` is returned.  The recursion stack lives
/// in `xi[..top]` and `pstack`.
pub fn dfs(
    j: usize,
    G: SparsityPattern<'_>,
    mut top: usize,
    xi: &mut [usize],
    pstack: &mut [usize],
    marked: &mut [bool],
    pinv: Option<&[usize]>,
) -> usize {
    let (Gp, Gi) = (G.colptr, G.rowval);
    let mut head = 0;
    xi[0] = j;

    loop {
        let j = xi[head];
        let jnew = pinv.map_or(j, |pinv| pinv[j]);
        if !marked[j] {
            marked[j] = true;
            pstack[head] = if jnew == NONE { 0 } else { Gp[jnew] };
        }
        let pend = if jnew == NONE { 0 } else { Gp[jnew + 1] };

        // descend into the first unvisited child, if any
        let mut done = true;
        for p in pstack[head]..pend {
            let i = Gi[p];
            if marked[i] {
                continue;
            }
            pstack[head] = p;
            head += 1;
            xi[head] = i;
            done = false;
            break;
        }

        if done {
            top -= 1;
            xi[top] = j;
            if head == 0 {
                return top;
            }
            head -= 1;
        }
    }
}

/// Nonzero pattern of the solution `x` of `G x = B(:,k)` for a triangular
/// `G`, written to `xi[top..n]` in topological order.  Returns `top`.
///
/// `xi` and `pstack` need length `G.n` and `marked` must be all false on
/// entry; it is restored on return.
pub fn reach(
    G: SparsityPattern<'_>,
    B: SparsityPattern<'_>,
    k: usize,
    xi: &mut [usize],
    pstack: &mut [usize],
    marked: &mut [bool],
    pinv: Option<&[usize]>,
) -> usize {
    let n = G.n;
    let mut top = n;
    for &i in B.column(k) {
        if !marked[i] {
            top = dfs(i, G, top, xi, pstack, marked, pinv);
        }
    }
    for &i in &xi[top..n] {
        marked[i] = false;
    }
    top
}

/// Solves `G x = B(:,k)` for a sparse right-hand side, with `G` lower
/// (`lower == true`, diagonal first) or upper (diagonal last) triangular.
///
/// Only the entries of `x` in the returned pattern `xi[top..n]` are
/// meaningful; those are written, everything else is left alone.  With
/// `pinv` given, row `i` of the system is column `pinv[i]` of `G` and rows
/// mapping to `NONE` are passed through unchanged.
#[allow(clippy::too_many_arguments)]
pub fn spsolve<T: FloatT>(
    G: &CscMatrix<T>,
    B: &CscMatrix<T>,
    k: usize,
    xi: &mut [usize],
    pstack: &mut [usize],
    marked: &mut [bool],
    x: &mut [T],
    pinv: Option<&[usize]>,
    lower: bool,
) -> usize {
    let (Gp, Gi, Gx) = (&G.colptr, &G.rowval, &G.nzval);
    let n = G.n;

    let top = reach(G.pattern(), B.pattern(), k, xi, pstack, marked, pinv);

    // clear the pattern, then scatter B(:,k)
    for &i in &xi[top..n] {
        x[i] = T::zero();
    }
    for p in B.colptr[k]..B.colptr[k + 1] {
        x[B.rowval[p]] = B.nzval[p];
    }

    for &j in &xi[top..n] {
        let J = pinv.map_or(j, |pinv| pinv[j]);
        if J == NONE {
            continue;
        }
        let (diag, rest) = if lower {
            (Gp[J], (Gp[J] + 1)..Gp[J + 1])
        } else {
            (Gp[J + 1] - 1, Gp[J]..(Gp[J + 1] - 1))
        };
        x[j] /= Gx[diag];
        let xj = x[j];
        for p in rest {
            x[Gi[p]] -= Gx[p] * xj;
        }
    }
    top
}
