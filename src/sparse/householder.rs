#![allow(non_snake_case)]

use crate::algebra::*;

/// Computes a Householder reflection `H = I - beta v vᵀ` such that
/// `H x = s e₁` with `s = ‖x‖ ≥ 0`.
///
/// `x` is overwritten with `v`.  Returns `(s, beta)`.
pub fn house<T: FloatT>(x: &mut [T]) -> (T, T) {
    if x.is_empty() {
        return (T::zero(), T::zero());
    }
    let sigma = x[1..].sumsq();
    let x0 = x[0];

    if sigma == T::zero() {
        let s = T::abs(x0);
        let beta = if x0 <= T::zero() { (2.).as_T() } else { T::zero() };
        x[0] = T::one();
        (s, beta)
    } else {
        let s = T::sqrt(x0 * x0 + sigma);
        x[0] = if x0 <= T::zero() { x0 - s } else { -sigma / (x0 + s) };
        let beta = -T::recip(s * x[0]);
        (s, beta)
    }
}

/// Applies the `i`-th Householder reflector stored in `V` to `x`:
/// `x = x - v beta (vᵀ x)` with `v = V(:,i)`.
pub fn happly<T: FloatT>(V: &CscMatrix<T>, i: usize, beta: T, x: &mut [T]) {
    let rng = V.colptr[i]..V.colptr[i + 1];
    let (Vi, Vx) = (&V.rowval[rng.clone()], &V.nzval[rng]);

    let mut tau = T::zero();
    for (&r, &v) in Vi.iter().zip(Vx) {
        tau += v * x[r];
    }
    tau *= beta;
    for (&r, &v) in Vi.iter().zip(Vx) {
        x[r] -= v * tau;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_house() {
        for x in [vec![3f64, 4., 0.], vec![-3., 4., 12.], vec![2., 0.], vec![-2., 0.]] {
            let mut v = x.clone();
            let (s, beta) = house(&mut v);
            assert!((s - x.norm()).abs() < 1e-14);

            // H x = s e₁
            let V = CscMatrix::new(x.len(), 1, vec![0, x.len()], (0..x.len()).collect(), v);
            let mut y = x.clone();
            happly(&V, 0, beta, &mut y);
            assert!((y[0] - s).abs() < 1e-13);
            assert!(y[1..].norm_inf() < 1e-13);
        }
    }

    #[test]
    fn test_happly_sparse_column() {
        // reflector acting on rows 1 and 3 only
        let V = CscMatrix::new(4, 1, vec![0, 2], vec![1, 3], vec![1., 1.]);
        let mut x = vec![5., 1., 7., 3.];
        happly(&V, 0, 1., &mut x);
        assert_eq!(x, vec![5., -3., 7., -1.]);
    }
}
