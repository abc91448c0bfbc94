#![allow(non_snake_case)]

use super::matrix_math::_csc_mul;
use crate::algebra::*;
use rand::Rng;

impl<T: FloatT> CscMatrix<T> {
    /// Random `m` x `n` matrix with at most `nz_total` nonzeros drawn
    /// uniformly from `[min, max)`, at distinct random coordinates.
    pub fn random_uniform<R: Rng + ?Sized>(
        m: usize,
        n: usize,
        nz_total: usize,
        min: T,
        max: T,
        rng: &mut R,
    ) -> Self {
        TripletMatrix::random_uniform(m, n, nz_total, min, max, rng).to_csc()
    }
}

/// Random symmetric positive definite matrix of size `n`, stored in full.
///
/// Built as `L*Lᵀ` from a random lower triangular `L` with about
/// `density` of its strictly lower entries filled and a diagonal bounded
/// away from zero.
pub fn random_spd<T: FloatT, R: Rng + ?Sized>(n: usize, density: f64, rng: &mut R) -> CscMatrix<T> {
    let mut colptr = vec![0; n + 1];
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();

    for col in 0..n {
        rowval.push(col);
        nzval.push(T::from_f64(rng.gen_range(1.0..2.0)).unwrap_or(T::one()));
        for row in (col + 1)..n {
            if rng.gen_bool(density.clamp(0.0, 1.0)) {
                rowval.push(row);
                nzval.push(T::from_f64(rng.gen_range(-1.0..1.0)).unwrap_or(T::zero()));
            }
        }
        colptr[col + 1] = rowval.len();
    }
    let L = CscMatrix::new(n, n, colptr, rowval, nzval);

    _csc_mul(&L, &L.transpose())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_spd_is_symmetric() {
        let mut rng = StdRng::seed_from_u64(3);
        let A: CscMatrix<f64> = random_spd(20, 0.2, &mut rng);

        assert!(A.check_format().is_ok());
        assert!(A.is_equals(&A.transpose(), 1e-14));
        assert!(A.diag().iter().all(|&d| d >= 1.0));
    }
}
