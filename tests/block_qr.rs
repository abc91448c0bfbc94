#![allow(non_snake_case)]

use blocksparse::algebra::*;
use blocksparse::block::*;
use blocksparse::solvers::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_dense(m: usize, n: usize, rng: &mut StdRng) -> Matrix<f64> {
    let mut A = Matrix::zeros((m, n));
    for j in 0..n {
        for i in 0..m {
            A[(i, j)] = rng.gen_range(-1.0..1.0);
        }
        if j < m {
            A[(j, j)] += m as f64;
        }
    }
    A
}

#[test]
fn test_block_qr_invert() {
    let mut rng = StdRng::seed_from_u64(1);

    // block lengths that divide n, do not divide it, and exceed it
    for bl in [1, 3, 4, 16] {
        let D = random_dense(12, 12, &mut rng);
        let A = BlockMatrix::from_dense(&D, bl);

        let mut solver = BlockQrSolver::new();
        assert!(solver.set_a(A.clone()).unwrap());
        assert!(solver.quality() > 0.);

        let mut A_inv = BlockMatrix::new(12, 12, bl);
        solver.invert(&mut A_inv).unwrap();

        let I = A.mul(&A_inv).unwrap();
        assert!(I.to_dense().data.norm_inf_diff(&Matrix::identity(12).data) < 1e-12);
    }
}

#[test]
fn test_block_qr_least_squares() {
    let mut rng = StdRng::seed_from_u64(2);
    let (m, n, k) = (17, 7, 3);
    let D = random_dense(m, n, &mut rng);
    let Bd = random_dense(m, k, &mut rng);

    let mut solver = BlockQrSolver::new();
    assert!(solver.set_a(BlockMatrix::from_dense(&D, 4)).unwrap());

    let mut B = BlockMatrix::from_dense(&Bd, 4);
    let mut X = BlockMatrix::new(n, k, 4);
    solver.solve(&mut B, &mut X).unwrap();

    // Dᵀ (D X - B) = 0
    let A = BlockMatrix::from_dense(&D, 4);
    let R = A.mul(&X).unwrap().to_dense();
    for c in 0..k {
        for j in 0..n {
            let g: f64 = (0..m).map(|i| D[(i, j)] * (R[(i, c)] - Bd[(i, c)])).sum();
            assert!(g.abs() < 1e-10);
        }
    }
}

#[test]
fn test_block_qr_explicit_factors() {
    let mut rng = StdRng::seed_from_u64(3);
    let D = random_dense(9, 5, &mut rng);
    let A = BlockMatrix::from_dense(&D, 2);

    let mut qr = QrHouseholderBlock::new();
    assert!(qr.decompose(A.clone()));

    // Q R = A, with Q applied to R padded to full height
    let R = qr.r();
    let mut QR = BlockMatrix::new(9, 5, 2);
    R.extract(Submatrix::full(&R), &mut QR, 0, 0).unwrap();
    qr.apply_q(&mut QR).unwrap();
    assert!(QR.to_dense().data.norm_inf_diff(&D.data) < 1e-12);
}

#[test]
fn test_block_qr_rank_deficient() {
    let mut D = Matrix::zeros((4, 3));
    D[(0, 0)] = 1.;
    D[(1, 2)] = 1.;
    let mut solver = BlockQrSolver::new();
    assert!(!solver.set_a(BlockMatrix::from_dense(&D, 2)).unwrap());
    assert_eq!(solver.quality(), 0.);
}
