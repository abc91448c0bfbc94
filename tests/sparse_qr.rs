#![allow(non_snake_case)]

use blocksparse::algebra::*;
use blocksparse::fillreduce::FillReducing;
use blocksparse::solvers::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// tall matrix with full column rank
fn random_tall(m: usize, n: usize, seed: u64) -> CscMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut M = TripletMatrix::random_uniform(m, n, m * n / 5, -1., 1., &mut rng);
    for j in 0..n {
        M.add_item(j, j, m as f64);
    }
    M.to_csc()
}

// Aᵀ (A x - b) vanishes at the least-squares solution
fn normal_residual(A: &CscMatrix<f64>, x: &[f64], b: &[f64]) -> f64 {
    let mut r = b.to_vec();
    A.gemv(&mut r, x, 1., -1.);
    let mut g = vec![0.; A.n];
    A.gemv_t(&mut g, &r, 1., 0.);
    g.norm_inf()
}

#[test]
fn test_qr_least_squares() {
    let A = random_tall(60, 25, 11);

    for fill in [FillReducing::None, FillReducing::Identity, FillReducing::Random, FillReducing::Amd] {
        let settings = SolverSettingsBuilder::default()
            .fill_reducing(fill)
            .build()
            .unwrap();
        let mut solver = SparseQrSolver::new(settings);
        assert!(solver.set_a(&A).unwrap());
        assert_eq!(solver.size(), (60, 25));
        assert!(solver.quality() > 0.);

        let b: Vec<f64> = (0..60).map(|i| (i as f64).sin()).collect();
        let B = Matrix::new_from_slice((60, 1), &b);
        let mut X = Matrix::zeros((25, 1));
        solver.solve(&B, &mut X).unwrap();
        assert!(normal_residual(&A, &X.data, &b) < 1e-10);
    }
}

#[test]
fn test_qr_square_inverse() {
    let A = random_tall(30, 30, 5);
    let mut solver = SparseQrSolver::new(SolverSettings::default());
    assert!(solver.set_a(&A).unwrap());

    let mut A_inv = Matrix::zeros((30, 30));
    solver.invert(&mut A_inv).unwrap();
    let mut I = Matrix::zeros((30, 30));
    A.mul_dense(&mut I, &A_inv, 1., 0.);
    assert!(I.data.norm_inf_diff(&Matrix::identity(30).data) < 1e-10);
}

#[test]
fn test_qr_pseudo_inverse() {
    // invert on a tall system yields the n x m pseudo-inverse, so
    // A⁺ A = I
    let A = random_tall(12, 4, 21);
    let mut solver = SparseQrSolver::new(SolverSettings::default());
    assert!(solver.set_a(&A).unwrap());

    let mut A_pinv = Matrix::zeros((4, 12));
    solver.invert(&mut A_pinv).unwrap();

    let Ad = A.to_dense();
    let mut I: Matrix<f64> = Matrix::zeros((4, 4));
    for i in 0..4 {
        for j in 0..4 {
            I[(i, j)] = (0..12).map(|k| A_pinv[(i, k)] * Ad[(k, j)]).sum();
        }
    }
    assert!(I.data.norm_inf_diff(&Matrix::identity(4).data) < 1e-10);
}

#[test]
fn test_qr_bad_input() {
    let mut solver = SparseQrSolver::new(SolverSettings::default());

    let wide = CscMatrix::<f64>::zeros((2, 3));
    assert!(matches!(solver.set_a(&wide), Err(LinalgError::InvalidArgument(_))));

    // both columns only touch the first row
    let A = CscMatrix::new(3, 2, vec![0, 1, 2], vec![0, 0], vec![1., 2.]);
    assert!(!solver.set_a(&A).unwrap());
    assert_eq!(solver.quality(), 0.);
}

#[test]
fn test_qr_locked_structure() {
    let A = random_tall(20, 10, 2);
    let mut solver = SparseQrSolver::new(SolverSettings::default());
    assert!(solver.set_a(&A).unwrap());
    solver.lock_structure();
    assert!(solver.is_structure_locked());

    let mut B = A.clone();
    B.nzval.iter_mut().for_each(|v| *v *= 3.);
    assert!(solver.set_a(&B).unwrap());

    let b = vec![1.; 20];
    let mut x = vec![0.; 10];
    solver.solve_vector(&b, &mut x).unwrap();
    assert!(normal_residual(&B, &x, &b) < 1e-10);

    let other = random_tall(20, 10, 3);
    assert_eq!(solver.set_a(&other), Err(LinalgError::SparsityMismatch));
}
