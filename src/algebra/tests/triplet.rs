#![allow(non_snake_case)]
use crate::algebra::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn test_triplet_3x3() -> TripletMatrix<f64> {
    // A =
    //[ 1.0    ⋅   5.0]
    //[  ⋅   3.0    ⋅ ]
    //[ 2.0    ⋅   6.0]
    let mut A = TripletMatrix::new(3, 3);
    A.add_item(2, 2, 6.);
    A.add_item(0, 0, 1.);
    A.add_item(1, 1, 3.);
    A.add_item(0, 2, 5.);
    A.add_item(2, 0, 2.);
    A
}

#[test]
fn test_triplet_get_set() {
    let mut A = test_triplet_3x3();
    assert_eq!(A.nnz(), 5);
    assert_eq!(A.get(1, 1), 3.);
    assert_eq!(A.get(1, 0), 0.);

    A.set(1, 1, -3.);
    assert_eq!(A.get(1, 1), -3.);
    assert_eq!(A.nnz(), 5);

    A.set(1, 2, 4.);
    assert_eq!(A.get(1, 2), 4.);
    assert_eq!(A.nnz(), 6);
}

#[test]
#[should_panic]
fn test_triplet_add_out_of_bounds() {
    let mut A = TripletMatrix::<f64>::new(2, 2);
    A.add_item(2, 0, 1.);
}

#[test]
fn test_triplet_to_csc() {
    let A = test_triplet_3x3().to_csc();
    assert!(A.check_format().is_ok());
    assert_eq!(A.colptr, vec![0, 2, 3, 5]);
    assert_eq!(A.rowval, vec![0, 2, 1, 0, 2]);
    assert_eq!(A.nzval, vec![1., 2., 3., 5., 6.]);

    let B = TripletMatrix::from_csc(&A);
    assert!(B.is_equals(&test_triplet_3x3(), 0.));
}

#[test]
fn test_triplet_to_csc_sums_duplicates() {
    let mut A = TripletMatrix::new(2, 2);
    A.add_item(1, 0, 1.);
    A.add_item(0, 1, 2.);
    A.add_item(1, 0, 3.);
    A.add_item(1, 0, -0.5);

    let C = A.to_csc();
    assert!(C.check_format().is_ok());
    assert_eq!(C.nnz(), 2);
    assert_eq!(C.get(1, 0), 3.5);
    assert_eq!(C.get(0, 1), 2.);
}

#[test]
fn test_triplet_is_equals() {
    let A = test_triplet_3x3();

    // same entries inserted in a different order
    let mut B = TripletMatrix::new(3, 3);
    B.add_item(0, 2, 5.);
    B.add_item(2, 0, 2.);
    B.add_item(1, 1, 3.);
    B.add_item(0, 0, 1.);
    B.add_item(2, 2, 6.);

    assert!(A.is_equals(&A, 0.));
    assert!(A.is_equals(&B, 0.));
    assert!(B.is_equals(&A, 0.));

    B.set(1, 1, 3. + 1e-6);
    assert!(A.is_equals(&B, 1e-5));
    assert!(!A.is_equals(&B, 1e-7));

    let mut C = A.clone();
    C.m = 4;
    assert!(!A.is_equals(&C, 0.));

    let mut D = A.clone();
    D.add_item(1, 0, 0.5);
    assert!(!A.is_equals(&D, 0.));
}

#[test]
fn test_triplet_random_uniform() {
    let mut rng = StdRng::seed_from_u64(42);

    for &(m, n, nz) in &[(5, 4, 7), (3, 3, 9), (3, 2, 100), (6, 1, 0)] {
        let A = TripletMatrix::<f64>::random_uniform(m, n, nz, -1., 2., &mut rng);
        assert_eq!(A.nnz(), usize::min(nz, m * n));
        assert!(A.nzval.iter().all(|&v| (-1. ..2.).contains(&v)));

        // no duplicated coordinates survive the conversion unmerged
        assert_eq!(A.to_csc().nnz(), A.nnz());
    }

    // reproducible from the seed
    let A = TripletMatrix::<f64>::random_uniform(6, 6, 10, 0., 1., &mut StdRng::seed_from_u64(1));
    let B = TripletMatrix::<f64>::random_uniform(6, 6, 10, 0., 1., &mut StdRng::seed_from_u64(1));
    assert!(A.is_equals(&B, 0.));
}

#[test]
fn test_triplet_random_uniform_huge_dims() {
    // m*n is not representable in a usize
    let mut rng = StdRng::seed_from_u64(7);
    let m = usize::MAX / 2;
    let A = TripletMatrix::<f64>::random_uniform(m, 4, 5, 0., 1., &mut rng);
    assert_eq!(A.nnz(), 5);
    assert!(A.rowval.iter().all(|&r| r < m));
    assert!(A.colval.iter().all(|&c| c < 4));

    let mut coords: Vec<_> = A.rowval.iter().zip(&A.colval).collect();
    coords.sort();
    coords.dedup();
    assert_eq!(coords.len(), 5);
}
