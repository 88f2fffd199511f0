use approx::assert_relative_eq;
use nalgebra::{DMatrix, DVector};
use ndarray::Array1;
use num_complex::Complex64 as c64;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256Plus;

use davidson::{davidson, davidson_report, davidson_single, complex_davidson, non_orth_davidson,
               power_method, DavidsonOpts, PowerOpts, Termination};
use davidson::davidson_core::Operand;
use davidson::davidson_core::eig::eig_general;
use davidson::select::find_eig;
use davidson::davidson_core::reps::matrix::{DenseOp, DiagonalOp};
use davidson::davidson_core::reps::dense::DenseArrayOp;

fn init_logger(){
    let _ = simple_logger::init_with_level(log::Level::Debug);
}

fn range_diag(n: usize) -> DiagonalOp<f64>{
    DiagonalOp::new(DVector::from_fn(n, |i, _| (i + 1) as f64))
}

fn random_symmetric(n: usize, seed: u64) -> DMatrix<f64>{
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    let r = DMatrix::from_fn(n, n, |_, _| rng.gen_range(-1.0, 1.0));
    let mut m = (&r + r.transpose()) * 0.5;
    for i in 0..n{
        m[(i, i)] += i as f64;
    }
    m
}

fn max_overlap<V: Operand<N>, N: davidson::ComplexScalar>(basis: &[V]) -> f64{
    let mut worst: f64 = 0.0;
    for i in 0..basis.len(){
        for j in 0..basis.len(){
            if i != j {
                worst = worst.max(basis[i].dotc(&basis[j]).to_c64().norm());
            }
        }
    }
    worst
}

#[test]
fn test_exact_recovery_on_diagonal(){
    init_logger();
    let n = 10;
    let a = range_diag(n);
    let mut phi = DVector::from_fn(n, |i, _| 1.0 + 0.1 * i as f64);
    let opts = DavidsonOpts::new().with_max_iter(n).with_debug_level(2);
    let lambda = davidson_single(&a, &mut phi, &opts).unwrap();

    assert_relative_eq!(lambda, 1.0, epsilon=1.0e-4);
    assert_relative_eq!(phi[0].abs(), 1.0, epsilon=1.0e-4);
    for i in 1..n{
        assert!(phi[i].abs() < 1.0e-3);
    }
}

#[test]
fn test_orthonormal_basis(){
    init_logger();
    let n = 12;
    let a = DenseOp::new(random_symmetric(n, 7));
    let mut phi = vec![DVector::from_element(n, 1.0)];
    let opts = DavidsonOpts::new().with_max_iter(8).with_err_goal(1.0e-10).with_orth_passes(2);
    let report = davidson_report(&a, &mut phi, &opts).unwrap();

    assert_eq!(report.basis.len(), report.iterations + 1);
    for v in report.basis.iter(){
        assert_relative_eq!(Operand::norm(v), 1.0, epsilon=1.0e-10);
    }
    assert!(max_overlap(&report.basis) < 1.0e-8);
}

#[test]
fn test_dense_random_lowest_pairs(){
    init_logger();
    let n = 16;
    let m = random_symmetric(n, 11);
    let mut exact = nalgebra::SymmetricEigen::new(m.clone()).eigenvalues.as_slice().to_vec();
    exact.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let a = DenseOp::new(m);
    let mut rng = Xoshiro256Plus::seed_from_u64(3);
    let mut phi: Vec<DVector<f64>> = (0..2)
        .map(|_| DVector::from_fn(n, |_, _| rng.gen_range(-1.0, 1.0)))
        .collect();
    let opts = DavidsonOpts::new().with_max_iter(40).with_err_goal(1.0e-9).with_debug_level(1);
    let eigs = davidson(&a, &mut phi, &opts).unwrap();

    assert_relative_eq!(eigs[0], exact[0], epsilon=1.0e-7);
    assert_relative_eq!(eigs[1], exact[1], epsilon=1.0e-7);
    for v in phi.iter(){
        assert_relative_eq!(Operand::norm(v), 1.0, epsilon=1.0e-10);
    }
}

#[test]
fn test_idempotent_on_converged_vector(){
    let a = range_diag(6);
    let mut phi = DVector::from_element(6, 1.0);
    let opts = DavidsonOpts::new().with_max_iter(10);
    let first = davidson_single(&a, &mut phi, &opts).unwrap();

    let again = davidson_single(&a, &mut phi, &DavidsonOpts::new().with_max_iter(1)).unwrap();
    assert!((first - again).abs() < opts.err_goal);
    assert_relative_eq!(Operand::norm(&phi), 1.0, epsilon=1.0e-12);
}

#[test]
fn test_deflation_by_magnitude(){
    let a = DiagonalOp::from_slice(&[5.0, 3.0, 1.0, 4.0, 2.0]);
    let mut phi = vec![DVector::from_element(5, 1.0),
                       DVector::from_vec(vec![0.5, 1.0, -1.0, 2.0, 0.25]),
                       DVector::from_vec(vec![1.0, 0.0, 1.0, 0.0, 1.0])];
    let opts = DavidsonOpts::new().with_max_iter(10).with_hermitian(false);
    let eigs = complex_davidson(&a, &mut phi, &opts).unwrap();

    // descending magnitude, not the three smallest
    for (z, &x) in eigs.iter().zip([5.0, 4.0, 3.0].iter()){
        assert_relative_eq!(z.re, x, epsilon=1.0e-3);
        assert!(z.im.abs() < 1.0e-8);
    }
}

#[test]
fn test_size_one_operator(){
    let a = DiagonalOp::from_slice(&[-2.5]);
    let mut phi = DVector::from_vec(vec![4.0]);
    let lambda = davidson_single(&a, &mut phi, &DavidsonOpts::default()).unwrap();
    assert_eq!(lambda, -2.5);
    assert_eq!(phi[0], 1.0);
}

#[test]
fn test_complex_hermitian_operator(){
    init_logger();
    let n = 6;
    let mut rng = Xoshiro256Plus::seed_from_u64(17);
    let r = DMatrix::from_fn(n, n, |_, _| c64::new(rng.gen_range(-1.0, 1.0), rng.gen_range(-1.0, 1.0)));
    let m = (&r + r.adjoint()) * c64::new(0.5, 0.0);
    let exact = nalgebra::SymmetricEigen::new(m.clone()).eigenvalues.min();

    let a = DenseOp::new(m);
    let mut phi = vec![DVector::from_element(n, c64::new(1.0, 0.0))];
    let opts = DavidsonOpts::new().with_max_iter(20).with_err_goal(1.0e-9);
    let report = davidson_report(&a, &mut phi, &opts).unwrap();

    assert_relative_eq!(report.eigenvalues[0].re, exact, epsilon=1.0e-7);
    assert!(report.eigenvalues[0].im.abs() < 1.0e-12);
    assert!(max_overlap(&report.basis) < 1.0e-8);

    let av = a.matrix() * &phi[0];
    let resid = av - &phi[0] * c64::new(exact, 0.0);
    assert!(resid.norm() < 1.0e-6);
}

#[test]
fn test_non_hermitian_largest(){
    // upper triangular with eigenvalues 1, 3, 5
    let m = DMatrix::from_row_slice(3, 3, &[
        1.0, 2.0, 0.0,
        0.0, 3.0, 1.0,
        0.0, 0.0, 5.0]);
    let a = DenseOp::new(m).without_diag();
    let mut phi = vec![DVector::from_vec(vec![1.0, 1.0, 1.0])];
    let opts = DavidsonOpts::new().with_max_iter(5).with_hermitian(false);
    let report = davidson_report(&a, &mut phi, &opts).unwrap();

    assert_relative_eq!(report.eigenvalues[0].re, 5.0, epsilon=1.0e-8);
    assert_ne!(report.termination, Termination::SubspaceExhausted);
}

#[test]
fn test_complex_non_hermitian_full_space(){
    init_logger();
    let n = 8;
    let mut rng = Xoshiro256Plus::seed_from_u64(23);
    let m = DMatrix::from_fn(n, n, |_, _| c64::new(rng.gen_range(-1.0, 1.0), rng.gen_range(-1.0, 1.0)));
    let full = eig_general(&m).unwrap();
    let (dr, di) = full.re_im();
    let exact = full.vals[find_eig(0, &dr, &di).unwrap()];

    let a = DenseOp::new(m);
    let mut phi = vec![DVector::from_fn(n, |i, _| c64::new(1.0, 0.1 * i as f64))];
    let opts = DavidsonOpts::new().with_hermitian(false).with_max_iter(30).with_err_goal(1.0e-10);
    let report = davidson_report(&a, &mut phi, &opts).unwrap();

    let lambda = report.eigenvalues[0];
    assert!((lambda - exact).norm() < 1.0e-8, "Ritz value {} against {}", lambda, exact);
    let resid = a.matrix() * &phi[0] - &phi[0] * lambda;
    assert!(resid.norm() < 1.0e-8, "residual {}", resid.norm());
}

#[test]
fn test_complex_non_hermitian_keeps_imaginary_seed(){
    let a = DenseOp::new(DMatrix::from_element(1, 1, c64::new(2.0, 3.0)));
    let mut phi = vec![DVector::from_element(1, c64::new(0.0, 1.0))];
    let opts = DavidsonOpts::new().with_hermitian(false);
    let report = davidson_report(&a, &mut phi, &opts).unwrap();

    assert_relative_eq!(report.eigenvalues[0], c64::new(2.0, 3.0), epsilon=1.0e-12);
    assert!(report.residual_norm < 1.0e-12);
    assert_eq!(report.termination, Termination::SmallResidual);
}

#[test]
fn test_ndarray_operand(){
    let n = 7;
    let m = random_symmetric(n, 5);
    let exact = nalgebra::SymmetricEigen::new(m.clone()).eigenvalues.min();
    let arr = ndarray::Array2::from_shape_fn((n, n), |(i, j)| m[(i, j)]);

    let a = DenseArrayOp::new(arr);
    let mut phi = Array1::from_elem(n, 1.0);
    let opts = DavidsonOpts::new().with_max_iter(20).with_err_goal(1.0e-9);
    let lambda = davidson_single(&a, &mut phi, &opts).unwrap();
    assert_relative_eq!(lambda, exact, epsilon=1.0e-7);
}

#[test]
fn test_generalized_problem(){
    init_logger();
    let a = DiagonalOp::from_slice(&[1.0, 4.0, 9.0]);
    let b = DiagonalOp::from_slice(&[1.0, 2.0, 3.0]);
    let mut phi = DVector::from_vec(vec![0.3, 1.0, 0.7]);
    let opts = DavidsonOpts::new().with_max_iter(10).with_debug_level(1);
    let lambda = non_orth_davidson(&a, &b, &mut phi, &opts).unwrap();

    assert_relative_eq!(lambda, 1.0, epsilon=1.0e-6);
    assert_relative_eq!(Operand::norm(&phi), 1.0, epsilon=1.0e-12);
}

#[test]
fn test_power_method_dominant(){
    let a = range_diag(5);
    let mut vecs = vec![DVector::from_element(5, 1.0)];
    let eigs = power_method(&a, &mut vecs, &PowerOpts::default().with_err_goal(1.0e-12)).unwrap();
    assert_relative_eq!(eigs[0], 5.0, epsilon=1.0e-6);
}
