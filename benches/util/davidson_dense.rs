use criterion::{BenchmarkId, Criterion};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64 as c64;
use rand::prelude::*;
use rand_distr::Normal;
use rand_xoshiro::Xoshiro256Plus;

use davidson::{davidson_report, DavidsonOpts};
use davidson::davidson_core::reps::matrix::DenseOp;

/// Random Hermitian matrix with a spread diagonal, so the Davidson preconditioner has something to work with
fn rand_herm(n: usize, rng: &mut Xoshiro256Plus) -> DMatrix<c64>{
    let dist = Normal::new(0.0, 0.5_f64.sqrt()).unwrap();
    let rh: DMatrix<c64> = DMatrix::from_fn(n, n, |_i, _j| c64::new(rng.sample(dist), rng.sample(dist)));
    let mut h = (&rh + rh.adjoint()).scale(0.5);
    for i in 0..n{
        h[(i, i)] += c64::new(i as f64, 0.0);
    }
    h
}

fn rand_sym(n: usize, rng: &mut Xoshiro256Plus) -> DMatrix<f64>{
    let dist = Normal::new(0.0, 0.5_f64.sqrt()).unwrap();
    let r: DMatrix<f64> = DMatrix::from_fn(n, n, |_i, _j| rng.sample(dist));
    let mut h = (&r + r.transpose()).scale(0.5);
    for i in 0..n{
        h[(i, i)] += i as f64;
    }
    h
}

pub fn bench_dense_symmetric(c: &mut Criterion){
    let mut group = c.benchmark_group("Davidson: Dense Symmetric");
    let mut rng = Xoshiro256Plus::seed_from_u64(1234);

    for &n in [64usize, 256, 512].iter(){
        let a = DenseOp::new(rand_sym(n, &mut rng));
        let opts = DavidsonOpts::new().with_max_iter(40).with_err_goal(1.0e-8);
        group.bench_with_input(BenchmarkId::new("Lowest pair", n), &n,
            |b, &n| b.iter(
                || {
                    let mut phi = vec![DVector::from_element(n, 1.0)];
                    davidson_report(&a, &mut phi, &opts).unwrap()
                })
        );
        group.bench_with_input(BenchmarkId::new("Lowest 4 pairs", n), &n,
            |b, &n| b.iter(
                || {
                    let mut phi: Vec<DVector<f64>> = (0..4)
                        .map(|k| DVector::from_fn(n, |i, _| if i == k { 1.0 } else { 0.01 }))
                        .collect();
                    davidson_report(&a, &mut phi, &opts).unwrap()
                })
        );
    }
}

pub fn bench_dense_hermitian(c: &mut Criterion){
    let mut group = c.benchmark_group("Davidson: Dense Hermitian");
    let mut rng = Xoshiro256Plus::seed_from_u64(4321);

    for &n in [64usize, 256].iter(){
        let a = DenseOp::new(rand_herm(n, &mut rng));
        let opts = DavidsonOpts::new().with_max_iter(40).with_err_goal(1.0e-8);
        group.bench_with_input(BenchmarkId::new("Lowest pair", n), &n,
            |b, &n| b.iter(
                || {
                    let mut phi = vec![DVector::from_element(n, c64::new(1.0, 0.0))];
                    davidson_report(&a, &mut phi, &opts).unwrap()
                })
        );
    }
}
