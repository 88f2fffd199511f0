use std::cmp::Ordering;

use faer::{Mat, MatRef, Par, Side};
use faer::linalg::triangular_solve::{solve_lower_triangular_in_place, solve_upper_triangular_in_place};
use faer::traits::ComplexField;
use faer::traits::math_utils;
use itertools::Itertools;
use nalgebra::{DMatrix, DVector};
use nalgebra::linalg::SymmetricEigen;
use num_complex::Complex64;

use crate::ComplexScalar;
use crate::eig::{EigError, SmallEig};

fn check_square<N: ComplexScalar>(m: &DMatrix<N>) -> Result<usize, EigError>{
    let (r, c) = m.shape();
    if r != c {
        return Err(EigError::NotSquare(r, c));
    }
    Ok(r)
}

/// Reorders eigenpairs so that the eigenvalues are ascending
fn sort_ascending<N: ComplexScalar>(vals: &DVector<f64>, vecs: &DMatrix<N>)
    -> (DVector<f64>, DMatrix<N>)
{
    let n = vals.len();
    let order = (0..n)
        .sorted_by(|&a, &b| vals[a].partial_cmp(&vals[b]).unwrap_or(Ordering::Equal))
        .collect_vec();
    let sorted_vals = DVector::from_iterator(n, order.iter().map(|&i| vals[i]));
    let sorted_vecs = DMatrix::from_fn(vecs.nrows(), n, |r, c| vecs[(r, order[c])]);

    (sorted_vals, sorted_vecs)
}

/// Eigendecomposition of a Hermitian (or real symmetric) matrix.
/// Only the lower triangle of m is read.
/// Eigenvalues are returned in ascending order, and each column of the
/// returned matrix is the orthonormal eigenvector of the matching eigenvalue.
pub fn eigh<N: ComplexScalar>(m: &DMatrix<N>) -> Result<(DVector<f64>, DMatrix<N>), EigError>{
    let n = check_square(m)?;
    if n == 0 {
        return Ok((DVector::zeros(0), DMatrix::zeros(0, 0)));
    }
    let eig = SymmetricEigen::try_new(m.clone(), f64::EPSILON, 0)
        .ok_or(EigError::NoConvergence(n))?;

    Ok(sort_ascending(&eig.eigenvalues, &eig.eigenvectors))
}

/// Multiplies the column by the phase that makes its largest component real and positive
fn fix_phase(col: &mut DVector<Complex64>){
    let imax = col.iter().enumerate()
        .fold((0, -1.0), |(im, vm), (i, z)| {
            let v = z.norm_sqr();
            if v > vm { (i, v) } else { (im, vm) }
        }).0;
    let z = col[imax];
    let r = z.norm();
    if r > 0.0 {
        let phase = z.conj() / r;
        *col *= phase;
    }
}

fn to_faer<N: ComplexScalar>(m: &DMatrix<N>) -> Mat<N::Dense>{
    Mat::from_fn(m.nrows(), m.ncols(), |i, j| m[(i, j)].to_dense())
}

/// Eigendecomposition of a general (non-Hermitian) complex matrix by faer's complex Schur solver.
/// The eigenvalues are NOT sorted. Eigenvectors are normalized to unit length
/// with their largest component real.
pub fn eig_general(m: &DMatrix<Complex64>) -> Result<SmallEig, EigError>{
    let n = check_square(m)?;
    if n == 0 {
        return Ok(SmallEig{vals: DVector::zeros(0), vecs: DMatrix::zeros(0, 0)});
    }
    let evd = to_faer(m).eigen()
        .map_err(|_| EigError::NoConvergence(n))?;

    let vals = DVector::from_iterator(n, evd.S().column_vector().iter().cloned());
    let u = evd.U();
    let mut vecs = DMatrix::from_fn(n, n, |i, j| *u.get(i, j));
    for mut col in vecs.column_iter_mut(){
        let mut x: DVector<Complex64> = col.clone_owned();
        if x.norm() > 0.0 {
            x.normalize_mut();
        }
        fix_phase(&mut x);
        col.copy_from(&x);
    }

    Ok(SmallEig{vals, vecs})
}

/// Reduces M u = d S u to standard form with the Cholesky factor S = L L^dag and
/// back-transforms the eigenvectors, so that U^dag S U = 1.
fn reduce_definite<T>(m: MatRef<'_, T>, s: MatRef<'_, T>) -> Result<(Vec<f64>, Mat<T>), EigError>
where T: ComplexField<Real = f64>
{
    let k = m.nrows();
    let llt = s.llt(Side::Lower)
        .map_err(|_| EigError::NotPositiveDefinite(k))?;
    let l = llt.L();

    // C = L^-1 M L^-dag
    let mut c = m.to_owned();
    solve_lower_triangular_in_place(l, c.as_mut(), Par::Seq);
    let mut c = c.adjoint().to_owned();
    solve_lower_triangular_in_place(l, c.as_mut(), Par::Seq);

    let evd = c.self_adjoint_eigen(Side::Lower)
        .map_err(|_| EigError::NoConvergence(k))?;
    let vals = evd.S().column_vector().iter().map(math_utils::real).collect();
    let mut u = evd.U().to_owned();
    solve_upper_triangular_in_place(l.adjoint(), u.as_mut(), Par::Seq);

    Ok((vals, u))
}

/// Solves the generalized Hermitian-definite problem
///     M u = d N u
/// where N must be positive definite, through faer's Cholesky factorization of N.
/// Only the lower triangles are read.
/// Eigenvalues are ascending, and the eigenvectors are N-orthonormal: U^dag N U = 1
pub fn eigh_generalized<N: ComplexScalar>(m: &DMatrix<N>, n: &DMatrix<N>)
    -> Result<(DVector<f64>, DMatrix<N>), EigError>
{
    let k = check_square(m)?;
    let kn = check_square(n)?;
    if k != kn {
        return Err(EigError::NotSquare(k, kn));
    }
    if k == 0 {
        return Ok((DVector::zeros(0), DMatrix::zeros(0, 0)));
    }
    let (vals, u) = reduce_definite(to_faer(m).as_ref(), to_faer(n).as_ref())?;

    Ok((DVector::from_vec(vals), DMatrix::from_fn(k, k, |i, j| N::from_dense(u[(i, j)]))))
}
