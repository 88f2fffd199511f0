use davidson_core::{BigMatrix, ComplexScalar, Operand};
use davidson_core::eig::{self, EigError};
use davidson_core::operand::expectation;
use log::{debug, info, trace, warn};
use std::slice;

use crate::standard::{check_initial, Termination, APPROX0};
use crate::error::{DavidsonError, Result};
use crate::options::DavidsonOpts;
use crate::subspace::{lin_comb, project_out, ProjMatrix};

/// Result of a generalized Davidson solve
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NonOrthReport{
    pub eigenvalue: f64,
    /// Number of Rayleigh-Ritz steps completed
    pub iterations: usize,
    pub residual_norm: f64,
    pub termination: Termination
}

fn progress_line(iter: usize, qnorm: f64, lambda: f64) -> String{
    format!("I {} q {:.0e} E {:.10}", iter, qnorm, lambda)
}

/// Davidson iteration for the lowest eigenpair of the generalized problem
///     A x = lambda B x
/// where B must be Hermitian positive definite.
///
/// The basis is not orthogonalized (unless `opts.gram_schmidt` is set); its non-orthogonality is
/// carried by the projection of B, and each step solves the projected generalized problem.
/// The subspace grows at most min(MaxIter, size) times.
/// On return phi holds the eigenvector estimate scaled to unit norm.
pub fn non_orth_davidson_report<N, V, A, B>(a: &A, b: &B, phi: &mut V, opts: &DavidsonOpts)
    -> Result<NonOrthReport>
where N: ComplexScalar, V: Operand<N>,
      A: BigMatrix<N, V> + ?Sized, B: BigMatrix<N, V> + ?Sized
{
    let maxsize = a.size();
    if b.size() != maxsize {
        return Err(DavidsonError::DimensionMismatch{expected: maxsize, actual: b.size()});
    }
    check_initial(slice::from_mut(phi), maxsize)?;

    let err_goal = opts.err_goal;
    let dlevel = opts.debug_level;

    // B-normalize phi
    let phi_b_phi = expectation(b, phi).real();
    if !(phi_b_phi > 0.0) {
        return Err(DavidsonError::InvalidArgument(
            format!("Initial vector has B-overlap {}, B must be positive definite", phi_b_phi)));
    }
    phi.rscal(1.0 / phi_b_phi.sqrt());

    let actual_maxiter = opts.max_iter.min(maxsize);

    let mut basis: Vec<V> = Vec::with_capacity(actual_maxiter);
    let mut av: Vec<V> = Vec::with_capacity(actual_maxiter);
    let mut bv: Vec<V> = Vec::with_capacity(actual_maxiter);
    basis.push(phi.clone());
    av.push(a.product(phi));
    bv.push(b.product(phi));

    let m00 = basis[0].dotc(&av[0]).real();
    let n00 = basis[0].dotc(&bv[0]).real();
    let mut mproj = ProjMatrix::new(N::from_real(m00));
    let mut nproj = ProjMatrix::new(N::from_real(n00));

    let mut lambda = m00 / (n00 + 1.0e-33);
    let mut last_lambda = 1.0e30;
    let mut qnorm = f64::NAN;
    let mut u: Vec<N> = vec![N::one()];
    let mut iter = 0;
    let mut termination = Termination::MaxIter;

    for ii in 1..=actual_maxiter{
        let q = if ii == 1 {
            lambda = m00 / (n00 + 1.0e-33);
            let mut q = av[0].clone();
            q.axpy(N::from_real(-lambda), &bv[0]);
            q
        } else {
            let (vals, vecs) = match eig::eigh_generalized(mproj.matrix(), nproj.matrix()){
                Ok(r) => r,
                Err(EigError::NotPositiveDefinite(k)) => {
                    warn!("Projected B of dimension {} is not positive definite, stopping", k);
                    termination = Termination::SubspaceExhausted;
                    break;
                },
                Err(e) => return Err(e.into())
            };
            lambda = vals[0];
            u = vecs.column(0).iter().cloned().collect();
            if dlevel >= 3 {
                trace!("D = {:?}", vals.as_slice());
            }

            // q = sum_k u_k (A V_k - lambda B V_k)
            let mut q = av[0].clone();
            q.scal(u[0]);
            q.axpy(-u[0] * N::from_real(lambda), &bv[0]);
            for k in 1..ii{
                q.axpy(u[k], &av[k]);
                q.axpy(-u[k] * N::from_real(lambda), &bv[k]);
            }
            q
        };
        iter = ii;

        qnorm = q.norm();
        let goal_met = qnorm < err_goal && (lambda - last_lambda).abs() < err_goal;
        let small = qnorm < APPROX0.max(err_goal * 1.0e-3);
        if qnorm < 1.0e-20 || ((goal_met || small) && ii - 1 >= opts.min_iter) {
            termination = if goal_met { Termination::ErrGoal } else { Termination::SmallResidual };
            break;
        }

        if dlevel > 1 {
            debug!("{}", progress_line(ii, qnorm, lambda));
        } else if ii == 1 && dlevel > 0 {
            info!("{}", progress_line(ii, qnorm, lambda));
        }

        let mut d = q;
        if opts.gram_schmidt {
            project_out(&mut d, &basis);
        }
        d.rscal(1.0 / (d.norm() + 1.0e-33));
        last_lambda = lambda;

        if ii < actual_maxiter {
            let mut ad = a.product(&d);
            let mut bd = b.product(&d);
            let dbd = d.dotc(&bd).real();
            if !(dbd > 0.0) {
                warn!("New basis vector has B-overlap {:.3e} with itself, stopping", dbd);
                termination = Termination::SubspaceExhausted;
                break;
            }
            // Orient the new vector along the first one
            if basis[0].dotc(&bd).real() < 0.0 {
                d.rscal(-1.0);
                ad.rscal(-1.0);
                bd.rscal(-1.0);
            }
            let ni = basis.len();
            basis.push(d);
            av.push(ad);
            bv.push(bd);

            mproj.expand();
            nproj.expand();
            for k in 0..ni{
                let zb = basis[k].dotc(&bv[ni]);
                nproj.set(k, ni, zb);
                nproj.set(ni, k, zb.conjugate());
                let za = basis[k].dotc(&av[ni]);
                mproj.set(k, ni, za);
                mproj.set(ni, k, za.conjugate());
            }
            nproj.set(ni, ni, N::from_real(dbd));
            mproj.set(ni, ni, N::from_real(basis[ni].dotc(&av[ni]).real()));
        }
    }

    if dlevel > 0 {
        info!("{}", progress_line(iter, qnorm, lambda));
    }

    let mut v = lin_comb(&basis, &u);
    v.normalize_mut();
    *phi = v;

    Ok(NonOrthReport{eigenvalue: lambda, iterations: iter, residual_norm: qnorm, termination})
}

/// Lowest eigenvalue of A x = lambda B x, see [non_orth_davidson_report]
pub fn non_orth_davidson<N, V, A, B>(a: &A, b: &B, phi: &mut V, opts: &DavidsonOpts) -> Result<f64>
where N: ComplexScalar, V: Operand<N>,
      A: BigMatrix<N, V> + ?Sized, B: BigMatrix<N, V> + ?Sized
{
    non_orth_davidson_report(a, b, phi, opts).map(|r| r.eigenvalue)
}
