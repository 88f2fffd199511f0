use std::slice;

use davidson_core::{BigMatrix, ComplexScalar, Operand};
use davidson_core::eig::{self, EigError, SmallEig};
use davidson_core::operand::expectation;
use itertools::Itertools;
use log::{debug, info, trace, warn};
use nalgebra::DMatrix;
use num_complex::Complex64;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

use crate::error::{DavidsonError, Result};
use crate::options::DavidsonOpts;
use crate::precond::{DavidsonPrecond, Preconditioner};
use crate::select::find_eig;
use crate::subspace::{lin_comb, orthonormalize, Exhaustion, ProjMatrix};

/// Imaginary parts below this are numerical noise
pub const APPROX0: f64 = 1.0e-12;

/// Value of the previous eigenvalue estimate whenever a new eigenpair is targeted
const LAMBDA_SENTINEL: f64 = 1000.0;

/// Why the subspace iteration stopped
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Termination{
    /// Residual norm and eigenvalue change both fell below ErrGoal
    ErrGoal,
    /// The residual norm alone became negligible
    SmallResidual,
    /// The growth budget was used up
    MaxIter,
    /// No new independent direction could be found. The estimates are provisional.
    SubspaceExhausted
}

/// Result of a standard Davidson solve
#[derive(Clone, Debug)]
pub struct DavidsonReport<V>{
    pub eigenvalues: Vec<Complex64>,
    /// Number of subspace expansions performed
    pub iterations: usize,
    /// Residual norm of the last targeted eigenpair
    pub residual_norm: f64,
    pub termination: Termination,
    /// The orthonormal basis at exit
    pub basis: Vec<V>
}

/// Arithmetic of the projected eigenproblem.
/// Switches once from Real to Complex and never back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Arith{
    Real,
    Complex
}

/// Deflation state. The payload is the index of the eigenpair being refined.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Stage{
    Targeting(usize),
    Converged(usize),
    Exhausted(usize)
}

impl Stage{
    fn target(&self) -> usize{
        match *self{
            Stage::Targeting(t) | Stage::Converged(t) | Stage::Exhausted(t) => t
        }
    }
}

/// A decomposition of the projected matrix together with the rule used to rank its eigenpairs
struct Spectrum{
    eig: SmallEig,
    sorted: bool
}

impl Spectrum{
    fn len(&self) -> usize{
        self.eig.len()
    }

    /// Column holding the eigenpair of rank t
    fn rank(&self, t: usize) -> Option<usize>{
        if t >= self.len() {
            return None;
        }
        if self.sorted {
            Some(t)
        } else {
            let (dr, di) = self.eig.re_im();
            find_eig(t, &dr, &di)
        }
    }

    fn value(&self, w: usize) -> Complex64{
        self.eig.vals[w]
    }

    fn coeffs<N: ComplexScalar>(&self, w: usize) -> Vec<N>{
        self.eig.vecs.column(w).iter().map(|&z| N::from_c64(z)).collect()
    }
}

fn diagonalize(m: &DMatrix<Complex64>, arith: Arith, hermitian: bool) -> Result<Spectrum>{
    let eig = match (arith, hermitian){
        (Arith::Real, true) => {
            let (vals, vecs) = eig::eigh(&m.map(|z| z.re))?;
            SmallEig::from_hermitian(&vals, &vecs)
        },
        (Arith::Complex, true) => {
            let (vals, vecs) = eig::eigh(m)?;
            SmallEig::from_hermitian(&vals, &vecs)
        },
        (Arith::Real, false) => eig::eig_general(&m.map(|z| Complex64::new(z.re, 0.0)))?,
        (Arith::Complex, false) => eig::eig_general(m)?
    };
    Ok(Spectrum{eig, sorted: hermitian})
}

fn progress_line(iter: usize, qnorm: f64, eigs: &[Complex64]) -> String{
    let vals = eigs.iter()
        .take_while(|z| !z.re.is_nan())
        .map(|z| if z.im.abs() > APPROX0 {
            format!(" ({:.10},{:.10})", z.re, z.im)
        } else {
            format!(" {:.10}", z.re)
        })
        .join("");
    format!("I {} q {:.0e} E{}", iter, qnorm, vals)
}

/// Normalizes every initial vector after checking all of them
pub(crate) fn check_initial<N, V>(phi: &mut [V], size: usize) -> Result<()>
where N: ComplexScalar, V: Operand<N>
{
    if phi.is_empty() {
        return Err(DavidsonError::InvalidArgument("No initial vectors passed to davidson".to_string()));
    }
    let mut norms = Vec::with_capacity(phi.len());
    for (j, p) in phi.iter().enumerate(){
        let nrm = p.norm();
        if !(nrm > 0.0) {
            return Err(DavidsonError::InvalidArgument(format!("Initial vector {} has norm {}", j, nrm)));
        }
        if p.dim() != size {
            return Err(DavidsonError::DimensionMismatch{expected: size, actual: p.dim()});
        }
        norms.push(nrm);
    }
    for (p, nrm) in phi.iter_mut().zip(norms){
        p.rscal(1.0 / nrm);
    }
    Ok(())
}

/// Davidson subspace iteration for the eigenpairs of `a`, one per vector in `phi`.
///
/// The eigenpairs are targeted one after another in a single growing subspace.
/// For a Hermitian problem (`opts.hermitian`) the targets are the lowest eigenvalues in ascending order,
/// otherwise they are ranked by descending magnitude (see [find_eig](crate::select::find_eig)).
/// On return `phi[j]` holds the unit norm eigenvector estimate of `eigenvalues[j]`.
/// Eigenpairs the iteration never reached are read off the final subspace without further refinement.
///
/// Fails only on invalid initial vectors or a failed dense eigendecomposition.
/// Running out of independent directions ends the iteration early with
/// `Termination::SubspaceExhausted` and the best current estimates.
pub fn davidson_report<N, V, A>(a: &A, phi: &mut [V], opts: &DavidsonOpts) -> Result<DavidsonReport<V>>
where N: ComplexScalar, V: Operand<N>, A: BigMatrix<N, V> + ?Sized
{
    let maxsize = a.size();
    check_initial(phi, maxsize)?;

    let nget = phi.len();
    let err_goal = opts.err_goal;
    let dlevel = opts.debug_level;
    let actual_maxiter = opts.max_iter.min(maxsize.saturating_sub(1));
    if dlevel >= 2 {
        debug!("maxsize-1 = {}, maxiter = {}, actual_maxiter = {}",
               maxsize.saturating_sub(1), opts.max_iter, actual_maxiter);
    }

    let adiag = a.diag().filter(|d| !d.is_null());
    let mut rng = Xoshiro256Plus::seed_from_u64(opts.seed);

    let mut basis: Vec<V> = Vec::with_capacity(actual_maxiter + 1);
    let mut images: Vec<V> = Vec::with_capacity(actual_maxiter + 1);
    basis.push(phi[0].clone());
    images.push(a.product(&basis[0]));

    // A Hermitian projection keeps a real diagonal, a general one the full expectation value
    let z00 = basis[0].dotc(&images[0]).to_c64();
    let init_en = if opts.hermitian { Complex64::new(z00.re, 0.0) } else { z00 };
    if dlevel >= 3 {
        trace!("Initial Davidson energy = {:.10}", init_en);
    }
    let mut mproj = ProjMatrix::new(init_en);

    let mut arith = if init_en.im.abs() > err_goal { Arith::Complex } else { Arith::Real };
    let mut eigs = vec![Complex64::new(f64::NAN, f64::NAN); nget];
    let mut last_lambda = Complex64::new(LAMBDA_SENTINEL, 0.0);
    let mut spectrum: Option<Spectrum> = None;
    let mut qnorm = f64::NAN;
    let mut termination = Termination::MaxIter;
    let mut iter = 0;
    let mut ii = 0;
    let mut stage = Stage::Targeting(0);

    while let Stage::Targeting(t) = stage {
        // Rayleigh-Ritz step and residual of the targeted eigenpair
        let (lambda, mut q) = if ii == 0 {
            let mut q = images[0].clone();
            q.axpy(-N::from_c64(init_en), &basis[0]);
            (init_en, q)
        } else {
            let ritz = diagonalize(mproj.matrix(), arith, opts.hermitian)?;
            let w = ritz.rank(t)
                .ok_or(EigError::MissingEigenpair{rank: t, len: ritz.len()})?;
            let coeffs: Vec<N> = ritz.coeffs(w);
            let mut phi_t = lin_comb(&basis, &coeffs);
            let mut q = lin_comb(&images, &coeffs);
            // Real operands lose the imaginary part of complex coefficients
            let nrm = phi_t.norm();
            if nrm > 0.0 && (nrm - 1.0).abs() > APPROX0 {
                phi_t.rscal(1.0 / nrm);
                q.rscal(1.0 / nrm);
            }

            let lambda = ritz.value(w);
            let shift = if lambda.im.abs() <= APPROX0 { Complex64::new(lambda.re, 0.0) } else { lambda };
            q.axpy(-N::from_c64(shift), &phi_t);

            if ritz.eig.vecs[(0, w)].re < 0.0 {
                phi_t.rscal(-1.0);
                q.rscal(-1.0);
            }
            if dlevel >= 3 {
                trace!("complex_diag = {}", arith == Arith::Complex);
                trace!("D = {:?}", ritz.eig.vals.as_slice());
                trace!("lambda = {:.10}", lambda.re);
            }
            phi[t] = phi_t;
            spectrum = Some(ritz);
            (lambda, q)
        };
        eigs[t] = lambda;

        qnorm = q.norm();
        let goal_met = qnorm < err_goal && (lambda - last_lambda).norm() < err_goal;
        let small = qnorm < APPROX0.max(err_goal * 1.0e-3);
        last_lambda = lambda;

        if qnorm < 1.0e-20 || ((goal_met || small) && ii >= opts.min_iter) || ii == actual_maxiter {
            if t + 1 < nget && ii < actual_maxiter {
                stage = Stage::Targeting(t + 1);
                last_lambda = Complex64::new(LAMBDA_SENTINEL, 0.0);
            } else {
                termination = if goal_met {
                    Termination::ErrGoal
                } else if small || qnorm < 1.0e-20 {
                    Termination::SmallResidual
                } else {
                    Termination::MaxIter
                };
                if dlevel >= 3 {
                    match termination{
                        Termination::ErrGoal =>
                            trace!("Exiting Davidson because errgoal={:.0e} reached", err_goal),
                        Termination::SmallResidual =>
                            trace!("Exiting Davidson because small residual={:.0e} obtained", qnorm),
                        _ => trace!("Exiting Davidson because ii == actual_maxiter")
                    }
                }
                stage = Stage::Converged(t);
                break;
            }
        }

        if ii == 0 && dlevel >= 1 {
            info!("{}", progress_line(iter, qnorm, &eigs));
        } else if dlevel >= 2 {
            debug!("{}", progress_line(iter, qnorm, &eigs));
        }

        // Correction vector
        if let Some(d) = adiag.as_ref() {
            let dp = DavidsonPrecond::new(lambda.re);
            let mut cond = d.clone();
            cond.map_elems(|x| N::from_real(dp.factor(x.real())));
            q.hadamard_mul(&cond);
        }
        if let Err(why) = orthonormalize(&mut q, &basis, opts.orth_passes, maxsize, &mut rng, dlevel) {
            if dlevel >= 3 {
                match why{
                    Exhaustion::FullSpace => trace!("Breaking out of Davidson: max Hilbert space size reached"),
                    Exhaustion::RetryBudget => trace!("Breaking out of Davidson: count too big")
                }
            }
            termination = Termination::SubspaceExhausted;
            stage = Stage::Exhausted(stage.target());
            break;
        }

        // Expand the basis and the projection by one row and column
        let ni = basis.len();
        images.push(a.product(&q));
        basis.push(q);
        mproj.expand();

        let mut complex_entry = false;
        for k in 0..=ni{
            let z = basis[k].dotc(&images[ni]).to_c64();
            mproj.set(k, ni, z);
            if (k < ni || !opts.hermitian) && z.im.abs() > err_goal {
                complex_entry = true;
            }
        }
        if opts.hermitian {
            for k in 0..ni{
                let z = mproj.get(k, ni);
                mproj.set(ni, k, z.conj());
            }
            let dnn = mproj.get(ni, ni);
            mproj.set(ni, ni, Complex64::new(dnn.re, 0.0));
        } else {
            for k in 0..ni{
                let z = basis[ni].dotc(&images[k]).to_c64();
                mproj.set(ni, k, z);
                if z.im.abs() > err_goal {
                    complex_entry = true;
                }
            }
        }
        if complex_entry && arith == Arith::Real {
            if dlevel >= 2 {
                debug!("Projected matrix became complex at iteration {}", iter);
            }
            arith = Arith::Complex;
        }

        iter += 1;
        ii += 1;
    }

    // Eigenpairs that were never targeted
    let t = stage.target();
    for j in t..nget{
        if !eigs[j].re.is_nan() {
            continue;
        }
        match spectrum.as_ref().and_then(|s| s.rank(j).map(|w| (s, w))){
            Some((s, w)) => {
                eigs[j] = s.value(w);
                let mut v = lin_comb(&basis, &s.coeffs::<N>(w));
                v.normalize_mut();
                phi[j] = v;
            },
            None => {
                eigs[j] = expectation(a, &phi[j]).to_c64();
            }
        }
    }

    if dlevel >= 3 {
        let nb = basis.len();
        let vo = DMatrix::from_fn(nb, nb, |r, c| basis[r].dotc(&basis[c]).to_c64().norm());
        trace!("Vo_final = {}", vo);
    }
    if dlevel > 0 {
        info!("{}", progress_line(iter, qnorm, &eigs));
    }

    Ok(DavidsonReport{eigenvalues: eigs, iterations: iter, residual_norm: qnorm, termination, basis})
}

/// Davidson eigenvalues of `a`, which may be complex for a non-Hermitian operator
pub fn complex_davidson<N, V, A>(a: &A, phi: &mut [V], opts: &DavidsonOpts) -> Result<Vec<Complex64>>
where N: ComplexScalar, V: Operand<N>, A: BigMatrix<N, V> + ?Sized
{
    davidson_report(a, phi, opts).map(|r| r.eigenvalues)
}

/// Real Davidson eigenvalues of `a`.
/// Any imaginary part above numerical noise is dropped with a warning.
pub fn davidson<N, V, A>(a: &A, phi: &mut [V], opts: &DavidsonOpts) -> Result<Vec<f64>>
where N: ComplexScalar, V: Operand<N>, A: BigMatrix<N, V> + ?Sized
{
    let ceigs = complex_davidson(a, phi, opts)?;
    let eigs = ceigs.iter().enumerate()
        .map(|(j, z)| {
            if z.im.abs() > APPROX0 {
                warn!("Dropping imaginary part of eigs[{}] = ({:.4e},{:.4e})", j, z.re, z.im);
            }
            z.re
        })
        .collect();
    Ok(eigs)
}

/// Lowest eigenpair of `a` from a single initial vector
pub fn davidson_single<N, V, A>(a: &A, phi: &mut V, opts: &DavidsonOpts) -> Result<f64>
where N: ComplexScalar, V: Operand<N>, A: BigMatrix<N, V> + ?Sized
{
    let eigs = davidson(a, slice::from_mut(phi), opts)?;
    Ok(eigs[0])
}
