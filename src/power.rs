use davidson_core::{BigMatrix, ComplexScalar, Operand};
use log::info;

use crate::standard::check_initial;
use crate::error::Result;
use crate::options::PowerOpts;

/// Power iteration for the largest-magnitude eigenpairs of `a`, one per vector in `vecs`.
///
/// Each vector is iterated in turn with the operator deflated against the pairs already found
/// (Hotelling deflation),
///     A v - sum_j lambda_j v_j <v_j|v>
/// where the overlap is taken with the current vector v, before A is applied, never with the image A v.
/// Iteration stops once successive eigenvalue estimates differ by less than ErrGoal or MaxIter applications are spent.
/// The estimate is the norm of the deflated image of a unit vector, so the method suits operators
/// whose dominant eigenvalues are positive.
pub fn power_method<N, V, A>(a: &A, vecs: &mut [V], opts: &PowerOpts) -> Result<Vec<f64>>
where N: ComplexScalar, V: Operand<N>, A: BigMatrix<N, V> + ?Sized
{
    check_initial(vecs, a.size())?;
    let nget = vecs.len();
    let mut eigs = vec![1000.0; nget];

    for t in 0..nget{
        let (found, rest) = vecs.split_at_mut(t);
        let v = &mut rest[0];
        let mut lambda = eigs[t];

        for ii in 1..=opts.max_iter{
            let mut vp = a.product(v);
            for (vj, &lj) in found.iter().zip(eigs.iter()){
                let ov = vj.dotc(v);
                vp.axpy(-N::from_real(lj) * ov, vj);
            }
            let last_lambda = lambda;
            lambda = vp.norm();
            if !(lambda > 0.0) {
                // v lies in the kernel of the deflated operator
                break;
            }
            vp.rscal(1.0 / lambda);
            *v = vp;
            if opts.debug_level >= 1 {
                info!("{} {} {:.10}", t, ii, lambda);
            }
            if (lambda - last_lambda).abs() < opts.err_goal {
                break;
            }
        }
        eigs[t] = lambda;
    }

    Ok(eigs)
}
