use davidson_core::{ComplexScalar, Operand};
use log::debug;
use nalgebra::DMatrix;
use num_traits::Zero;
use rand::Rng;

/// Square matrix holding the projection <V_i|A|V_j> of an operator onto a growing basis.
/// Growing allocates a new matrix and copies the previous projection into its top-left
/// block, so the leading block is always the true projection and no element is read
/// before it has been written.
#[derive(Clone, Debug)]
pub struct ProjMatrix<T: nalgebra::Scalar + Zero + Copy>{
    m: DMatrix<T>
}

impl<T: nalgebra::Scalar + Zero + Copy> ProjMatrix<T>{
    /// A 1x1 projection
    pub fn new(m00: T) -> Self{
        Self{m: DMatrix::from_element(1, 1, m00)}
    }

    pub fn dim(&self) -> usize{
        self.m.nrows()
    }

    /// Adds one zeroed row and column
    pub fn expand(&mut self){
        let k = self.dim();
        let old = &self.m;
        self.m = DMatrix::from_fn(k + 1, k + 1,
            |i, j| if i < k && j < k { old[(i, j)] } else { T::zero() });
    }

    pub fn get(&self, i: usize, j: usize) -> T{
        self.m[(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, val: T){
        self.m[(i, j)] = val;
    }

    pub fn matrix(&self) -> &DMatrix<T>{
        &self.m
    }
}

/// Computes sum_k coeffs[k] vs[k]
/// Only the first coeffs.len() vectors take part.
pub fn lin_comb<N: ComplexScalar, V: Operand<N>>(vs: &[V], coeffs: &[N]) -> V{
    assert!(!vs.is_empty() && !coeffs.is_empty(), "lin_comb: empty combination");
    let mut out = vs[0].clone();
    out.scal(coeffs[0]);
    for (v, &c) in vs.iter().zip(coeffs.iter()).skip(1){
        out.axpy(c, v);
    }
    out
}

/// One classical Gram-Schmidt pass of q against the basis
///  q <- q - sum_k <V_k|q> V_k
/// Assumes an orthonormal basis. Friendly reminder that classical Gram-Schmidt is unstable,
/// so callers repeat the pass when they need tight orthogonality.
pub fn project_out<N: ComplexScalar, V: Operand<N>>(q: &mut V, basis: &[V]){
    let overlaps: Vec<N> = basis.iter().map(|vk| vk.dotc(q)).collect();
    for (vk, c) in basis.iter().zip(overlaps.into_iter()){
        q.axpy(-c, vk);
    }
}

/// Reasons a correction vector could not be made independent of the basis
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Exhaustion{
    /// The basis already spans the full space of the operator
    FullSpace,
    /// Randomized retries did not yield an independent vector
    RetryBudget
}

/// Norm below which an orthogonalized vector is considered dependent on the basis
pub const DEPENDENCE_CUT: f64 = 1.0e-10;

/// Orthonormalizes q against an orthonormal basis with `passes` Gram-Schmidt passes.
///
/// If a pass leaves less than DEPENDENCE_CUT of q, q is replaced by a randomized vector of the
/// shape of the last basis vector and the pass is retried. Gives up when the basis already
/// has `max_dim` vectors or after 3*passes retries.
/// On success q has unit norm.
pub fn orthonormalize<N, V, R>(q: &mut V, basis: &[V], passes: usize, max_dim: usize,
                               rng: &mut R, debug_level: i32) -> Result<(), Exhaustion>
    where N: ComplexScalar, V: Operand<N>, R: Rng + ?Sized
{
    let ni = basis.len();
    let passes = passes.max(1);
    let mut count = 0;
    let mut pass = 0;
    while pass < passes {
        count += 1;
        project_out(q, basis);

        let mut qn = q.norm();
        if !(qn >= DEPENDENCE_CUT) {
            if debug_level >= 2 {
                debug!("Vector not independent, randomizing");
            }
            *q = basis[ni - 1].clone();
            q.randomize(rng);

            if ni >= max_dim {
                return Err(Exhaustion::FullSpace);
            }
            if count > 3 * passes {
                return Err(Exhaustion::RetryBudget);
            }
            qn = q.norm();
        } else {
            pass += 1;
        }
        q.rscal(1.0 / qn);
    }

    Ok(())
}
