use rand::Rng;

use crate::ComplexScalar;

/// Trait implementing the linear operations the eigensolvers need
/// on a vector of the operator's domain.
/// The vector may be a flat array or any structured object; its layout is
/// never inspected.
pub trait Operand<N: ComplexScalar> : Sized + Clone
{
    /// The number of scalar components
    fn dim(&self) -> usize;

    /// Euclidean norm
    fn norm(&self) -> f64;

    /// x <- a x
    fn scal(&mut self, a: N);

    /// y <- a x + y
    fn axpy(&mut self, a: N, x: &Self);

    /// Takes the dot product of the conjugate of self with other, <self|other>
    fn dotc(&self, other: &Self) -> N;

    /// An operand without any components, e.g. an absent diagonal
    fn is_null(&self) -> bool{
        self.dim() == 0
    }

    /// Overwrites every component with a standard normal sample
    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R);

    /// x_i <- f(x_i)
    fn map_elems<F: Fn(N) -> N>(&mut self, f: F);

    /// x_i <- x_i * y_i
    fn hadamard_mul(&mut self, y: &Self);

    /// x <- a x for a real scalar a
    fn rscal(&mut self, a: f64){
        self.scal(N::from_real(a))
    }

    /// Scales to unit norm and returns the norm prior to scaling
    fn normalize_mut(&mut self) -> f64{
        let nrm = self.norm();
        self.rscal(1.0 / nrm);
        nrm
    }
}

/// Linear operator that is never stored as a dense matrix.
/// Only its action on an operand is available.
pub trait BigMatrix<N: ComplexScalar, V: Operand<N>>{
    /// out <- A v
    fn product(&self, v: &V) -> V;

    /// Dimension of the operator's domain
    fn size(&self) -> usize;

    /// The diagonal of the operator, if it is cheaply available.
    /// None disables diagonal preconditioning.
    fn diag(&self) -> Option<V>{
        None
    }
}

impl<'a, N: ComplexScalar, V: Operand<N>, A: BigMatrix<N, V> + ?Sized> BigMatrix<N, V> for &'a A{
    fn product(&self, v: &V) -> V {
        (**self).product(v)
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn diag(&self) -> Option<V> {
        (**self).diag()
    }
}

/// Expectation value <v|A|v> of the operator
pub fn expectation<N, V, A>(a: &A, v: &V) -> N
where N: ComplexScalar, V: Operand<N>, A: BigMatrix<N, V> + ?Sized
{
    v.dotc(&a.product(v))
}
