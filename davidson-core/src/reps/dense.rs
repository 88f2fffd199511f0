use ndarray::prelude::*;
use rand::Rng;

use crate::ComplexScalar;
use crate::operand::{BigMatrix, Operand};

pub type Ket<N> = Array1<N>;
pub type Op<N> =  Array2<N>;

impl<N: ComplexScalar> Operand<N> for Array1<N>
{
    fn dim(&self) -> usize {
        self.len()
    }

    fn norm(&self) -> f64 {
        self.iter()
            .map(|x| x.modulus_squared())
            .fold(0.0, |s, xi| s + xi) // sum not autoimpl
            .sqrt()
    }

    fn scal(&mut self, a: N) {
        self.mapv_inplace(|q| q*a);
    }

    fn axpy(&mut self, a: N, x: &Self) {
        self.zip_mut_with(x, |y, &xi| *y += a* xi );
    }

    fn dotc(&self, other: &Self) -> N {
        self.iter().zip(other.iter())
            .map(|(&ui,&vi)| ui.conjugate() * vi)
            .fold(N::zero(), |d, xi|d + xi)
    }

    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for x in self.iter_mut(){
            *x = N::sample_normal(rng);
        }
    }

    fn map_elems<F: Fn(N) -> N>(&mut self, f: F) {
        self.mapv_inplace(f);
    }

    fn hadamard_mul(&mut self, y: &Self) {
        self.zip_mut_with(y, |x, &yi| *x = *x * yi);
    }
}

/// A dense operator over ndarray storage
#[derive(Clone)]
pub struct DenseArrayOp<N: ComplexScalar>{
    m: Op<N>
}

impl<N: ComplexScalar> DenseArrayOp<N>{
    pub fn new(m: Op<N>) -> Self{
        assert_eq!(m.nrows(), m.ncols(), "DenseArrayOp: matrix must be square");
        Self{m}
    }
}

impl<N: ComplexScalar> BigMatrix<N, Ket<N>> for DenseArrayOp<N>{
    fn product(&self, v: &Ket<N>) -> Ket<N> {
        self.m.dot(v)
    }

    fn size(&self) -> usize {
        self.m.nrows()
    }

    fn diag(&self) -> Option<Ket<N>> {
        Some(self.m.diag().to_owned())
    }
}
