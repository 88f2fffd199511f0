use nalgebra::{DMatrix, DVector};
use num_traits::One;
use rand::Rng;

use crate::ComplexScalar;
use crate::operand::{BigMatrix, Operand};

pub type Ket<N> = DVector<N>;
pub type Op<N> =  DMatrix<N>;

impl<N: ComplexScalar> Operand<N> for DVector<N>
{
    fn dim(&self) -> usize {
        self.len()
    }

    fn norm(&self) -> f64 {
        nalgebra::Matrix::norm(self)
    }

    fn scal(&mut self, a: N) {
        *self *= a;
    }

    fn axpy(&mut self, a: N, x: &Self) {
        nalgebra::Matrix::axpy(self, a, x, N::one());
    }

    fn dotc(&self, other: &Self) -> N {
        nalgebra::Matrix::dotc(self, other)
    }

    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for x in self.iter_mut(){
            *x = N::sample_normal(rng);
        }
    }

    fn map_elems<F: Fn(N) -> N>(&mut self, f: F) {
        for x in self.iter_mut(){
            *x = f(*x);
        }
    }

    fn hadamard_mul(&mut self, y: &Self) {
        self.component_mul_assign(y);
    }
}

/// A dense operator held as a full matrix.
/// Mostly useful for testing and for small effective problems.
#[derive(Clone)]
pub struct DenseOp<N: ComplexScalar>{
    m: Op<N>,
    precondition: bool
}

impl<N: ComplexScalar> DenseOp<N>{
    pub fn new(m: Op<N>) -> Self{
        assert_eq!(m.nrows(), m.ncols(), "DenseOp: matrix must be square");
        Self{m, precondition: true}
    }

    /// Disable exposing the diagonal for preconditioning
    pub fn without_diag(self) -> Self{
        Self{precondition: false, ..self}
    }

    pub fn matrix(&self) -> &Op<N>{
        &self.m
    }
}

impl<N: ComplexScalar> From<Op<N>> for DenseOp<N>{
    fn from(m: Op<N>) -> Self {
        Self::new(m)
    }
}

impl<N: ComplexScalar> BigMatrix<N, Ket<N>> for DenseOp<N>{
    fn product(&self, v: &Ket<N>) -> Ket<N> {
        &self.m * v
    }

    fn size(&self) -> usize {
        self.m.nrows()
    }

    fn diag(&self) -> Option<Ket<N>> {
        if self.precondition{
            Some(self.m.diagonal())
        } else {
            None
        }
    }
}

/// Represents the diagonal operator
///  \sum_i d_i | i > < i |
#[derive(Clone)]
pub struct DiagonalOp<N: ComplexScalar>{
    diag: Ket<N>
}

impl<N: ComplexScalar> DiagonalOp<N>{
    pub fn new(diag: Ket<N>) -> Self{
        Self{diag}
    }

    pub fn from_slice(d: &[N]) -> Self{
        Self{diag: DVector::from_column_slice(d)}
    }
}

impl<N: ComplexScalar> BigMatrix<N, Ket<N>> for DiagonalOp<N>{
    fn product(&self, v: &Ket<N>) -> Ket<N> {
        v.component_mul(&self.diag)
    }

    fn size(&self) -> usize {
        self.diag.len()
    }

    fn diag(&self) -> Option<Ket<N>> {
        Some(self.diag.clone())
    }
}
