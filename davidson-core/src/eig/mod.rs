use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use thiserror::Error;

use crate::ComplexScalar;

pub mod dense;

pub use dense::{eigh, eig_general, eigh_generalized};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EigError{
    #[error("Dense eigendecomposition of a {0}x{0} matrix did not converge")]
    NoConvergence(usize),
    #[error("Overlap matrix of dimension {0} is not positive definite")]
    NotPositiveDefinite(usize),
    #[error("Matrix must be square, got {0}x{1}")]
    NotSquare(usize, usize),
    #[error("No eigenpair of rank {rank} in a spectrum of {len}")]
    MissingEigenpair{ rank: usize, len: usize }
}

/// Eigenpairs of a small dense matrix.
/// The eigenvalues are kept in whatever order the routine produced them,
/// so callers must not assume they are sorted unless the routine says so.
/// Each column of vecs is the eigenvector of the matching eigenvalue.
#[derive(Clone, Debug)]
pub struct SmallEig{
    pub vals: DVector<Complex64>,
    pub vecs: DMatrix<Complex64>
}

impl SmallEig{
    /// Wraps the (real) spectrum of a Hermitian decomposition
    pub fn from_hermitian<N: ComplexScalar>(vals: &DVector<f64>, vecs: &DMatrix<N>) -> Self{
        SmallEig{
            vals: vals.map(|x| Complex64::new(x, 0.0)),
            vecs: vecs.map(|x| x.to_c64())
        }
    }

    pub fn len(&self) -> usize{
        self.vals.len()
    }

    /// Real and imaginary parts of the eigenvalues as separate arrays
    pub fn re_im(&self) -> (Vec<f64>, Vec<f64>){
        (self.vals.iter().map(|z| z.re).collect(),
         self.vals.iter().map(|z| z.im).collect())
    }
}
