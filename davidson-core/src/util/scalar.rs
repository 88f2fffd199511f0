use nalgebra::ComplexField;
use num_complex::Complex64;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// ComplexScalar is the base trait that must be
/// implemented by the scalars of all operands.
/// The real field is always f64.
pub trait ComplexScalar :
ComplexField<RealField=f64> + Copy
{
    /// Whether values of this field carry an imaginary part
    const IS_COMPLEX: bool;

    /// Reduces a complex number into this field.
    /// Real fields drop the imaginary part.
    fn from_c64(z: Complex64) -> Self;

    fn to_c64(self) -> Complex64;

    /// This field as seen by faer's dense decompositions
    type Dense: faer::traits::ComplexField<Real = f64> + Copy;

    fn to_dense(self) -> Self::Dense;

    fn from_dense(x: Self::Dense) -> Self;

    /// Draws a standard normal sample.
    /// Complex fields draw independent real and imaginary parts.
    fn sample_normal<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl ComplexScalar for f64{
    const IS_COMPLEX: bool = false;

    fn from_c64(z: Complex64) -> f64{
        z.re
    }
    fn to_c64(self) -> Complex64{
        Complex64::new(self, 0.0)
    }

    type Dense = f64;

    fn to_dense(self) -> f64{
        self
    }
    fn from_dense(x: f64) -> f64{
        x
    }
    fn sample_normal<R: Rng + ?Sized>(rng: &mut R) -> f64{
        StandardNormal.sample(rng)
    }
}

impl ComplexScalar for Complex64{
    const IS_COMPLEX: bool = true;

    fn from_c64(z: Complex64) -> Complex64{
        z
    }
    fn to_c64(self) -> Complex64{
        self
    }

    type Dense = Complex64;

    fn to_dense(self) -> Complex64{
        self
    }
    fn from_dense(x: Complex64) -> Complex64{
        x
    }
    fn sample_normal<R: Rng + ?Sized>(rng: &mut R) -> Complex64{
        let re: f64 = StandardNormal.sample(rng);
        let im: f64 = StandardNormal.sample(rng);
        Complex64::new(re, im)
    }
}
