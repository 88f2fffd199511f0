extern crate approx;

pub mod eig;
pub mod operand;
pub mod reps;
pub mod util;

pub use simba::scalar::{RealField, ComplexField};

pub use util::scalar::ComplexScalar;
pub use operand::{Operand, BigMatrix};
