//! Matrix-free Davidson eigensolvers.
//!
//! The operator is only ever applied through [BigMatrix::product], and the vectors it acts on
//! only need the linear operations of [Operand]. Small projected eigenproblems are solved densely.
extern crate approx;
extern crate nalgebra;
extern crate log;

pub use davidson_core;
pub use davidson_core::{BigMatrix, ComplexScalar, Operand};

pub mod options;
pub mod error;
pub mod precond;
pub mod select;
pub mod subspace;
pub mod standard;
pub mod nonorth;
pub mod power;

pub use crate::options::{DavidsonOpts, PowerOpts};
pub use crate::error::{DavidsonError, Result};
pub use crate::standard::{davidson, davidson_report, davidson_single, complex_davidson,
                          DavidsonReport, Termination};
pub use crate::nonorth::{non_orth_davidson, non_orth_davidson_report, NonOrthReport};
pub use crate::power::power_method;
