use davidson_core::eig::EigError;
use thiserror::Error;

/// Conditions that abort an eigensolver call.
/// Running out of independent directions is not among them: the solvers then
/// stop early and report their best estimates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DavidsonError{
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Initial vector has dimension {actual} but the operator has size {expected}")]
    DimensionMismatch{ expected: usize, actual: usize },

    #[error("Projected eigenproblem failed: {0}")]
    EigFailure(#[from] EigError)
}

pub type Result<T> = std::result::Result<T, DavidsonError>;
