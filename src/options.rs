use serde::{Deserialize, Serialize};

/// Options of the Davidson eigensolvers.
/// Field names serialize in PascalCase, i.e. `MaxIter`, `ErrGoal`, `MinIter`,
/// `Hermitian`, `DebugLevel`, and every field may be omitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DavidsonOpts{
    /// Subspace growth budget. Capped at size()-1 by the standard engine
    /// and at size() by the generalized engine. (Default 2)
    pub max_iter: usize,
    /// Number of growth steps before convergence is honored. (Default 1)
    pub min_iter: usize,
    /// Threshold on the residual norm and on the change of the eigenvalue estimate. (Default 1.0e-4)
    pub err_goal: f64,
    /// Treat the operator as Hermitian, which selects the Hermitian dense eigensolvers
    /// and computes the projected matrix from one inner product per entry pair. (Default true)
    pub hermitian: bool,
    /// Verbosity of the progress lines. Negative is silent. (Default -1)
    pub debug_level: i32,
    /// Seed of the generator used to randomize linearly dependent correction vectors
    pub seed: u64,
    /// Gram-Schmidt passes per correction vector in the standard engine. (Default 1)
    pub orth_passes: usize,
    /// Orthogonalize new directions of the generalized engine against the basis. (Default false)
    pub gram_schmidt: bool
}

impl Default for DavidsonOpts{
    fn default() -> Self {
        Self{
            max_iter: 2,
            min_iter: 1,
            err_goal: 1.0e-4,
            hermitian: true,
            debug_level: -1,
            seed: 0x5eed_0da7_1d50,
            orth_passes: 1,
            gram_schmidt: false
        }
    }
}

impl DavidsonOpts{
    pub fn new() -> Self{
        Self::default()
    }
    pub fn with_max_iter(self, max_iter: usize) -> Self{
        Self{max_iter, ..self}
    }
    pub fn with_min_iter(self, min_iter: usize) -> Self{
        Self{min_iter, ..self}
    }
    pub fn with_err_goal(self, err_goal: f64) -> Self{
        Self{err_goal, ..self}
    }
    pub fn with_hermitian(self, hermitian: bool) -> Self{
        Self{hermitian, ..self}
    }
    pub fn with_debug_level(self, debug_level: i32) -> Self{
        Self{debug_level, ..self}
    }
    pub fn with_seed(self, seed: u64) -> Self{
        Self{seed, ..self}
    }
    pub fn with_orth_passes(self, orth_passes: usize) -> Self{
        Self{orth_passes, ..self}
    }
    pub fn with_gram_schmidt(self, gram_schmidt: bool) -> Self{
        Self{gram_schmidt, ..self}
    }
}

/// Options of the power method
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PowerOpts{
    /// Threshold on the change of the eigenvalue estimate. (Default 1.0e-4)
    pub err_goal: f64,
    /// Operator applications per eigenvector. (Default 1000)
    pub max_iter: usize,
    /// (Default 0)
    pub debug_level: i32
}

impl Default for PowerOpts{
    fn default() -> Self {
        Self{err_goal: 1.0e-4, max_iter: 1000, debug_level: 0}
    }
}

impl PowerOpts{
    pub fn with_err_goal(self, err_goal: f64) -> Self{
        Self{err_goal, ..self}
    }
    pub fn with_max_iter(self, max_iter: usize) -> Self{
        Self{max_iter, ..self}
    }
    pub fn with_debug_level(self, debug_level: i32) -> Self{
        Self{debug_level, ..self}
    }
}
