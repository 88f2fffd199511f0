/// Maps one diagonal element of the operator to the factor that multiplies
/// the matching residual component
pub trait Preconditioner{
    fn factor(&self, val: f64) -> f64;
}

/// The Davidson preconditioner
///     f(x) = 1/(theta - x)
/// which vanishes where x == theta
#[derive(Copy, Clone, Debug)]
pub struct DavidsonPrecond{
    pub theta: f64
}

impl DavidsonPrecond{
    pub fn new(theta: f64) -> Self{
        Self{theta}
    }
}

impl Preconditioner for DavidsonPrecond{
    fn factor(&self, val: f64) -> f64 {
        if self.theta == val {
            0.0
        } else {
            1.0 / (self.theta - val)
        }
    }
}

/// Constant preconditioner
///     f(x) = 1/(theta - 1)
/// which turns the correction into a rescaled residual, as in Lanczos
#[derive(Copy, Clone, Debug)]
pub struct LanczosPrecond{
    pub theta: f64
}

impl LanczosPrecond{
    pub fn new(theta: f64) -> Self{
        Self{theta}
    }
}

impl Preconditioner for LanczosPrecond{
    fn factor(&self, _val: f64) -> f64 {
        1.0 / (self.theta - 1.0 + 1.0e-33)
    }
}

/// f(x) = 0 if |x| < cut, 1/x otherwise
#[derive(Copy, Clone, Debug)]
pub struct PseudoInverter{
    pub cut: f64
}

impl PseudoInverter{
    pub const MIN_CUT: f64 = 1.0e-20;

    pub fn new(cut: f64) -> Self{
        Self{cut}
    }
}

impl Default for PseudoInverter{
    fn default() -> Self {
        Self{cut: Self::MIN_CUT}
    }
}

impl Preconditioner for PseudoInverter{
    fn factor(&self, val: f64) -> f64 {
        if val.abs() < self.cut {
            0.0
        } else {
            1.0 / val
        }
    }
}
