/// Concrete operand and operator representations over
/// nalgebra and ndarray storage
///
pub mod matrix;
pub mod dense;
