use crate::Result;

/// An update rule applied to the parameters once per processed record.
pub trait Optimizer {
    /// Takes one step given the gradient of the latest record.
    ///
    /// # Errors
    /// `MlErr::SizeMismatch` if `grad` and `params` differ in length, in
    /// which case `params` is left untouched.
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]) -> Result<()>;
}
