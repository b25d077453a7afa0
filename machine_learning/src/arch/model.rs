use super::Topology;
use crate::Result;

/// A fixed shape differentiable function over a flat parameter slice.
///
/// The parameters live outside the model so the learner can own, persist and
/// update them, the model only keeps what the backward pass needs from the
/// last forward pass.
pub trait Model {
    /// Returns the shape of the model.
    fn topology(&self) -> Topology;

    /// Returns the amount of parameters in the model.
    fn size(&self) -> usize {
        self.topology().size()
    }

    /// Computes the scalar prediction for `x`.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `x` - The input features.
    ///
    /// # Returns
    /// The prediction or a size mismatch.
    fn forward(&mut self, params: &[f32], x: &[f32]) -> Result<f32>;

    /// Writes into `grad` the gradient of the loss with respect to every
    /// parameter, given `d_out`, the derivative of the loss with respect to the
    /// prediction of the **last** `forward` call.
    ///
    /// # Arguments
    /// * `params` - The parameters used in the last forward pass.
    /// * `grad` - A buffer the same length as `params`, fully overwritten.
    /// * `d_out` - dL/dy_hat.
    fn backward(&mut self, params: &[f32], grad: &mut [f32], d_out: f32) -> Result<()>;
}
