use super::Optimizer;
use crate::{MlErr, Result};

/// Plain gradient descent with a fixed step length.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    learning_rate: f32,
}

impl GradientDescent {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `update_params`.
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for GradientDescent {
    /// `w <- w - learning_rate * g`, in place, for every parameter.
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]) -> Result<()> {
        if params.len() != grad.len() {
            return Err(MlErr::SizeMismatch {
                what: "gradient",
                got: grad.len(),
                expected: params.len(),
            });
        }

        let lr = self.learning_rate;
        params
            .iter_mut()
            .zip(grad)
            .for_each(|(w, g)| *w -= lr * g);

        Ok(())
    }
}
