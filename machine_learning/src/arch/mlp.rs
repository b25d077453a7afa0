use ndarray::{ArrayView1, arr1};

use super::{Model, Topology, activations::ActFn, layers::Dense};
use crate::{MlErr, Result};

/// A single hidden layer perceptron with a ReLU hidden layer and a linear
/// scalar output.
///
/// Parameters are laid out as the hidden weights (one row per hidden unit),
/// the hidden biases, the output weights and the output bias.
#[derive(Clone)]
pub struct Mlp {
    topology: Topology,
    hidden: Dense,
    output: Dense,
}

impl Mlp {
    /// Creates a new `Mlp` of the given shape.
    pub fn new(topology: Topology) -> Self {
        let (n, h) = (topology.input_dim(), topology.hidden_dim());

        Self {
            topology,
            hidden: Dense::new((h, n), Some(ActFn::relu())),
            output: Dense::new((1, h), None),
        }
    }

    fn check(&self, what: &'static str, got: usize, expected: usize) -> Result<()> {
        if got != expected {
            return Err(MlErr::SizeMismatch {
                what,
                got,
                expected,
            });
        }

        Ok(())
    }
}

impl Default for Mlp {
    fn default() -> Self {
        Self::new(Topology::DEFAULT)
    }
}

impl Model for Mlp {
    fn topology(&self) -> Topology {
        self.topology
    }

    fn forward(&mut self, params: &[f32], x: &[f32]) -> Result<f32> {
        self.check("params", params.len(), self.size())?;
        self.check("input", x.len(), self.topology.input_dim())?;

        let (hidden_params, output_params) = params.split_at(self.hidden.size());
        let a = self.hidden.forward(hidden_params, ArrayView1::from(x))?;
        let y = self.output.forward(output_params, a.view())?;

        Ok(y[0])
    }

    fn backward(&mut self, params: &[f32], grad: &mut [f32], d_out: f32) -> Result<()> {
        self.check("params", params.len(), self.size())?;
        self.check("gradient", grad.len(), self.size())?;

        let split = self.hidden.size();
        let (hidden_params, output_params) = params.split_at(split);
        let (hidden_grad, output_grad) = grad.split_at_mut(split);

        let d = self.output.backward(output_params, output_grad, arr1(&[d_out]))?;
        self.hidden.backward(hidden_params, hidden_grad, d)?;

        Ok(())
    }
}
