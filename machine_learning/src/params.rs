use crate::{MlErr, Result, arch::Topology};

/// The learnable state of a network, one flat buffer.
///
/// Layout, which is also the order of the parameter file:
/// hidden weights (one row of `input_dim` values per hidden unit), hidden
/// biases, output weights, output bias.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    topology: Topology,
    values: Vec<f32>,
}

impl Params {
    /// Returns the fixed deterministic starting state.
    ///
    /// Hidden unit `j < n` sees input `j` with weight `0.1`, hidden unit
    /// `n <= j < 2n` sees input `j - n` with weight `-0.1`, and the output
    /// weights are `0.05` and `-0.05` on the same units. Biases start at zero.
    pub fn initial(topology: Topology) -> Self {
        let (n, h) = (topology.input_dim(), topology.hidden_dim());
        let mut params = Self::zeros(topology);

        for j in 0..h {
            let (weight, out_weight) = match j {
                j if j < n => (0.1, 0.05),
                j if j < 2 * n => (-0.1, -0.05),
                _ => continue,
            };

            params.values[j * n + j % n] = weight;
            params.values[h * n + h + j] = out_weight;
        }

        params
    }

    pub fn zeros(topology: Topology) -> Self {
        Self {
            topology,
            values: vec![0.0; topology.size()],
        }
    }

    /// Wraps an already laid out buffer.
    ///
    /// # Errors
    /// `MlErr::SizeMismatch` if `values` does not hold exactly `topology.size()` parameters.
    pub fn from_values(topology: Topology, values: Vec<f32>) -> Result<Self> {
        if values.len() != topology.size() {
            return Err(MlErr::SizeMismatch {
                what: "params",
                got: values.len(),
                expected: topology.size(),
            });
        }

        Ok(Self { topology, values })
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// The input weights of hidden unit `j`.
    pub fn hidden_weights(&self, j: usize) -> &[f32] {
        let n = self.topology.input_dim();
        &self.values[j * n..(j + 1) * n]
    }

    pub fn hidden_biases(&self) -> &[f32] {
        let (n, h) = (self.topology.input_dim(), self.topology.hidden_dim());
        &self.values[h * n..h * n + h]
    }

    pub fn output_weights(&self) -> &[f32] {
        let start = self.topology.hidden_size();
        &self.values[start..start + self.topology.hidden_dim()]
    }

    pub fn output_bias(&self) -> f32 {
        self.values[self.topology.size() - 1]
    }
}
