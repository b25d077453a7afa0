use comms::INPUT_DIM;

/// Width of the hidden layer of the default network.
pub const HIDDEN_DIM: usize = 8;

/// The fixed shape of the network: `input_dim -> hidden_dim -> 1`.
///
/// A parameter file records the shape it was written for and may only be
/// loaded into a learner of exactly the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    input_dim: usize,
    hidden_dim: usize,
}

impl Topology {
    /// The shape every stage of this pipeline agrees on.
    pub const DEFAULT: Topology = Topology::new(INPUT_DIM, HIDDEN_DIM);

    pub const fn new(input_dim: usize, hidden_dim: usize) -> Self {
        Self {
            input_dim,
            hidden_dim,
        }
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn hidden_dim(&self) -> usize {
        self.hidden_dim
    }

    /// Amount of parameters of the hidden layer: weights then biases.
    pub fn hidden_size(&self) -> usize {
        self.hidden_dim * self.input_dim + self.hidden_dim
    }

    /// Amount of parameters of the output layer: weights then the bias.
    pub fn output_size(&self) -> usize {
        self.hidden_dim + 1
    }

    /// Total amount of parameters.
    pub fn size(&self) -> usize {
        self.hidden_size() + self.output_size()
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::DEFAULT
    }
}
