use std::{
    fmt::{self, Display},
    io,
    str::FromStr,
};

use crate::{
    MlErr, Result,
    arch::{
        Mlp, Model, Topology,
        loss::{LossFn, Mse},
    },
    optimization::{GradientDescent, Optimizer},
    params::Params,
    storage::ParamStore,
};

/// Step length of every gradient descent update.
pub const LEARNING_RATE: f32 = 0.001;

/// Whether the learner updates its parameters or only scores records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Train,
    Test,
}

impl FromStr for Mode {
    type Err = MlErr;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "train" => Ok(Mode::Train),
            "test" => Ok(Mode::Test),
            _ => Err(MlErr::UnknownMode(s.to_string())),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Train => write!(f, "train"),
            Mode::Test => write!(f, "test"),
        }
    }
}

/// How the starting parameters were obtained.
#[derive(Debug)]
pub enum Loaded {
    /// Train mode, the fixed initial state is used.
    Initial,
    /// Test mode, the parameter file was read.
    Restored,
    /// Test mode, the parameter file was missing or unusable and the fixed
    /// initial state is used instead.
    Fallback(MlErr),
}

/// What persisting the parameters at shutdown amounted to.
#[derive(Debug)]
pub enum Persisted {
    /// Test mode never writes.
    Skipped,
    Saved,
    Failed(MlErr),
}

/// The outcome of one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub prediction: f32,
    pub loss: f32,
    /// L2 norm of the gradient, only computed when training.
    pub grad_norm: Option<f32>,
    /// Set when training and the loss or the gradient overflowed, in which case
    /// the parameters were left as they were.
    pub skipped_update: bool,
}

/// Running figures of the learner, reported on a snapshot request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearnerStats {
    pub processed: u64,
    pub mean_loss: f64,
    pub last_grad_norm: Option<f32>,
}

/// A learner that has not touched its parameters yet.
///
/// Calling [`Learner::start`] performs the load step (test mode only) and
/// returns the [`StreamingLearner`] that processes records.
pub struct Learner<M, L, O> {
    mode: Mode,
    model: M,
    loss_fn: L,
    optimizer: O,
    store: ParamStore,
}

impl Learner<Mlp, Mse, GradientDescent> {
    /// The pipeline's learner: the default network, squared error loss and
    /// plain gradient descent with [`LEARNING_RATE`].
    pub fn mlp(mode: Mode, store: ParamStore) -> Self {
        Self::new(
            mode,
            Mlp::new(Topology::DEFAULT),
            Mse::new(),
            GradientDescent::new(LEARNING_RATE),
            store,
        )
    }
}

impl<M, L, O> Learner<M, L, O>
where
    M: Model,
    L: LossFn,
    O: Optimizer,
{
    pub fn new(mode: Mode, model: M, loss_fn: L, optimizer: O, store: ParamStore) -> Self {
        Self {
            mode,
            model,
            loss_fn,
            optimizer,
            store,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Sets up the parameters and starts streaming.
    ///
    /// In test mode the parameter file is loaded, any failure falls back to
    /// the initial state and is reported in the returned `Loaded`.
    pub fn start(self) -> (StreamingLearner<M, L, O>, Loaded) {
        let topology = self.model.topology();
        let initial = Params::initial(topology);

        let (params, loaded) = match self.mode {
            Mode::Train => (initial, Loaded::Initial),
            Mode::Test => match self.store.load(topology) {
                Ok(params) => (params, Loaded::Restored),
                Err(e) => (initial, Loaded::Fallback(e)),
            },
        };

        let learner = StreamingLearner {
            mode: self.mode,
            grad: vec![0.0; params.values().len()],
            model: self.model,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            store: self.store,
            params,
            processed: 0,
            loss_sum: 0.0,
            last_grad_norm: None,
        };

        (learner, loaded)
    }
}

/// A learner in its streaming phase.
///
/// Owns the parameters exclusively, every record mutates them (train mode) in
/// arrival order. Consumed by [`StreamingLearner::finish`].
pub struct StreamingLearner<M, L, O> {
    mode: Mode,
    model: M,
    loss_fn: L,
    optimizer: O,
    store: ParamStore,
    params: Params,
    grad: Vec<f32>,
    processed: u64,
    loss_sum: f64,
    last_grad_norm: Option<f32>,
}

impl<M, L, O> StreamingLearner<M, L, O>
where
    M: Model,
    L: LossFn,
    O: Optimizer,
{
    /// Processes a single record.
    ///
    /// Train mode runs forward and backward and takes one gradient descent
    /// step, test mode only runs forward. Either way the label is used to
    /// report the loss.
    ///
    /// A record whose loss or gradient is not finite is still scored but does
    /// not update the parameters, they stay finite for every later record.
    ///
    /// # Errors
    /// `MlErr::SizeMismatch` if `features` does not match the model's input.
    /// The parameters are untouched in that case.
    pub fn step(&mut self, features: &[f32], label: f32) -> Result<Step> {
        let prediction = self.model.forward(self.params.values(), features)?;
        let loss = self.loss_fn.loss(prediction, label);

        let (grad_norm, skipped_update) = match self.mode {
            Mode::Train => {
                let d_out = self.loss_fn.loss_prime(prediction, label);
                self.model
                    .backward(self.params.values(), &mut self.grad, d_out)?;

                let norm = l2_norm(&self.grad);
                let diverged = !(loss.is_finite() && norm.is_finite());
                if !diverged {
                    self.optimizer
                        .update_params(self.params.values_mut(), &self.grad)?;
                }
                (Some(norm), diverged)
            }
            Mode::Test => (None, false),
        };

        self.processed += 1;
        self.loss_sum += loss as f64;
        if grad_norm.is_some() {
            self.last_grad_norm = grad_norm;
        }

        Ok(Step {
            prediction,
            loss,
            grad_norm,
            skipped_update,
        })
    }

    pub fn stats(&self) -> LearnerStats {
        let mean_loss = match self.processed {
            0 => 0.0,
            n => self.loss_sum / n as f64,
        };

        LearnerStats {
            processed: self.processed,
            mean_loss,
            last_grad_norm: self.last_grad_norm,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn store(&self) -> &ParamStore {
        &self.store
    }

    /// Ends the stream, persisting the parameters in train mode.
    ///
    /// # Returns
    /// The outcome of the save and the final parameters.
    pub fn finish(self) -> (Persisted, Params) {
        let persisted = match self.mode {
            Mode::Train => match self.store.save(&self.params) {
                Ok(()) => Persisted::Saved,
                Err(e) => Persisted::Failed(e),
            },
            Mode::Test => Persisted::Skipped,
        };

        (persisted, self.params)
    }
}

impl Loaded {
    /// Whether the fallback was caused by the file simply not existing.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Loaded::Fallback(MlErr::Io(e)) if e.kind() == io::ErrorKind::NotFound)
    }
}

fn l2_norm(values: &[f32]) -> f32 {
    values
        .iter()
        .map(|&v| (v as f64) * (v as f64))
        .sum::<f64>()
        .sqrt() as f32
}
