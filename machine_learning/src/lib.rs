pub mod arch;
pub mod error;
pub mod features;
pub mod learner;
pub mod optimization;
pub mod params;
pub mod storage;

pub use error::{MlErr, Result};
pub use learner::{
    LEARNING_RATE, Learner, LearnerStats, Loaded, Mode, Persisted, Step, StreamingLearner,
};
pub use params::Params;
pub use storage::{DEFAULT_MODEL_FILE, ParamStore};
