//! Process level supervisor of the training pipeline.
//!
//! Connects the stages with one pipe per adjacent pair, starts them, lets go
//! of every pipe end it held and reaps the stages as they terminate.

pub mod config;
pub mod error;
mod report;
mod session;
mod topology;

pub use config::TrainerConfig;
pub use error::OrchestratorError;
pub use report::{Report, StageOutcome, StageStatus};
pub use session::Session;
pub use topology::{Pipeline, StageSpec, TRAINING_STAGES};

/// Starts the pipeline and returns the running session.
///
/// # Errors
/// Returns an `OrchestratorError` if the pipeline is empty. Stages that fail
/// to start are reported by `Session::wait`.
pub fn train(pipeline: Pipeline) -> Result<Session, OrchestratorError> {
    log::info!("starting a pipeline of {} stage(s)", pipeline.stages().len());
    Session::spawn(pipeline)
}
