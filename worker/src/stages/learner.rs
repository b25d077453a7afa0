use comms::{Record, ResultRecord};
use log::{debug, info, warn};
use machine_learning::{
    Learner, Loaded, Persisted, StreamingLearner,
    arch::{Model, loss::LossFn},
    optimization::Optimizer,
};

use crate::{Result, runtime::Stage};

/// Third stage: scores every record and, when training, updates the model.
///
/// Parameters are loaded when the stage is created (test mode) and persisted
/// when it finishes (train mode). Neither failure stops the stream.
pub struct LearnerStage<M, L, O> {
    learner: StreamingLearner<M, L, O>,
}

impl<M, L, O> LearnerStage<M, L, O>
where
    M: Model,
    L: LossFn,
    O: Optimizer,
{
    pub fn new(learner: Learner<M, L, O>) -> Self {
        let mode = learner.mode();
        let (learner, loaded) = learner.start();
        let path = learner.store().path().display();

        match &loaded {
            Loaded::Initial => info!("learner: {mode} mode, starting from the initial parameters"),
            Loaded::Restored => info!("learner: {mode} mode, loaded parameters from {path}"),
            missing @ Loaded::Fallback(_) if missing.is_missing_file() => {
                warn!("learner: no parameter file at {path}, using the initial parameters")
            }
            Loaded::Fallback(e) => {
                warn!("learner: could not load {path}: {e}, using the initial parameters")
            }
        }

        Self { learner }
    }
}

impl<M, L, O> Stage for LearnerStage<M, L, O>
where
    M: Model,
    L: LossFn,
    O: Optimizer,
{
    type Input = Record;
    type Output = ResultRecord;

    fn name(&self) -> &'static str {
        "learner"
    }

    fn process(&mut self, record: Record) -> Result<ResultRecord> {
        let step = self.learner.step(&record.features, record.label)?;

        if let Some(norm) = step.grad_norm {
            debug!("learner: sample {} grad_norm={norm}", record.id);
        }
        if step.skipped_update {
            warn!(
                "learner: sample {} overflowed (loss={}), parameters not updated",
                record.id, step.loss
            );
        }

        Ok(ResultRecord::new(record.id, step.loss, step.prediction))
    }

    fn snapshot(&mut self) {
        let stats = self.learner.stats();
        match stats.last_grad_norm {
            Some(norm) => info!(
                "learner snapshot processed={} mean_loss={} last_grad_norm={norm}",
                stats.processed, stats.mean_loss
            ),
            None => info!(
                "learner snapshot processed={} mean_loss={}",
                stats.processed, stats.mean_loss
            ),
        }
    }

    fn finish(self) -> Option<ResultRecord> {
        let path = self.learner.store().path().to_path_buf();
        let (persisted, _) = self.learner.finish();

        match persisted {
            Persisted::Saved => info!("learner: parameters saved to {}", path.display()),
            Persisted::Failed(e) => {
                warn!("learner: could not save parameters to {}: {e}", path.display())
            }
            Persisted::Skipped => debug!("learner: test mode, parameters not saved"),
        }

        None
    }
}
