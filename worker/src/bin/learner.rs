use std::sync::Arc;

use anyhow::Context;
use machine_learning::{Learner, ParamStore};
use tokio::io;
use worker::{ControlFlags, LearnerConfig, Runner, control, stages::LearnerStage};

async fn run(cfg: LearnerConfig) -> anyhow::Result<()> {
    let flags = Arc::new(ControlFlags::new());
    control::install(flags.clone())?;

    let learner = Learner::mlp(cfg.mode(), ParamStore::new(cfg.model_file()));
    let (rx, tx) = comms::channel(io::stdin(), io::stdout());

    Runner::new(LearnerStage::new(learner))
        .with_control(flags)
        .run(rx, tx)
        .await
        .context("learner stage failed")?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    worker::init_logging();
    let cfg = LearnerConfig::from_env();
    worker::block_on(run(cfg))?
}
