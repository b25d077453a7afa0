use std::sync::Arc;

use anyhow::Context;
use tokio::io;
use worker::{ControlFlags, Runner, control, stages::MonitorStage};

async fn run() -> anyhow::Result<()> {
    let flags = Arc::new(ControlFlags::new());
    control::install(flags.clone())?;
    log::info!("monitor: SIGUSR1 prints a snapshot, SIGTERM stops after the current record");

    let (rx, tx) = comms::channel(io::stdin(), io::stdout());
    Runner::new(MonitorStage::new())
        .with_control(flags)
        .run(rx, tx)
        .await
        .context("monitor stage failed")?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    worker::init_logging();
    worker::block_on(run())?
}
