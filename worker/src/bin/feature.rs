use anyhow::Context;
use tokio::io;
use worker::{Runner, stages::FeatureStage};

fn main() -> anyhow::Result<()> {
    worker::init_logging();

    worker::block_on(async {
        let (rx, tx) = comms::channel(io::stdin(), io::stdout());
        Runner::new(FeatureStage)
            .run(rx, tx)
            .await
            .context("feature stage failed")?;

        Ok::<_, anyhow::Error>(())
    })?
}
