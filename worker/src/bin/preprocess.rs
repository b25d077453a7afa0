use std::{env, path::PathBuf};

use anyhow::{Context, bail};
use tokio::{fs::File, io};
use worker::{Runner, WorkerErr, stages::PreprocessStage};

async fn run(path: PathBuf) -> anyhow::Result<()> {
    let dataset = File::open(&path)
        .await
        .map_err(|source| WorkerErr::Dataset {
            path: path.clone(),
            source,
        })?;

    let (rx, tx) = comms::channel(dataset, io::stdout());
    Runner::new(PreprocessStage::default())
        .run(rx, tx)
        .await
        .context("preprocess failed")?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    worker::init_logging();

    let mut args = env::args_os().skip(1);
    let (Some(path), None) = (args.next(), args.next()) else {
        bail!("usage: preprocess <csv_path>");
    };

    worker::block_on(run(PathBuf::from(path)))?
}
