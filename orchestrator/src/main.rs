use anyhow::bail;
use env_logger::Env;
use log::{error, info};
use orchestrator::{Pipeline, TrainerConfig, train};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cfg = TrainerConfig::from_env()?;
    info!(
        "training on {} with stages from {}",
        cfg.csv_path().display(),
        cfg.bin_dir().display()
    );

    let pipeline = Pipeline::training(cfg.bin_dir(), cfg.csv_path());
    let session = train(pipeline)?;
    let report = session.wait(cfg.stage_timeout()).await;

    for failure in report.failures() {
        error!("{failure}");
    }

    if !report.success() {
        bail!(
            "{} of {} stage(s) did not exit cleanly",
            report.failures().count(),
            report.outcomes().len()
        );
    }

    info!("all stages exited cleanly");
    Ok(())
}
