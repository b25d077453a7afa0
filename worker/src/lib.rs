//! Stage runtime of the training pipeline.
//!
//! Every stage is a process reading records line by line from stdin and
//! writing one record per line to stdout, diagnostics go to stderr.

pub mod config;
pub mod control;
pub mod error;
pub mod metrics;
pub mod runtime;
pub mod stages;

use std::{future::Future, io};

use env_logger::Env;

pub use config::LearnerConfig;
pub use control::ControlFlags;
pub use error::{Result, WorkerErr};
pub use metrics::StageMetrics;
pub use runtime::{Runner, Stage};

/// Initializes the stage's logger on stderr, `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}

/// Runs a stage's main future on a fresh multi threaded runtime.
///
/// Reading stdin parks a blocking thread that cannot be interrupted, so the
/// runtime is torn down without waiting for it once `fut` completes.
pub fn block_on<F: Future>(fut: F) -> io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let output = runtime.block_on(fut);
    runtime.shutdown_background();
    Ok(output)
}
