use std::sync::Arc;

use comms::{Deserialize, LineReceiver, LineSender, Received, Serialize};
use log::{info, warn};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{Result, control::ControlFlags, metrics::StageMetrics};

/// The per record behaviour of one pipeline stage.
pub trait Stage {
    type Input: Deserialize;
    type Output: Serialize;

    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Transforms one well formed input record into its output record.
    fn process(&mut self, input: Self::Input) -> Result<Self::Output>;

    /// Reacts to a snapshot request. Called between records only.
    fn snapshot(&mut self) {}

    /// Called once the stream ended or a stop was requested.
    ///
    /// # Returns
    /// A last record to write before closing the output, if any.
    fn finish(self) -> Option<Self::Output>
    where
        Self: Sized,
    {
        None
    }
}

/// Drives a `Stage` over an input and an output stream.
///
/// Reads until end of stream (or a stop request), skipping and logging
/// malformed lines. Control requests are only acted upon between records.
pub struct Runner<S> {
    stage: S,
    control: Option<Arc<ControlFlags>>,
    metrics: StageMetrics,
}

impl<S: Stage> Runner<S> {
    pub fn new(stage: S) -> Self {
        Self {
            stage,
            control: None,
            metrics: StageMetrics::default(),
        }
    }

    /// Makes the runner honor the snapshot and stop requests raised on `control`.
    pub fn with_control(mut self, control: Arc<ControlFlags>) -> Self {
        self.control = Some(control);
        self
    }

    /// Runs the stage to completion.
    ///
    /// # Returns
    /// The stage's counters.
    ///
    /// # Errors
    /// Returns `WorkerErr` if the input cannot be read, the output cannot be
    /// written or the stage fails to process a record.
    pub async fn run<R, W>(
        mut self,
        mut rx: LineReceiver<R>,
        mut tx: LineSender<W>,
    ) -> Result<StageMetrics>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let name = self.stage.name();

        loop {
            if self.handle_control() {
                info!("{name}: stop requested, not reading further input");
                break;
            }

            let received = match &self.control {
                Some(control) => tokio::select! {
                    biased;
                    _ = control.changed() => continue,
                    received = rx.recv::<S::Input>() => received?,
                },
                None => rx.recv::<S::Input>().await?,
            };

            let Some(received) = received else {
                break;
            };

            self.metrics.bump_line();
            match received {
                Received::Record(input) => {
                    let output = self.stage.process(input)?;
                    tx.send(&output).await?;
                    self.metrics.bump_processed();
                }
                Received::Malformed { line, err } => {
                    self.metrics.bump_malformed();
                    warn!("{name}: skipping malformed line {line:?}: {err}");
                }
            }
        }

        if let Some(last) = self.stage.finish() {
            tx.send(&last).await?;
        }

        info!("{name}: done, {}", self.metrics);
        Ok(self.metrics)
    }

    /// Serves a pending snapshot request.
    ///
    /// # Returns
    /// Whether a stop was requested.
    fn handle_control(&mut self) -> bool {
        let Some(control) = &self.control else {
            return false;
        };

        if control.take_snapshot() {
            self.stage.snapshot();
        }

        control.stop_requested()
    }
}
