use std::{
    ffi::OsString,
    io::{self, PipeReader},
    process::{ExitStatus, Stdio},
    time::Duration,
};

use futures::stream::{FuturesUnordered, StreamExt};
use log::{error, info, warn};
use tokio::{
    process::{Child, Command},
    time::{Instant, timeout_at},
};

use crate::{
    OrchestratorError, Pipeline,
    report::{Report, StageOutcome, StageStatus},
    topology::StageSpec,
};

/// A stage as seen by the orchestrator after spawning.
struct Stage {
    name: String,
    pid: Option<u32>,
    child: Option<Child>,
    status: Option<StageStatus>,
}

/// A running pipeline.
///
/// By the time a `Session` exists the orchestrator holds no end of any
/// inter stage stream, so every stage observes end of stream as soon as its
/// producer exits.
pub struct Session {
    stages: Vec<Stage>,
}

impl Session {
    /// Wires and starts every stage of `pipeline`.
    ///
    /// Stage `i` writes into a fresh pipe whose read end becomes stage
    /// `i + 1`'s stdin. If a stream or a process cannot be created, the
    /// remaining stages are not started and the ones already running are left
    /// to be reaped by `wait`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// `OrchestratorError::EmptyPipeline` if there is nothing to run.
    pub fn spawn(pipeline: Pipeline) -> Result<Self, OrchestratorError> {
        let Pipeline {
            stages: specs,
            envs,
            stdin,
            stdout,
        } = pipeline;

        if specs.is_empty() {
            return Err(OrchestratorError::EmptyPipeline);
        }

        let last = specs.len() - 1;
        let mut first_input = Some(stdin.unwrap_or_else(Stdio::null));
        let mut last_output = Some(stdout.unwrap_or_else(Stdio::inherit));
        let mut upstream: Option<PipeReader> = None;
        let mut stages = Vec::with_capacity(specs.len());
        let mut failed = false;

        for (i, spec) in specs.into_iter().enumerate() {
            if failed {
                stages.push(Stage::finished(&spec, StageStatus::NotStarted));
                continue;
            }

            let input = match upstream.take() {
                Some(reader) => Stdio::from(reader),
                None => first_input.take().unwrap_or_else(Stdio::null),
            };

            let (output, next) = if i == last {
                (last_output.take().unwrap_or_else(Stdio::inherit), None)
            } else {
                match io::pipe() {
                    Ok((reader, writer)) => (Stdio::from(writer), Some(reader)),
                    Err(e) => {
                        error!(
                            "failed to create the output stream of {}: {e}",
                            spec.name()
                        );
                        stages.push(Stage::finished(&spec, StageStatus::SpawnFailed(e)));
                        failed = true;
                        continue;
                    }
                }
            };

            match spawn_stage(&spec, &envs, input, output) {
                Ok(child) => {
                    let pid = child.id();
                    match pid {
                        Some(pid) => info!("started {} with pid {pid}", spec.name()),
                        None => info!("started {}", spec.name()),
                    }

                    stages.push(Stage {
                        name: spec.name().to_string(),
                        pid,
                        child: Some(child),
                        status: None,
                    });
                    upstream = next;
                }
                Err(e) => {
                    error!(
                        "failed to start {} ({}): {e}",
                        spec.name(),
                        spec.program().display()
                    );
                    stages.push(Stage::finished(&spec, StageStatus::SpawnFailed(e)));
                    failed = true;
                }
            }
        }

        Ok(Self { stages })
    }

    /// Waits for every started stage to terminate, in whatever order they do.
    ///
    /// With a `deadline`, stages still running once it elapses are killed,
    /// reaped and reported as timed out. Without one, waits indefinitely.
    ///
    /// # Returns
    /// The outcome of every stage, in pipeline order.
    pub async fn wait(mut self, deadline: Option<Duration>) -> Report {
        // A deadline too far out to represent is no deadline at all.
        let deadline = deadline.and_then(|after| Instant::now().checked_add(after));
        let mut reaped: Vec<Option<io::Result<ExitStatus>>> =
            self.stages.iter().map(|_| None).collect();

        let labels: Vec<_> = self
            .stages
            .iter()
            .map(|stage| (stage.name.clone(), stage.pid))
            .collect();

        {
            let mut pending: FuturesUnordered<_> = self
                .stages
                .iter_mut()
                .enumerate()
                .filter_map(|(i, stage)| {
                    let child = stage.child.as_mut()?;
                    Some(async move { (i, child.wait().await) })
                })
                .collect();

            loop {
                let next = match deadline {
                    Some(deadline) => match timeout_at(deadline, pending.next()).await {
                        Ok(next) => next,
                        Err(_) => break,
                    },
                    None => pending.next().await,
                };

                let Some((i, result)) = next else {
                    break;
                };

                let (name, pid) = &labels[i];
                log_exit(name, *pid, &result);
                reaped[i] = Some(result);
            }
        }

        for (stage, result) in self.stages.iter_mut().zip(reaped) {
            if stage.status.is_some() {
                continue;
            }

            let status = match result {
                Some(Ok(status)) => StageStatus::from_exit(status),
                Some(Err(e)) => StageStatus::WaitFailed(e),
                None => kill(stage).await,
            };
            stage.status = Some(status);
        }

        let outcomes = self
            .stages
            .into_iter()
            .map(|stage| StageOutcome {
                name: stage.name,
                pid: stage.pid,
                status: stage.status.unwrap_or(StageStatus::NotStarted),
            })
            .collect();

        Report::new(outcomes)
    }
}

impl Stage {
    fn finished(spec: &StageSpec, status: StageStatus) -> Self {
        Self {
            name: spec.name().to_string(),
            pid: None,
            child: None,
            status: Some(status),
        }
    }
}

/// Starts one stage with its stdin and stdout bound to the given ends.
///
/// The command, and with it the parent's copy of both ends, is dropped before
/// returning whether the spawn succeeded or not.
fn spawn_stage(
    spec: &StageSpec,
    envs: &[(OsString, OsString)],
    input: Stdio,
    output: Stdio,
) -> io::Result<Child> {
    let mut command = Command::new(spec.program());
    command
        .args(spec.arguments())
        .envs(envs.iter().map(|(key, value)| (key, value)))
        .stdin(input)
        .stdout(output);

    command.spawn()
}

fn log_exit(name: &str, pid: Option<u32>, result: &io::Result<ExitStatus>) {
    let pid = pid.unwrap_or_default();

    match result.as_ref().map(|status| StageStatus::from_exit(*status)) {
        Ok(StageStatus::Exited(0)) => info!("{name} (pid {pid}) exited with code 0"),
        Ok(StageStatus::Exited(code)) => warn!("{name} (pid {pid}) exited with code {code}"),
        Ok(StageStatus::Signaled(signal)) => {
            error!("{name} (pid {pid}) terminated by signal {signal}")
        }
        Ok(status) => warn!("{name} (pid {pid}) {status}"),
        Err(e) => error!("failed to wait on {name} (pid {pid}): {e}"),
    }
}

/// Kills a stage that outlived the deadline and reaps it.
async fn kill(stage: &mut Stage) -> StageStatus {
    let Some(child) = stage.child.as_mut() else {
        return StageStatus::NotStarted;
    };

    // It may have exited after the deadline fired but before getting here.
    if let Ok(Some(status)) = child.try_wait() {
        let result = Ok(status);
        log_exit(&stage.name, stage.pid, &result);
        return StageStatus::from_exit(status);
    }

    warn!(
        "{} (pid {}) still running at the deadline, killing it",
        stage.name,
        stage.pid.unwrap_or_default()
    );
    if let Err(e) = child.start_kill() {
        warn!("failed to kill {}: {e}", stage.name);
    }

    match child.wait().await {
        Ok(_) => StageStatus::TimedOut,
        Err(e) => StageStatus::WaitFailed(e),
    }
}
