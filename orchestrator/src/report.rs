use std::{
    fmt, io,
    os::unix::process::ExitStatusExt,
    process::ExitStatus,
};

/// How a stage ended.
#[derive(Debug)]
pub enum StageStatus {
    /// Normal termination with the given exit code.
    Exited(i32),
    /// Abnormal termination by the given signal.
    Signaled(i32),
    /// Still running at the deadline, killed by the orchestrator.
    TimedOut,
    /// Its streams could not be created or the process could not be started.
    SpawnFailed(io::Error),
    /// Never started because an earlier stage failed to start.
    NotStarted,
    /// The process was started but its status could not be collected.
    WaitFailed(io::Error),
}

impl StageStatus {
    pub fn from_exit(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => Self::Exited(code),
            (None, Some(signal)) => Self::Signaled(signal),
            (None, None) => Self::WaitFailed(io::Error::other(format!(
                "unrecognized exit status {status}"
            ))),
        }
    }

    /// Whether the stage exited cleanly with code 0.
    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exited with code {code}"),
            Self::Signaled(signal) => write!(f, "terminated by signal {signal}"),
            Self::TimedOut => write!(f, "timed out and was killed"),
            Self::SpawnFailed(e) => write!(f, "failed to start: {e}"),
            Self::NotStarted => write!(f, "not started"),
            Self::WaitFailed(e) => write!(f, "could not be waited on: {e}"),
        }
    }
}

/// The final status of one stage.
#[derive(Debug)]
pub struct StageOutcome {
    pub name: String,
    pub pid: Option<u32>,
    pub status: StageStatus,
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pid {
            Some(pid) => write!(f, "{} (pid {pid}) {}", self.name, self.status),
            None => write!(f, "{} {}", self.name, self.status),
        }
    }
}

/// What a whole pipeline run amounted to, one outcome per stage in order.
#[derive(Debug)]
pub struct Report {
    outcomes: Vec<StageOutcome>,
}

impl Report {
    pub(crate) fn new(outcomes: Vec<StageOutcome>) -> Self {
        Self { outcomes }
    }

    /// Whether every stage exited cleanly with code 0.
    pub fn success(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.status.success())
    }

    pub fn outcomes(&self) -> &[StageOutcome] {
        &self.outcomes
    }

    /// The outcomes of the stages that did not succeed.
    pub fn failures(&self) -> impl Iterator<Item = &StageOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_wait_statuses() {
        // Raw wait(2) encoding: code in the high byte, signal in the low bits.
        assert!(matches!(
            StageStatus::from_exit(ExitStatus::from_raw(0)),
            StageStatus::Exited(0)
        ));
        assert!(matches!(
            StageStatus::from_exit(ExitStatus::from_raw(3 << 8)),
            StageStatus::Exited(3)
        ));
        assert!(matches!(
            StageStatus::from_exit(ExitStatus::from_raw(9)),
            StageStatus::Signaled(9)
        ));
    }

    #[test]
    fn report_succeeds_only_if_every_stage_does() {
        let outcome = |status| StageOutcome {
            name: "stage".into(),
            pid: Some(1),
            status,
        };

        let ok = Report::new(vec![outcome(StageStatus::Exited(0))]);
        assert!(ok.success());

        let failed = Report::new(vec![
            outcome(StageStatus::Exited(0)),
            outcome(StageStatus::Signaled(15)),
        ]);
        assert!(!failed.success());
        assert_eq!(failed.failures().count(), 1);
    }
}
