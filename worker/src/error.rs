use std::{error::Error, fmt, io, path::PathBuf};

use machine_learning::MlErr;

/// The worker module's result type.
pub type Result<T> = std::result::Result<T, WorkerErr>;

/// Stage runtime failures. Every one of them ends the stage with a non zero
/// exit code, recoverable conditions never surface as a `WorkerErr`.
#[derive(Debug)]
pub enum WorkerErr {
    /// Reading the input stream or writing the output stream failed.
    Io(io::Error),
    /// The dataset given to the first stage could not be opened.
    Dataset { path: PathBuf, source: io::Error },
    /// Installing the control signal handlers failed.
    Signal(io::Error),
    Learner(MlErr),
}

impl fmt::Display for WorkerErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerErr::Io(e) => write!(f, "io error: {e}"),
            WorkerErr::Dataset { path, source } => {
                write!(f, "failed to open dataset {}: {source}", path.display())
            }
            WorkerErr::Signal(e) => write!(f, "failed to install signal handlers: {e}"),
            WorkerErr::Learner(e) => write!(f, "learner error: {e}"),
        }
    }
}

impl Error for WorkerErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorkerErr::Io(e) | WorkerErr::Signal(e) => Some(e),
            WorkerErr::Dataset { source, .. } => Some(source),
            WorkerErr::Learner(e) => Some(e),
        }
    }
}

impl From<io::Error> for WorkerErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<MlErr> for WorkerErr {
    fn from(value: MlErr) -> Self {
        Self::Learner(value)
    }
}
