use std::fmt;

/// All errors that can occur in the orchestrator.
///
/// Failures of individual stages are not errors, they are part of the
/// session's `Report`.
#[derive(Debug)]
pub enum OrchestratorError {
    /// Invalid configuration, caught before spawning anything.
    InvalidConfig(String),
    /// A pipeline needs at least one stage.
    EmptyPipeline,
    /// An underlying I/O error not covered by the above variants.
    Io(std::io::Error),
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::EmptyPipeline => write!(f, "pipeline has no stages"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OrchestratorError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
