use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use crate::arch::Topology;

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// A parameter file was written for a different network shape.
    TopologyMismatch {
        expected: Topology,
        got: (usize, usize),
    },
    /// A parameter file whose header matched but whose body did not parse.
    CorruptParams {
        line: usize,
        reason: String,
    },
    UnknownMode(String),
    Io(io::Error),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch in {what}, got {got} and expected {expected}"
            ),
            MlErr::TopologyMismatch { expected, got } => write!(
                f,
                "parameter file is for a {}x{} network, this learner is {}x{}",
                got.0,
                got.1,
                expected.hidden_dim(),
                expected.input_dim()
            ),
            MlErr::CorruptParams { line, reason } => {
                write!(f, "corrupt parameter file at line {line}: {reason}")
            }
            MlErr::UnknownMode(mode) => {
                write!(f, "unknown learner mode {mode:?}, expected train or test")
            }
            MlErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
