use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::OrchestratorError;

/// Environment variable naming the directory of the stage executables.
pub const BIN_DIR_VAR: &str = "PIPELINE_BIN_DIR";

/// Environment variable holding the optional per run deadline, in seconds.
pub const TIMEOUT_VAR: &str = "STAGE_TIMEOUT_SECS";

/// Startup options of the `trainer` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    csv_path: PathBuf,
    bin_dir: PathBuf,
    stage_timeout: Option<Duration>,
}

impl TrainerConfig {
    /// Reads the configuration from the command line and the environment.
    ///
    /// # Errors
    /// `OrchestratorError::InvalidConfig` on a bad command line or a bad
    /// timeout value.
    pub fn from_env() -> Result<Self, OrchestratorError> {
        let default_bin_dir = env::current_exe()?
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self::from_parts(
            env::args_os().skip(1),
            env::var_os(BIN_DIR_VAR),
            env::var(TIMEOUT_VAR).ok(),
            default_bin_dir,
        )
    }

    /// Builds the configuration from the raw arguments and variable values.
    ///
    /// # Arguments
    /// * `args` - The command line, without the program name.
    /// * `bin_dir` - The value of `PIPELINE_BIN_DIR`, if set.
    /// * `timeout` - The value of `STAGE_TIMEOUT_SECS`, if set.
    /// * `default_bin_dir` - Where to look for the stages when `bin_dir` is unset.
    pub fn from_parts(
        args: impl IntoIterator<Item = OsString>,
        bin_dir: Option<OsString>,
        timeout: Option<String>,
        default_bin_dir: PathBuf,
    ) -> Result<Self, OrchestratorError> {
        let mut args = args.into_iter();
        let (Some(csv_path), None) = (args.next(), args.next()) else {
            return Err(OrchestratorError::InvalidConfig(
                "usage: trainer <csv_path>".to_string(),
            ));
        };

        let bin_dir = bin_dir
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default_bin_dir);

        let stage_timeout = match timeout.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<f64>().ok().filter(|secs| *secs > 0.0) {
                Some(secs) => Some(Duration::try_from_secs_f64(secs).map_err(|_| {
                    OrchestratorError::InvalidConfig(format!(
                        "{TIMEOUT_VAR} is out of range, got {raw:?}"
                    ))
                })?),
                None => {
                    return Err(OrchestratorError::InvalidConfig(format!(
                        "{TIMEOUT_VAR} must be a positive number of seconds, got {raw:?}"
                    )));
                }
            },
        };

        Ok(Self {
            csv_path: csv_path.into(),
            bin_dir,
            stage_timeout,
        })
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn stage_timeout(&self) -> Option<Duration> {
        self.stage_timeout
    }
}
