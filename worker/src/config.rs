use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use log::warn;
use machine_learning::{DEFAULT_MODEL_FILE, Mode};

/// Environment variable selecting the learner's mode, `train` or `test`.
pub const MODE_VAR: &str = "LEARNER_MODE";

/// Environment variable holding the parameter file path.
pub const MODEL_FILE_VAR: &str = "MODEL_FILE";

/// Startup options of the learner stage.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnerConfig {
    mode: Mode,
    model_file: PathBuf,
}

impl LearnerConfig {
    /// Creates a new learner configuration.
    ///
    /// # Args
    /// * `mode` - Whether to train or only score.
    /// * `model_file` - Where the parameters are loaded from and saved to.
    ///
    /// # Returns
    /// A `LearnerConfig` instance.
    pub fn new(mode: Mode, model_file: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            model_file: model_file.into(),
        }
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(env::var(MODE_VAR).ok(), env::var_os(MODEL_FILE_VAR))
    }

    /// Builds the configuration from the raw variable values.
    ///
    /// An unset or empty mode means `train`, an unknown one is logged and
    /// also falls back to `train`.
    pub fn from_vars(mode: Option<String>, model_file: Option<OsString>) -> Self {
        let mode = match mode.as_deref().map(str::trim) {
            None | Some("") => Mode::default(),
            Some(raw) => raw.parse::<Mode>().unwrap_or_else(|e| {
                warn!("{e}, falling back to {}", Mode::default());
                Mode::default()
            }),
        };

        let model_file = model_file
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_FILE));

        Self { mode, model_file }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn model_file(&self) -> &Path {
        &self.model_file
    }
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self::new(Mode::default(), DEFAULT_MODEL_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let cfg = LearnerConfig::from_vars(None, None);
        assert_eq!(cfg, LearnerConfig::default());
        assert_eq!(cfg.model_file(), Path::new("logs/model_params.txt"));
    }

    #[test]
    fn mode_is_case_insensitive() {
        let cfg = LearnerConfig::from_vars(Some("Test".into()), Some("/tmp/p.txt".into()));
        assert_eq!(cfg.mode(), Mode::Test);
        assert_eq!(cfg.model_file(), Path::new("/tmp/p.txt"));
    }

    #[test]
    fn unknown_mode_falls_back_to_train() {
        let cfg = LearnerConfig::from_vars(Some("evaluate".into()), None);
        assert_eq!(cfg.mode(), Mode::Train);
    }
}
