use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::Stdio,
};

/// Stage executables of the training pipeline, in data flow order.
pub const TRAINING_STAGES: [&str; 4] = ["preprocess", "feature", "learner", "monitor"];

/// One process of a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSpec {
    name: String,
    program: PathBuf,
    args: Vec<OsString>,
}

impl StageSpec {
    /// Creates a new `StageSpec`.
    ///
    /// # Arguments
    /// * `name` - The name used when reporting on the stage.
    /// * `program` - The executable to run.
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_owned()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }
}

/// A linear chain of stages, each one reading what the previous one writes.
///
/// The first stage's stdin and the last stage's stdout are the pipeline's own
/// ends, by default `/dev/null` and the orchestrator's stdout.
#[derive(Debug, Default)]
pub struct Pipeline {
    pub(crate) stages: Vec<StageSpec>,
    pub(crate) envs: Vec<(OsString, OsString)>,
    pub(crate) stdin: Option<Stdio>,
    pub(crate) stdout: Option<Stdio>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four stage training pipeline over the dataset at `csv_path`.
    ///
    /// # Arguments
    /// * `bin_dir` - The directory holding the stage executables.
    /// * `csv_path` - The raw dataset, handed to the first stage.
    pub fn training(bin_dir: &Path, csv_path: &Path) -> Self {
        let [first, rest @ ..] = TRAINING_STAGES;
        let pipeline = Self::new().stage(StageSpec::new(first, bin_dir.join(first)).arg(csv_path));

        rest.into_iter()
            .fold(pipeline, |pipeline, name| {
                pipeline.stage(StageSpec::new(name, bin_dir.join(name)))
            })
    }

    /// Appends a stage at the end of the chain.
    pub fn stage(mut self, spec: StageSpec) -> Self {
        self.stages.push(spec);
        self
    }

    /// Sets an environment variable for every stage.
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_owned(), value.as_ref().to_owned()));
        self
    }

    /// Sets what the first stage reads.
    pub fn stdin(mut self, stdin: impl Into<Stdio>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }

    /// Sets where the last stage writes.
    pub fn stdout(mut self, stdout: impl Into<Stdio>) -> Self {
        self.stdout = Some(stdout.into());
        self
    }

    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn training_pipeline_order_and_arguments() {
        let pipeline = Pipeline::training(Path::new("/opt/bin"), Path::new("data.csv"));
        let stages = pipeline.stages();

        let names: Vec<_> = stages.iter().map(StageSpec::name).collect();
        assert_eq!(names, TRAINING_STAGES);

        assert_eq!(stages[0].program(), Path::new("/opt/bin/preprocess"));
        assert_eq!(stages[0].arguments(), &[OsString::from("data.csv")]);
        assert!(stages[1..].iter().all(|s| s.arguments().is_empty()));
        assert_eq!(stages[3].program(), Path::new("/opt/bin/monitor"));
    }
}
