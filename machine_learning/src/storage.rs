use std::{
    fmt::Write as _,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{MlErr, Result, arch::Topology, params::Params};

/// Default location of the parameter file, relative to the working directory.
pub const DEFAULT_MODEL_FILE: &str = "logs/model_params.txt";

/// Durable text storage for a network's parameters.
///
/// The file holds a `<hidden_dim> <input_dim>` header, one line of input
/// weights per hidden unit, a line of hidden biases, a line of output weights
/// and a line with the output bias.
#[derive(Debug, Clone)]
pub struct ParamStore {
    path: PathBuf,
}

impl ParamStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically replaces the parameter file with `params`.
    ///
    /// The file is written in full to a sibling temporary path, synced and
    /// then renamed over the destination, so a reader sees either the old
    /// file or the new one.
    ///
    /// # Errors
    /// Any io error, the previous file is left untouched.
    pub fn save(&self, params: &Params) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(parent)?;

        let temp_path = self.temp_path();
        if let Err(e) = write_synced(&temp_path, &render(params)) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        // Persist the rename itself, not every platform allows it.
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }

        Ok(())
    }

    /// Reads the parameter file for a network of shape `topology`.
    ///
    /// The header is checked before anything else is parsed and the values
    /// are collected into a fresh buffer, so on error nothing is returned.
    ///
    /// # Errors
    /// * `MlErr::Io` if the file cannot be read, e.g. it does not exist.
    /// * `MlErr::TopologyMismatch` if the header describes another shape.
    /// * `MlErr::CorruptParams` if the body does not match the header.
    pub fn load(&self, topology: Topology) -> Result<Params> {
        let content = fs::read_to_string(&self.path)?;
        parse(&content, topology)
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "params".to_string());

        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

fn write_synced(path: &Path, content: &str) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

fn push_line(buf: &mut String, values: &[f32]) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            buf.push(' ');
        }
        let _ = write!(buf, "{value}");
    }
    buf.push('\n');
}

fn render(params: &Params) -> String {
    let topology = params.topology();
    let mut buf = String::new();
    let _ = writeln!(buf, "{} {}", topology.hidden_dim(), topology.input_dim());

    for j in 0..topology.hidden_dim() {
        push_line(&mut buf, params.hidden_weights(j));
    }
    push_line(&mut buf, params.hidden_biases());
    push_line(&mut buf, params.output_weights());
    push_line(&mut buf, &[params.output_bias()]);

    buf
}

fn corrupt(line: usize, reason: impl Into<String>) -> MlErr {
    MlErr::CorruptParams {
        line,
        reason: reason.into(),
    }
}

fn parse_header(line: Option<&str>) -> Result<(usize, usize)> {
    let line = line.ok_or_else(|| corrupt(1, "missing header"))?;
    let dims: Vec<usize> = line
        .split_whitespace()
        .map(|token| {
            token
                .parse()
                .map_err(|_| corrupt(1, format!("invalid dimension {token:?}")))
        })
        .collect::<Result<_>>()?;

    match dims[..] {
        [hidden, input] => Ok((hidden, input)),
        _ => Err(corrupt(1, "expected `<hidden_dim> <input_dim>`")),
    }
}

fn parse(content: &str, topology: Topology) -> Result<Params> {
    let mut lines = content.lines();

    let got = parse_header(lines.next())?;
    if got != (topology.hidden_dim(), topology.input_dim()) {
        return Err(MlErr::TopologyMismatch {
            expected: topology,
            got,
        });
    }

    let (n, h) = (topology.input_dim(), topology.hidden_dim());
    let widths = std::iter::repeat_n(n, h).chain([h, h, 1]);
    let mut values = Vec::with_capacity(topology.size());

    for (i, width) in widths.enumerate() {
        let number = i + 2;
        let line = lines
            .next()
            .ok_or_else(|| corrupt(number, "unexpected end of file"))?;

        let before = values.len();
        for token in line.split_whitespace() {
            let value: f32 = token
                .parse()
                .map_err(|_| corrupt(number, format!("invalid value {token:?}")))?;
            if !value.is_finite() {
                return Err(corrupt(number, format!("non finite value {token:?}")));
            }
            values.push(value);
        }

        let count = values.len() - before;
        if count != width {
            return Err(corrupt(
                number,
                format!("expected {width} values, got {count}"),
            ));
        }
    }

    if let Some(extra) = lines.position(|line| !line.trim().is_empty()) {
        return Err(corrupt(topology.hidden_dim() + 5 + extra, "trailing data"));
    }

    Params::from_values(topology, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_layout() {
        let topology = Topology::new(2, 3);
        let values = (1..=topology.size()).map(|v| v as f32 / 4.0).collect();
        let params = Params::from_values(topology, values).unwrap();

        let expected = "3 2\n0.25 0.5\n0.75 1\n1.25 1.5\n1.75 2 2.25\n2.5 2.75 3\n3.25\n";
        assert_eq!(render(&params), expected);
        assert_eq!(parse(expected, topology).unwrap(), params);
    }

    #[test]
    fn header_is_checked_before_the_body() {
        let err = parse("8 5\ngarbage\n", Topology::DEFAULT).unwrap_err();
        assert!(matches!(err, MlErr::TopologyMismatch { got: (8, 5), .. }));
    }

    #[test]
    fn short_row_is_corrupt() {
        let topology = Topology::new(2, 1);
        let err = parse("1 2\n0.1\n0\n0\n0\n", topology).unwrap_err();
        assert!(matches!(err, MlErr::CorruptParams { line: 2, .. }));
    }

    #[test]
    fn truncated_file_is_corrupt() {
        let topology = Topology::new(2, 1);
        let err = parse("1 2\n0.1 0.2\n0\n", topology).unwrap_err();
        assert!(matches!(err, MlErr::CorruptParams { line: 4, .. }));
    }

    #[test]
    fn trailing_blank_lines_are_accepted() {
        let topology = Topology::new(2, 1);
        let params = parse("1 2\n0.1 0.2\n0\n0.5\n-1\n\n", topology).unwrap();
        assert_eq!(params.values(), &[0.1, 0.2, 0.0, 0.5, -1.0]);
    }
}
