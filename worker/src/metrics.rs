use std::fmt;

/// Counters kept by the stage runtime, logged when the stage ends.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StageMetrics {
    /// Non blank lines read from the input stream.
    pub lines: u64,
    pub processed: u64,
    pub malformed: u64,
}

impl StageMetrics {
    #[inline]
    pub fn bump_line(&mut self) {
        self.lines += 1;
    }

    #[inline]
    pub fn bump_processed(&mut self) {
        self.processed += 1;
    }

    #[inline]
    pub fn bump_malformed(&mut self) {
        self.malformed += 1;
    }
}

impl fmt::Display for StageMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lines={} processed={} malformed={}",
            self.lines, self.processed, self.malformed
        )
    }
}
