use comms::{ResultRecord, SampleLine, Serialize, Summary};
use log::info;

use crate::{Result, runtime::Stage};

/// Running totals over every result seen since the process started.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RunningStats {
    pub count: u64,
    pub sum_loss: f64,
    pub sum_prediction: f64,
}

impl RunningStats {
    pub fn add(&mut self, result: &ResultRecord) {
        self.count += 1;
        self.sum_loss += result.loss as f64;
        self.sum_prediction += result.prediction as f64;
    }

    /// The averages so far, `None` before the first result.
    pub fn summary(&self) -> Option<Summary> {
        if self.count == 0 {
            return None;
        }

        let n = self.count as f64;
        Some(Summary {
            count: self.count,
            avg_loss: self.sum_loss / n,
            avg_prediction: self.sum_prediction / n,
        })
    }
}

/// What the monitor writes on the pipeline's output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonitorLine {
    Sample(SampleLine),
    Summary(Summary),
}

impl Serialize for MonitorLine {
    fn serialize(&self, buf: &mut String) {
        match self {
            MonitorLine::Sample(sample) => sample.serialize(buf),
            MonitorLine::Summary(summary) => summary.serialize(buf),
        }
    }
}

/// Last stage: echoes every result and aggregates them.
#[derive(Debug, Default)]
pub struct MonitorStage {
    stats: RunningStats,
}

impl MonitorStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> RunningStats {
        self.stats
    }
}

impl Stage for MonitorStage {
    type Input = ResultRecord;
    type Output = MonitorLine;

    fn name(&self) -> &'static str {
        "monitor"
    }

    fn process(&mut self, result: ResultRecord) -> Result<MonitorLine> {
        self.stats.add(&result);
        Ok(MonitorLine::Sample(SampleLine(result)))
    }

    /// Logs the averages so far, a request before the first result is dropped.
    fn snapshot(&mut self) {
        if let Some(Summary {
            count,
            avg_loss,
            avg_prediction,
        }) = self.stats.summary()
        {
            info!("snapshot count={count} avg_loss={avg_loss} avg_prediction={avg_prediction}");
        }
    }

    fn finish(self) -> Option<MonitorLine> {
        let summary = self.stats.summary();
        if summary.is_none() {
            info!("monitor: no samples processed, no summary written");
        }

        summary.map(MonitorLine::Summary)
    }
}
