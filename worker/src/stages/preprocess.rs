use comms::{Deserialize, Record};
use machine_learning::features::Normalizer;

use crate::{Result, runtime::Stage};

/// A raw dataset row, `id, f_0, ..., f_{N-1}, label`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CsvRow(pub Record);

impl Deserialize for CsvRow {
    fn deserialize(line: &str) -> comms::Result<Self> {
        Record::from_csv_line(line).map(CsvRow)
    }
}

/// First stage: parses dataset rows and normalizes their features.
#[derive(Debug, Default)]
pub struct PreprocessStage {
    normalizer: Normalizer,
}

impl PreprocessStage {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }
}

impl Stage for PreprocessStage {
    type Input = CsvRow;
    type Output = Record;

    fn name(&self) -> &'static str {
        "preprocess"
    }

    fn process(&mut self, CsvRow(mut record): CsvRow) -> Result<Record> {
        self.normalizer.normalize(&mut record.features);
        Ok(record)
    }
}
