use comms::Record;
use machine_learning::features::augment;

use crate::{Result, runtime::Stage};

/// Second stage: augments the normalized features.
#[derive(Debug, Default)]
pub struct FeatureStage;

impl Stage for FeatureStage {
    type Input = Record;
    type Output = Record;

    fn name(&self) -> &'static str {
        "feature"
    }

    fn process(&mut self, mut record: Record) -> Result<Record> {
        augment(&mut record.features);
        Ok(record)
    }
}
