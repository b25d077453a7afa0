mod feature;
mod learner;
mod monitor;
mod preprocess;

pub use feature::FeatureStage;
pub use learner::LearnerStage;
pub use monitor::{MonitorLine, MonitorStage, RunningStats};
pub use preprocess::{CsvRow, PreprocessStage};
