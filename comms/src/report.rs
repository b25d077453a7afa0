//! Lines the monitor stage prints on the pipeline's own output.

use std::fmt::Write;

use crate::{
    Deserialize, ResultRecord, Serialize,
    error::{Field, Result},
    fields,
};

/// Per record echo: `SAMPLE <id> LOSS <loss> YHAT <prediction>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleLine(pub ResultRecord);

impl Serialize for SampleLine {
    fn serialize(&self, buf: &mut String) {
        let ResultRecord {
            id,
            loss,
            prediction,
        } = self.0;
        let _ = write!(buf, "SAMPLE {id} LOSS {loss} YHAT {prediction}");
    }
}

impl Deserialize for SampleLine {
    fn deserialize(line: &str) -> Result<Self> {
        let mut fields = fields::whitespace(line);
        fields.tag("SAMPLE")?;
        let id = fields.id()?;
        fields.tag("LOSS")?;
        let loss = fields.number(Field::Loss)?;
        fields.tag("YHAT")?;
        let prediction = fields.number(Field::Prediction)?;
        fields.finish()?;

        Ok(Self(ResultRecord::new(id, loss, prediction)))
    }
}

/// Final machine readable summary: `SUMMARY <count> <avg_loss> <avg_prediction>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: u64,
    pub avg_loss: f64,
    pub avg_prediction: f64,
}

impl Serialize for Summary {
    fn serialize(&self, buf: &mut String) {
        let _ = write!(
            buf,
            "SUMMARY {} {} {}",
            self.count, self.avg_loss, self.avg_prediction
        );
    }
}

impl Deserialize for Summary {
    fn deserialize(line: &str) -> Result<Self> {
        let mut fields = fields::whitespace(line);
        fields.tag("SUMMARY")?;
        let count = fields.count(Field::Count)?;
        let avg_loss = fields.number(Field::Loss)?;
        let avg_prediction = fields.number(Field::Prediction)?;
        fields.finish()?;

        Ok(Self {
            count,
            avg_loss,
            avg_prediction,
        })
    }
}
