use std::fmt::Write;

use crate::{
    Deserialize, Serialize,
    error::{Field, Result},
    fields,
    serialize::push_floats,
};

/// Dimensionality of the feature vector carried by every record.
pub const INPUT_DIM: usize = 4;

/// One sample flowing through the pipeline.
///
/// `id` is assigned by the data source and is never renumbered downstream, it
/// is what correlates a final output line with its raw input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub id: u64,
    pub features: [f32; INPUT_DIM],
    pub label: f32,
}

impl Record {
    /// Creates a new `Record`.
    ///
    /// # Arguments
    /// * `id` - The stable sample identifier.
    /// * `features` - The feature vector.
    /// * `label` - The regression target.
    pub fn new(id: u64, features: [f32; INPUT_DIM], label: f32) -> Self {
        Self {
            id,
            features,
            label,
        }
    }

    /// Parses a raw dataset line: `id, f_0, ..., f_{N-1}, label`.
    ///
    /// # Arguments
    /// * `line` - A single comma separated line, without the newline.
    ///
    /// # Returns
    /// The parsed record or the reason the line is malformed.
    pub fn from_csv_line(line: &str) -> Result<Self> {
        let mut fields = fields::comma(line);
        let id = fields.id()?;

        let mut features = [0.0; INPUT_DIM];
        for (i, feature) in features.iter_mut().enumerate() {
            *feature = fields.float(Field::Feature(i))?;
        }

        let label = fields.float(Field::Label)?;
        fields.finish()?;

        Ok(Self::new(id, features, label))
    }
}

impl Serialize for Record {
    /// `id f_0 ... f_{N-1} label`
    fn serialize(&self, buf: &mut String) {
        let _ = write!(buf, "{}", self.id);
        push_floats(buf, &self.features);
        push_floats(buf, &[self.label]);
    }
}

impl Deserialize for Record {
    fn deserialize(line: &str) -> Result<Self> {
        let mut fields = fields::whitespace(line);
        let id = fields.id()?;

        let mut features = [0.0; INPUT_DIM];
        for (i, feature) in features.iter_mut().enumerate() {
            *feature = fields.float(Field::Feature(i))?;
        }

        let label = fields.float(Field::Label)?;
        fields.finish()?;

        Ok(Self::new(id, features, label))
    }
}

/// What the learner reports for every record it consumed.
///
/// Unlike the input records, `loss` and `prediction` may be infinite or `NaN`
/// when a sample overflows the model, the record is still part of the stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultRecord {
    pub id: u64,
    pub loss: f32,
    pub prediction: f32,
}

impl ResultRecord {
    pub fn new(id: u64, loss: f32, prediction: f32) -> Self {
        Self {
            id,
            loss,
            prediction,
        }
    }
}

impl Serialize for ResultRecord {
    /// `id loss prediction`
    fn serialize(&self, buf: &mut String) {
        let _ = write!(buf, "{}", self.id);
        push_floats(buf, &[self.loss, self.prediction]);
    }
}

impl Deserialize for ResultRecord {
    fn deserialize(line: &str) -> Result<Self> {
        let mut fields = fields::whitespace(line);
        let id = fields.id()?;
        let loss: f32 = fields.number(Field::Loss)?;
        let prediction = fields.number(Field::Prediction)?;
        fields.finish()?;

        if loss < 0.0 {
            return Err(crate::ParseError::NegativeLoss(loss));
        }

        Ok(Self::new(id, loss, prediction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseError;

    #[test]
    fn csv_line_tolerates_blanks_around_commas() {
        let record = Record::from_csv_line("7, 0.5 ,-1.25,3,  4e-2 , 2.0").unwrap();
        assert_eq!(record, Record::new(7, [0.5, -1.25, 3.0, 0.04], 2.0));
    }

    #[test]
    fn csv_header_is_malformed() {
        let err = Record::from_csv_line("id,f0,f1,f2,f3,label").unwrap_err();
        assert!(matches!(err, ParseError::InvalidInteger { field: Field::Id, .. }));
    }

    #[test]
    fn csv_line_missing_label() {
        let err = Record::from_csv_line("1,0.0,0.0,0.0,2.0").unwrap_err();
        assert_eq!(err, ParseError::MissingField(Field::Label));
    }

    #[test]
    fn record_line_keeps_exact_bits() {
        let record = Record::new(3, [0.1, 1.0 / 3.0, -7.25e-8, 16777217.0], 0.3);
        let line = record.to_line();
        assert_eq!(Record::deserialize(&line).unwrap(), record);
    }

    #[test]
    fn record_line_format() {
        let record = Record::new(1, [0.0, 0.5, -1.0, 4.0], 2.0);
        assert_eq!(record.to_line(), "1 0 0.5 -1 4 2");
    }

    #[test]
    fn record_line_rejects_trailing_fields() {
        let err = Record::deserialize("1 0 0 0 0 2 9").unwrap_err();
        assert_eq!(err, ParseError::TrailingFields { extra: 1 });
    }

    #[test]
    fn record_line_rejects_zero_and_negative_ids() {
        assert_eq!(
            Record::deserialize("0 0 0 0 0 1").unwrap_err(),
            ParseError::NonPositiveId
        );
        assert!(matches!(
            Record::deserialize("-4 0 0 0 0 1").unwrap_err(),
            ParseError::InvalidInteger { field: Field::Id, .. }
        ));
    }

    #[test]
    fn record_line_rejects_non_finite_values() {
        assert_eq!(
            Record::deserialize("1 0 NaN 0 0 1").unwrap_err(),
            ParseError::NonFinite(Field::Feature(1))
        );
        assert_eq!(
            Record::deserialize("1 0 0 0 0 inf").unwrap_err(),
            ParseError::NonFinite(Field::Label)
        );
    }

    #[test]
    fn result_line() {
        let result = ResultRecord::deserialize("12 0.125 -0.5").unwrap();
        assert_eq!(result, ResultRecord::new(12, 0.125, -0.5));
        assert_eq!(result.to_line(), "12 0.125 -0.5");
    }

    #[test]
    fn result_line_carries_overflowed_values() {
        let result = ResultRecord::new(5, f32::INFINITY, 5e27);
        let line = result.to_line();
        assert_eq!(line, "5 inf 5000000000000000000000000000");
        assert_eq!(ResultRecord::deserialize(&line).unwrap(), result);

        let nan = ResultRecord::deserialize("6 NaN NaN").unwrap();
        assert_eq!(nan.id, 6);
        assert!(nan.loss.is_nan() && nan.prediction.is_nan());
    }

    #[test]
    fn result_line_rejects_negative_loss() {
        assert_eq!(
            ResultRecord::deserialize("12 -0.1 0").unwrap_err(),
            ParseError::NegativeLoss(-0.1)
        );
    }
}
