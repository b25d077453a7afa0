use std::{error::Error, fmt};

/// The result type used by every parser in this crate.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Names a position inside a line so diagnostics can point at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Feature(usize),
    Label,
    Loss,
    Prediction,
    Count,
    Tag(&'static str),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Id => write!(f, "id"),
            Field::Feature(i) => write!(f, "feature {i}"),
            Field::Label => write!(f, "label"),
            Field::Loss => write!(f, "loss"),
            Field::Prediction => write!(f, "prediction"),
            Field::Count => write!(f, "count"),
            Field::Tag(tag) => write!(f, "tag {tag}"),
        }
    }
}

/// Why a single line could not be turned into a record.
///
/// Every variant is a soft error: the offending line is dropped and the stream
/// goes on.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    MissingField(Field),
    TrailingFields { extra: usize },
    InvalidInteger { field: Field, value: String },
    InvalidFloat { field: Field, value: String },
    NonFinite(Field),
    NonPositiveId,
    NegativeLoss(f32),
    UnexpectedTag { expected: &'static str, got: String },
    InvalidUtf8,
    LineTooLong { max: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingField(field) => write!(f, "missing {field}"),
            ParseError::TrailingFields { extra } => {
                write!(f, "{extra} unexpected trailing field(s)")
            }
            ParseError::InvalidInteger { field, value } => {
                write!(f, "{field} is not an integer: {value:?}")
            }
            ParseError::InvalidFloat { field, value } => {
                write!(f, "{field} is not a number: {value:?}")
            }
            ParseError::NonFinite(field) => write!(f, "{field} is not finite"),
            ParseError::NonPositiveId => write!(f, "id must be a positive integer"),
            ParseError::NegativeLoss(loss) => write!(f, "loss must not be negative, got {loss}"),
            ParseError::UnexpectedTag { expected, got } => {
                write!(f, "expected tag {expected}, got {got:?}")
            }
            ParseError::InvalidUtf8 => write!(f, "line is not valid utf-8"),
            ParseError::LineTooLong { max } => write!(f, "line exceeds {max} bytes"),
        }
    }
}

impl Error for ParseError {}
