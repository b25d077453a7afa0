use crate::error::Result;

/// Parses a value back from one line of text (without the trailing newline).
pub trait Deserialize: Sized {
    fn deserialize(line: &str) -> Result<Self>;
}
