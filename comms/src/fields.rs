use std::str::FromStr;

use crate::error::{Field, ParseError, Result};

/// Cursor over the tokens of one line.
///
/// The same cursor serves the whitespace separated stage format and the comma
/// separated dataset format, only the tokenizer differs.
pub(crate) struct Fields<I> {
    tokens: I,
}

/// Tokenizes a stage-to-stage line.
pub(crate) fn whitespace(line: &str) -> Fields<impl Iterator<Item = &str>> {
    Fields {
        tokens: line.split_whitespace(),
    }
}

/// Tokenizes a dataset line, tolerating blanks around each comma.
pub(crate) fn comma(line: &str) -> Fields<impl Iterator<Item = &str>> {
    Fields {
        tokens: line.split(',').map(str::trim),
    }
}

impl<'a, I> Fields<I>
where
    I: Iterator<Item = &'a str>,
{
    fn next(&mut self, field: Field) -> Result<&'a str> {
        self.tokens.next().ok_or(ParseError::MissingField(field))
    }

    /// Consumes a literal tag such as `SAMPLE`.
    pub(crate) fn tag(&mut self, expected: &'static str) -> Result<()> {
        let got = self.next(Field::Tag(expected))?;
        if got != expected {
            return Err(ParseError::UnexpectedTag {
                expected,
                got: got.to_string(),
            });
        }

        Ok(())
    }

    /// Consumes a positive record id.
    pub(crate) fn id(&mut self) -> Result<u64> {
        let id = self.count(Field::Id)?;
        if id == 0 {
            return Err(ParseError::NonPositiveId);
        }

        Ok(id)
    }

    /// Consumes an unsigned integer.
    pub(crate) fn count(&mut self, field: Field) -> Result<u64> {
        let raw = self.next(field)?;
        raw.parse().map_err(|_| ParseError::InvalidInteger {
            field,
            value: raw.to_string(),
        })
    }

    /// Consumes a finite `f32`.
    pub(crate) fn float(&mut self, field: Field) -> Result<f32> {
        let value: f32 = self.number(field)?;
        if !value.is_finite() {
            return Err(ParseError::NonFinite(field));
        }

        Ok(value)
    }

    /// Consumes a floating point value, `inf` and `NaN` included.
    pub(crate) fn number<T: FromStr>(&mut self, field: Field) -> Result<T> {
        let raw = self.next(field)?;
        raw.parse().map_err(|_| ParseError::InvalidFloat {
            field,
            value: raw.to_string(),
        })
    }

    /// Fails if any token is left over.
    pub(crate) fn finish(self) -> Result<()> {
        match self.tokens.count() {
            0 => Ok(()),
            extra => Err(ParseError::TrailingFields { extra }),
        }
    }
}
