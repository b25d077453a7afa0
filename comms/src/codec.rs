use std::io;

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::ParseError;

/// Longest line accepted by default, newline excluded.
pub const DEFAULT_MAX_LINE: usize = 64 * 1024;

/// One newline delimited frame as it came off the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum RawLine {
    Text(String),
    /// The frame could not even be read as text. The bytes are gone, the
    /// stream is still in sync at the next newline.
    Invalid(ParseError),
}

/// Newline delimited framing for the stage streams.
///
/// Unlike `tokio_util::codec::LinesCodec` a bad frame (invalid utf-8 or an
/// overlong line) never poisons the stream: it is yielded as
/// `RawLine::Invalid` and decoding resumes after the next newline.
#[derive(Debug, Clone)]
pub struct LineCodec {
    /// Bytes of the buffer already scanned for a newline.
    next_index: usize,
    max_length: usize,
    /// Set while skipping the rest of an overlong line.
    discarding: bool,
}

impl LineCodec {
    /// Returns a `LineCodec` with the default line limit.
    pub fn new() -> Self {
        Self::with_max_length(DEFAULT_MAX_LINE)
    }

    /// Returns a `LineCodec` that rejects lines longer than `max_length` bytes.
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            next_index: 0,
            max_length,
            discarding: false,
        }
    }

    fn to_raw(&self, mut line: BytesMut) -> RawLine {
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }

        match std::str::from_utf8(&line) {
            Ok(text) => RawLine::Text(text.to_string()),
            Err(_) => RawLine::Invalid(ParseError::InvalidUtf8),
        }
    }

    fn too_long(&self) -> RawLine {
        RawLine::Invalid(ParseError::LineTooLong {
            max: self.max_length,
        })
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = RawLine;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> io::Result<Option<RawLine>> {
        loop {
            let read_to = buf.len().min(self.max_length.saturating_add(1));
            let newline = buf[self.next_index..read_to]
                .iter()
                .position(|b| *b == b'\n')
                .map(|offset| offset + self.next_index);

            match (self.discarding, newline) {
                (true, Some(end)) => {
                    buf.advance(end + 1);
                    self.discarding = false;
                    self.next_index = 0;
                    return Ok(Some(self.too_long()));
                }
                (true, None) => {
                    buf.advance(read_to);
                    self.next_index = 0;
                    if buf.is_empty() {
                        return Ok(None);
                    }
                }
                (false, Some(end)) => {
                    self.next_index = 0;
                    let mut line = buf.split_to(end + 1);
                    line.truncate(end);
                    return Ok(Some(self.to_raw(line)));
                }
                (false, None) if buf.len() > self.max_length => {
                    self.discarding = true;
                }
                (false, None) => {
                    self.next_index = read_to;
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> io::Result<Option<RawLine>> {
        if let Some(line) = self.decode(buf)? {
            return Ok(Some(line));
        }

        self.next_index = 0;
        if self.discarding {
            self.discarding = false;
            buf.clear();
            return Ok(Some(self.too_long()));
        }

        if buf.is_empty() {
            return Ok(None);
        }

        let line = buf.split_to(buf.len());
        Ok(Some(self.to_raw(line)))
    }
}

impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = io::Error;

    fn encode(&mut self, line: T, buf: &mut BytesMut) -> io::Result<()> {
        let line = line.as_ref();
        buf.reserve(line.len() + 1);
        buf.put_slice(line.as_bytes());
        buf.put_u8(b'\n');
        Ok(())
    }
}
