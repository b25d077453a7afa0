use std::io;

use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;

use crate::{Deserialize, ParseError, RawLine, codec::LineCodec};

/// What the receiving end produced for one non blank line.
#[derive(Debug, Clone, PartialEq)]
pub enum Received<T> {
    Record(T),
    /// The line could not be parsed. Carries the line (lossy when it was not
    /// text) so it can be reported on the diagnostic channel.
    Malformed { line: String, err: ParseError },
}

/// The receiving end handle of a stage stream.
pub struct LineReceiver<R: AsyncRead + Unpin> {
    rx: FramedRead<R, LineCodec>,
}

impl<R: AsyncRead + Unpin> LineReceiver<R> {
    /// Creates a new `LineReceiver` instance.
    ///
    /// # Arguments
    /// * `rx` - The underlying reader.
    pub(super) fn new(rx: R) -> Self {
        Self::with_codec(rx, LineCodec::new())
    }

    /// Creates a new `LineReceiver` with a custom codec.
    pub fn with_codec(rx: R, codec: LineCodec) -> Self {
        Self {
            rx: FramedRead::new(rx, codec),
        }
    }

    /// Waits for the next non blank line and parses it as a `T`.
    ///
    /// # Returns
    /// `Ok(None)` once the writer closed the stream, otherwise the parsed record
    /// or the malformed line. Only transport failures are errors.
    pub async fn recv<T: Deserialize>(&mut self) -> io::Result<Option<Received<T>>> {
        loop {
            let Some(frame) = self.rx.next().await else {
                return Ok(None);
            };

            let received = match frame? {
                RawLine::Text(line) if line.trim().is_empty() => continue,
                RawLine::Text(line) => match T::deserialize(&line) {
                    Ok(record) => Received::Record(record),
                    Err(err) => Received::Malformed { line, err },
                },
                RawLine::Invalid(err) => Received::Malformed {
                    line: String::new(),
                    err,
                },
            };

            return Ok(Some(received));
        }
    }
}
