use std::io;

use futures::SinkExt;
use tokio::io::AsyncWrite;
use tokio_util::codec::FramedWrite;

use crate::{Serialize, codec::LineCodec};

/// The sending end handle of a stage stream.
pub struct LineSender<W: AsyncWrite + Unpin> {
    tx: FramedWrite<W, LineCodec>,
    buf: String,
}

impl<W: AsyncWrite + Unpin> LineSender<W> {
    /// Creates a new `LineSender` instance.
    ///
    /// # Arguments
    /// * `tx` - The underlying writer.
    pub(super) fn new(tx: W) -> Self {
        Self {
            tx: FramedWrite::new(tx, LineCodec::new()),
            buf: String::new(),
        }
    }

    /// Writes `msg` as one line and flushes it, so the downstream stage sees
    /// it without waiting for more output.
    ///
    /// # Arguments
    /// * `msg` - A serializable object.
    ///
    /// # Returns
    /// An `io::Error` if the downstream end is gone.
    pub async fn send<T: Serialize>(&mut self, msg: &T) -> io::Result<()> {
        let Self { tx, buf } = self;

        buf.clear();
        msg.serialize(buf);
        tx.send(buf.as_str()).await
    }
}
