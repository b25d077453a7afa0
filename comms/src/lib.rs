//! Line oriented record codec shared by every pipeline stage.
//!
//! Stages talk over plain byte streams, one record per line:
//! * dataset rows: `id, f_0, ..., f_{N-1}, label`
//! * stage records: `id f_0 ... f_{N-1} label`
//! * learner results: `id loss prediction`
//! * monitor output: `SAMPLE <id> LOSS <loss> YHAT <prediction>` and
//!   `SUMMARY <count> <avg_loss> <avg_prediction>`

mod codec;
mod deserialize;
mod error;
mod fields;
mod receiver;
mod record;
mod report;
mod sender;
mod serialize;

use tokio::io::{AsyncRead, AsyncWrite};

pub use codec::{DEFAULT_MAX_LINE, LineCodec, RawLine};
pub use deserialize::Deserialize;
pub use error::{Field, ParseError, Result};
pub use receiver::{LineReceiver, Received};
pub use record::{INPUT_DIM, Record, ResultRecord};
pub use report::{SampleLine, Summary};
pub use sender::LineSender;
pub use serialize::Serialize;

/// Creates both `LineReceiver` and `LineSender` stream parts.
///
/// Given a reader and a writer creates and returns both ends a stage uses.
///
/// # Arguments
/// * `rx` - An async readable, the upstream stream.
/// * `tx` - An async writable, the downstream stream.
///
/// # Returns
/// A line receiver and a line sender.
pub fn channel<R, W>(rx: R, tx: W) -> (LineReceiver<R>, LineSender<W>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    (LineReceiver::new(rx), LineSender::new(tx))
}
