//! Bridge from an async byte stream to the blocking archive decoder.
//!
//! The tar and decompression decoders are synchronous `Read` consumers. The
//! async side forwards chunks over a bounded channel ([`pump`]); the decoder
//! runs on a blocking thread and pulls them through a [`ChannelReader`]. The
//! bound keeps at most `capacity` chunks in memory.

use std::io::Read;
use std::io::{self};

use bytes::Buf;
use bytes::Bytes;
use futures_util::Stream;
use futures_util::StreamExt;
use tokio::sync::mpsc;

/// Chunks buffered between the transport and the decoder.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Sending half of the chunk channel.
pub type ChunkSender = mpsc::Sender<io::Result<Bytes>>;

/// Creates a bounded chunk channel and the reader draining it.
#[must_use]
pub fn channel(capacity: usize) -> (ChunkSender, ChannelReader) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (tx, ChannelReader::new(rx))
}

/// Forwards every chunk of `stream` into `tx`.
///
/// Stops after the first transport error (which is forwarded so the decoder
/// reports it) or as soon as the reader has been dropped. Dropping `tx` on
/// return signals end of input.
pub async fn pump<S>(stream: S, tx: ChunkSender)
where
    S: Stream<Item = io::Result<Bytes>>,
{
    let mut stream = std::pin::pin!(stream);
    let mut chunks = 0usize;

    while let Some(item) = stream.next().await {
        let failed = item.is_err();
        if tx.send(item).await.is_err() {
            log::trace!("decoder finished after {chunks} chunks, stopping transfer");
            return;
        }
        if failed {
            log::debug!("archive stream failed after {chunks} chunks");
            return;
        }
        chunks += 1;
    }

    log::trace!("archive stream ended after {chunks} chunks");
}

/// Blocking `Read` over chunks received from [`pump`].
///
/// Must only be read from a blocking context (for example inside
/// `tokio::task::spawn_blocking`); reading from an async task panics.
#[derive(Debug)]
pub struct ChannelReader {
    rx: mpsc::Receiver<io::Result<Bytes>>,
    current: Bytes,
    finished: bool,
}

impl ChannelReader {
    fn new(rx: mpsc::Receiver<io::Result<Bytes>>) -> Self {
        Self {
            rx,
            current: Bytes::new(),
            finished: false,
        }
    }
}

impl Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while !self.current.has_remaining() {
            if self.finished {
                return Ok(0);
            }
            match self.rx.blocking_recv() {
                Some(Ok(chunk)) => self.current = chunk,
                Some(Err(e)) => {
                    self.finished = true;
                    return Err(e);
                }
                None => {
                    self.finished = true;
                    return Ok(0);
                }
            }
        }

        let n = buf.len().min(self.current.remaining());
        self.current.copy_to_slice(&mut buf[..n]);
        Ok(n)
    }
}
