//! Bounded set of in-flight file writes.

use std::path::PathBuf;

use tokio::runtime::Handle;
use tokio::task::JoinError;
use tokio::task::JoinSet;

use crate::ExtractionError;
use crate::Result;

/// Totals for writes that finished successfully.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteTotals {
    /// Number of files written.
    pub files: usize,
    /// Number of bytes written.
    pub bytes: u64,
}

/// File writes running as tasks on the runtime behind `handle`.
///
/// The decoder thread hands each buffered file to [`PendingWrites::spawn`]
/// and keeps decoding. Both the number of writes and the bytes they hold are
/// bounded; a single file larger than the byte limit is admitted only once
/// nothing else is in flight. Completed writes are collected opportunistically, so
/// the first failure surfaces as soon as it is observed. Dropping the set
/// aborts every write still in flight.
///
/// [`spawn`](Self::spawn) and [`reap`](Self::reap) must be called from a
/// blocking thread, never from an async task.
#[derive(Debug)]
pub struct PendingWrites {
    tasks: JoinSet<Result<u64>>,
    handle: Handle,
    limit: usize,
    byte_limit: u64,
    pending_bytes: u64,
    totals: WriteTotals,
}

impl PendingWrites {
    /// Creates an empty set allowing at most `limit` writes holding at most
    /// `byte_limit` bytes in flight.
    #[must_use]
    pub fn new(handle: Handle, limit: usize, byte_limit: u64) -> Self {
        Self {
            tasks: JoinSet::new(),
            handle,
            limit: limit.max(1),
            byte_limit,
            pending_bytes: 0,
            totals: WriteTotals::default(),
        }
    }

    /// Returns the number of writes still in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns the number of bytes held by writes still in flight.
    #[must_use]
    pub fn pending_bytes(&self) -> u64 {
        self.pending_bytes
    }

    /// Returns `true` if no write is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Starts writing `contents` to `path`.
    ///
    /// Blocks until enough writes have finished to stay within both limits.
    ///
    /// # Errors
    ///
    /// Returns the error of any write that already failed.
    pub fn spawn(&mut self, path: PathBuf, contents: Vec<u8>) -> Result<()> {
        let len = contents.len() as u64;
        self.reap()?;
        while !self.tasks.is_empty()
            && (self.tasks.len() >= self.limit || self.pending_bytes + len > self.byte_limit)
        {
            self.wait_one()?;
        }
        self.pending_bytes += len;
        self.tasks.spawn_on(write_file(path, contents), &self.handle);
        Ok(())
    }

    /// Collects every write that has already finished, without waiting.
    ///
    /// # Errors
    ///
    /// Returns the first failed write found.
    pub fn reap(&mut self) -> Result<()> {
        while let Some(joined) = self.tasks.try_join_next() {
            self.record(joined)?;
        }
        Ok(())
    }

    fn wait_one(&mut self) -> Result<()> {
        if let Some(joined) = self.handle.block_on(self.tasks.join_next()) {
            self.record(joined)?;
        }
        Ok(())
    }

    /// Waits for every remaining write.
    ///
    /// # Errors
    ///
    /// Returns the first failed write; writes still running are aborted.
    pub async fn drain(mut self) -> Result<WriteTotals> {
        while let Some(joined) = self.tasks.join_next().await {
            self.record(joined)?;
        }
        Ok(self.totals)
    }

    fn record(&mut self, joined: std::result::Result<Result<u64>, JoinError>) -> Result<()> {
        let written = joined.map_err(|e| ExtractionError::Task(e.to_string()))??;
        self.pending_bytes = self.pending_bytes.saturating_sub(written);
        self.totals.files += 1;
        self.totals.bytes += written;
        Ok(())
    }
}

async fn write_file(path: PathBuf, contents: Vec<u8>) -> Result<u64> {
    let len = contents.len() as u64;
    tokio::fs::write(&path, contents)
        .await
        .map_err(|e| ExtractionError::filesystem(&path, e))?;
    log::trace!("wrote {} ({len} bytes)", path.display());
    Ok(len)
}
