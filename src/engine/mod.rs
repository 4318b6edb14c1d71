//! Export engine module
//!
//! The pull loop tying a record source to a serializer.
//!
//! # Overview
//!
//! [`Exporter`] requests one record at a time, hands it to the serializer
//! and advances the progress tracker once the write succeeded. The first
//! failure stops the loop. Whatever happens, the serializer is closed and the
//! progress summary emitted exactly once: on return from [`Exporter::export`],
//! on an explicit [`Exporter::close`], or when the exporter is dropped while
//! unwinding.

use crate::error::Result;
use crate::output::{ProgressSummary, ProgressTracker, RecordSerializer};
use crate::record::Record;
use crate::source::RecordSource;
use tracing::{debug, warn};

/// Drives one output run
pub struct Exporter {
    serializer: Box<dyn RecordSerializer>,
    progress: ProgressTracker,
    summary: Option<ProgressSummary>,
}

impl Exporter {
    /// Create an exporter for one run
    pub fn new(serializer: Box<dyn RecordSerializer>, progress: ProgressTracker) -> Self {
        Self {
            serializer,
            progress,
            summary: None,
        }
    }

    /// Records written so far
    pub fn count(&self) -> u64 {
        self.progress.count()
    }

    /// Returns true once the serializer has been closed
    pub fn is_closed(&self) -> bool {
        self.summary.is_some()
    }

    /// Export every record of `source`, then close
    ///
    /// A source, conversion or write failure is returned after cleanup; a
    /// close failure is returned only when the run itself succeeded.
    pub async fn export<S: RecordSource>(&mut self, source: &mut S) -> Result<ProgressSummary> {
        let pumped = self.pump(source).await;
        let closed = self.close();
        match (pumped, closed) {
            (Ok(()), closed) => closed,
            (Err(e), Ok(_)) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!("Failed to close output after error: {}", close_err);
                Err(e)
            }
        }
    }

    async fn pump<S: RecordSource>(&mut self, source: &mut S) -> Result<()> {
        while let Some(record) = source.next_record().await? {
            self.write(&record)?;
        }
        debug!(records = self.progress.count(), "Source exhausted");
        Ok(())
    }

    /// Serialize one record and count it
    pub fn write(&mut self, record: &dyn Record) -> Result<()> {
        self.serializer.write(record)?;
        self.progress.advance();
        Ok(())
    }

    /// Flush and close the serializer, then emit the summary
    ///
    /// Only the first call does any work; later calls return the same
    /// summary.
    pub fn close(&mut self) -> Result<ProgressSummary> {
        if let Some(summary) = self.summary {
            return Ok(summary);
        }
        let closed = self.serializer.close();
        let summary = self.progress.finish();
        self.summary = Some(summary);
        closed.map(|()| summary)
    }
}

impl Drop for Exporter {
    fn drop(&mut self) {
        if self.summary.is_none() {
            if let Err(e) = self.close() {
                warn!("Failed to close output: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests;
