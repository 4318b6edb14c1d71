//! Newline-delimited JSON replay

use super::RecordSource;
use crate::error::{Error, Result, ResultExt};
use crate::record::{Document, RecordDescriptor};
use crate::types::JsonValue;
use async_trait::async_trait;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::debug;

/// Replays one JSON document per line as records of a known type
///
/// Blank lines are skipped. Shapes are only checked when a record is
/// converted, so a line holding a JSON array decodes fine here and fails
/// later with a type error.
pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    descriptor: &'static RecordDescriptor,
    line_no: usize,
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesSource<R> {
    pub fn new(reader: R, descriptor: &'static RecordDescriptor) -> Self {
        Self {
            lines: reader.lines(),
            descriptor,
            line_no: 0,
        }
    }
}

impl JsonLinesSource<BufReader<tokio::fs::File>> {
    /// Open a file for replay
    pub async fn open(
        path: impl AsRef<Path>,
        descriptor: &'static RecordDescriptor,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;
        debug!(path = %path.display(), record = descriptor.name, "Replaying JSON lines");
        Ok(Self::new(BufReader::new(file), descriptor))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> RecordSource for JsonLinesSource<R> {
    type Record = Document;

    async fn next_record(&mut self) -> Result<Option<Document>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let value: JsonValue = serde_json::from_str(&line)
                .map_err(|e| Error::decode(format!("line {}: {e}", self.line_no)))?;
            return Ok(Some(Document::new(self.descriptor, value)));
        }
        Ok(None)
    }
}
