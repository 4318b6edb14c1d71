//! CSV serializer with a locked header
//!
//! The first record fixes the column set for the whole stream:
//!
//! ```text
//! Uninitialized ──first record──▶ HeaderLocked(keys) ──row──▶ Streaming(keys) ──close──▶ Closed
//! ```
//!
//! The header is the sorted key set of the first record converted *with*
//! omission; every row is converted *without* omission and projected onto the
//! locked keys. Optional fields absent from the first record therefore never
//! get a column, even when later records carry them. This asymmetry is kept
//! on purpose and covered by tests.

use super::modifier::Modifiers;
use super::RecordSerializer;
use crate::convert::{convert, Mode};
use crate::error::{Error, Result};
use crate::record::{Record, Value};
use crate::types::JsonValue;
use std::io::Write;
use tracing::debug;

/// UTF-8 byte order mark written before any row
pub const UTF8_BOM: &[u8] = &[0xef, 0xbb, 0xbf];

#[derive(Debug)]
enum HeaderState {
    Uninitialized,
    HeaderLocked(Vec<String>),
    Streaming(Vec<String>),
    Closed,
}

/// Flattened CSV rows against a header locked by the first record
pub struct CsvSerializer {
    writer: Option<csv::Writer<Box<dyn Write + Send>>>,
    state: HeaderState,
    modifiers: Modifiers,
}

impl CsvSerializer {
    /// Open a CSV stream, writing the byte order mark immediately
    pub fn new(mut out: Box<dyn Write + Send>, modifiers: Modifiers) -> Result<Self> {
        out.write_all(UTF8_BOM)?;
        let writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(out);
        Ok(Self {
            writer: Some(writer),
            state: HeaderState::Uninitialized,
            modifiers,
        })
    }

    /// Locked header keys, once the first record has been written
    pub fn header(&self) -> Option<&[String]> {
        match &self.state {
            HeaderState::HeaderLocked(keys) | HeaderState::Streaming(keys) => Some(keys),
            HeaderState::Uninitialized | HeaderState::Closed => None,
        }
    }

    fn lock_header(&mut self, record: &dyn Record) -> Result<()> {
        // BTreeMap keys come out sorted
        let keys: Vec<String> = convert(record, true, Mode::Flatten)?.into_keys().collect();
        debug!(columns = keys.len(), "Locked CSV header");
        self.writer
            .as_mut()
            .ok_or_else(closed)?
            .write_record(&keys)?;
        self.state = HeaderState::HeaderLocked(keys);
        Ok(())
    }
}

impl RecordSerializer for CsvSerializer {
    fn write(&mut self, record: &dyn Record) -> Result<()> {
        if matches!(self.state, HeaderState::Uninitialized) {
            self.lock_header(record)?;
        }
        let keys = match &self.state {
            HeaderState::HeaderLocked(keys) | HeaderState::Streaming(keys) => keys,
            HeaderState::Uninitialized | HeaderState::Closed => return Err(closed()),
        };

        let mut complete = convert(record, false, Mode::Flatten)?;
        self.modifiers.apply(&mut complete)?;
        let row = keys
            .iter()
            .map(|key| complete.get(key).map_or_else(|| Ok(String::new()), render_cell))
            .collect::<Result<Vec<String>>>()?;

        self.writer
            .as_mut()
            .ok_or_else(closed)?
            .write_record(&row)?;

        self.state = match std::mem::replace(&mut self.state, HeaderState::Closed) {
            HeaderState::HeaderLocked(keys) => HeaderState::Streaming(keys),
            other => other,
        };
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.state = HeaderState::Closed;
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Render one cell
///
/// Absent collections become `[]`/`{}`; present ones (even empty) are
/// compact JSON.
pub fn render_cell(value: &Value) -> Result<String> {
    let cell = match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) | Value::Json(JsonValue::String(s)) => s.clone(),
        Value::Array(None) => "[]".to_string(),
        Value::Map(None) => "{}".to_string(),
        Value::Array(Some(items)) => serde_json::to_string(items)?,
        Value::Map(Some(entries)) => serde_json::to_string(entries)?,
        Value::Record(sub) => serde_json::to_string(sub)?,
        Value::Json(other) => serde_json::to_string(other)?,
    };
    Ok(cell)
}

fn closed() -> Error {
    Error::encoding("CSV stream already closed")
}
