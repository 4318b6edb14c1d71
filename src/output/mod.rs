//! Output module
//!
//! Serializers that turn records into CSV rows, JSON documents or store
//! inserts.
//!
//! # Overview
//!
//! This module provides:
//! - [`OutputFormat`] parsing from `csv`/`json`/`flatten`/`pretty` tokens
//! - [`CsvSerializer`] with a header locked by the first record
//! - [`JsonSerializer`] for nested or flattened JSON lines
//! - [`DocumentSerializer`] feeding a [`DocumentStore`]
//! - [`ProgressTracker`] for throughput diagnostics
//!
//! Every serializer runs the same [`Modifiers`] stage between conversion and
//! encoding.

mod csv;
mod document;
mod format;
mod json;
mod modifier;
mod progress;

pub use self::csv::{render_cell, CsvSerializer, UTF8_BOM};
pub use document::{DocumentSerializer, DocumentStore, MemoryStore};
pub use format::{FormatKind, OutputFormat};
pub use json::JsonSerializer;
pub use modifier::{parse_json_field, stringify_map, Modifier, Modifiers};
pub use progress::{ProgressSummary, ProgressTracker, BATCH_SIZE, TICKS_PER_LINE};

use crate::convert::Mode;
use crate::error::Result;
use crate::record::Record;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Encodes records onto a sink
pub trait RecordSerializer: Send {
    /// Convert, encode and write one record
    fn write(&mut self, record: &dyn Record) -> Result<()>;

    /// Flush buffered output and release the sink
    ///
    /// Calling `close` more than once is harmless.
    fn close(&mut self) -> Result<()>;
}

/// Destination of an output run
pub enum Sink {
    /// Byte stream receiving encoded text
    Stream {
        writer: Box<dyn Write + Send>,
        is_stdout: bool,
    },
    /// Store receiving converted mappings
    Documents(Box<dyn DocumentStore>),
}

impl Sink {
    /// Standard output
    pub fn stdout() -> Self {
        Sink::Stream {
            writer: Box::new(BufWriter::new(std::io::stdout())),
            is_stdout: true,
        }
    }

    /// Create (or truncate) a file
    pub fn create_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Sink::Stream {
            writer: Box::new(BufWriter::new(file)),
            is_stdout: false,
        })
    }

    /// `-` or an empty path selects stdout
    pub fn from_path(path: Option<&str>) -> Result<Self> {
        match path {
            None | Some("") | Some("-") => Ok(Self::stdout()),
            Some(path) => Self::create_file(path),
        }
    }

    /// Wrap any writer
    pub fn writer(writer: Box<dyn Write + Send>) -> Self {
        Sink::Stream {
            writer,
            is_stdout: false,
        }
    }

    /// Returns true if records go to standard output
    pub fn is_stdout(&self) -> bool {
        matches!(self, Sink::Stream { is_stdout: true, .. })
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sink::Stream { is_stdout, .. } => f
                .debug_struct("Stream")
                .field("is_stdout", is_stdout)
                .finish(),
            Sink::Documents(_) => f.write_str("Documents"),
        }
    }
}

/// Build the serializer for a format and sink
///
/// `modifiers_for` receives the conversion mode the serializer will use, so
/// hooks can differ between nested and flattened output. Document sinks always
/// convert nested and ignore the text format.
pub fn serializer_for(
    format: OutputFormat,
    sink: Sink,
    modifiers_for: &dyn Fn(Mode) -> Modifiers,
) -> Result<Box<dyn RecordSerializer>> {
    match sink {
        Sink::Documents(store) => {
            info!("Writing nested documents to document store");
            Ok(Box::new(DocumentSerializer::new(
                store,
                modifiers_for(Mode::Nested),
            )))
        }
        Sink::Stream { writer, .. } => {
            info!(format = %format, "Opening output stream");
            let modifiers = modifiers_for(format.mode());
            match format.kind {
                FormatKind::Csv => Ok(Box::new(CsvSerializer::new(writer, modifiers)?)),
                FormatKind::Json => Ok(Box::new(JsonSerializer::new(
                    writer,
                    format.mode(),
                    format.pretty,
                    modifiers,
                ))),
            }
        }
    }
}
