//! JSON-lines serializer

use super::modifier::Modifiers;
use super::RecordSerializer;
use crate::convert::{convert, Mode};
use crate::error::{Error, Result};
use crate::record::Record;
use std::io::Write;

/// One JSON object per record, each followed by a newline
///
/// Records are converted without omission. Pretty output uses 2-space
/// indentation, so an object spans several lines but is still terminated by
/// exactly one newline.
pub struct JsonSerializer {
    out: Option<Box<dyn Write + Send>>,
    mode: Mode,
    pretty: bool,
    modifiers: Modifiers,
}

impl JsonSerializer {
    pub fn new(out: Box<dyn Write + Send>, mode: Mode, pretty: bool, modifiers: Modifiers) -> Self {
        Self {
            out: Some(out),
            mode,
            pretty,
            modifiers,
        }
    }

    /// Conversion mode in use
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl RecordSerializer for JsonSerializer {
    fn write(&mut self, record: &dyn Record) -> Result<()> {
        let mut mapping = convert(record, false, self.mode)?;
        self.modifiers.apply(&mut mapping)?;

        // Encode fully before touching the stream
        let mut buf = if self.pretty {
            serde_json::to_vec_pretty(&mapping)
        } else {
            serde_json::to_vec(&mapping)
        }
        .map_err(|e| Error::encoding(e.to_string()))?;
        buf.push(b'\n');

        let out = self
            .out
            .as_mut()
            .ok_or_else(|| Error::encoding("JSON stream already closed"))?;
        out.write_all(&buf)?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut out) = self.out.take() {
            out.flush()?;
        }
        Ok(())
    }
}
