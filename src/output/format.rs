//! Output format selection

use crate::convert::Mode;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Text encoding of the output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatKind {
    #[default]
    Csv,
    Json,
}

/// Run-level output format
///
/// Parsed from comma-separated tokens: `csv`, `json`, `flatten`, `pretty`.
/// `flatten` and `pretty` imply `json` and combine freely; the last of
/// `csv`/`json` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputFormat {
    pub kind: FormatKind,
    pub flatten: bool,
    pub pretty: bool,
}

impl OutputFormat {
    /// CSV output
    pub fn csv() -> Self {
        Self::default()
    }

    /// Compact nested JSON output
    pub fn json() -> Self {
        Self {
            kind: FormatKind::Json,
            ..Self::default()
        }
    }

    /// Enable flattened JSON
    #[must_use]
    pub fn flattened(mut self) -> Self {
        self.kind = FormatKind::Json;
        self.flatten = true;
        self
    }

    /// Enable 2-space indentation
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.kind = FormatKind::Json;
        self.pretty = true;
        self
    }

    /// Conversion mode used for text output
    pub fn mode(&self) -> Mode {
        match self.kind {
            FormatKind::Csv => Mode::Flatten,
            FormatKind::Json if self.flatten => Mode::Flatten,
            FormatKind::Json => Mode::Nested,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut format = OutputFormat::default();
        for token in s.split(',') {
            match token.trim().to_lowercase().as_str() {
                "csv" => format.kind = FormatKind::Csv,
                "json" => format.kind = FormatKind::Json,
                "flatten" => format = format.flattened(),
                "pretty" => format = format.pretty(),
                other => return Err(Error::unknown_format(other)),
            }
        }
        Ok(format)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FormatKind::Csv => f.write_str("csv"),
            FormatKind::Json => {
                f.write_str("json")?;
                if self.flatten {
                    f.write_str(",flatten")?;
                }
                if self.pretty {
                    f.write_str(",pretty")?;
                }
                Ok(())
            }
        }
    }
}
