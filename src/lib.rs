// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # azbill
//!
//! Export Azure billing data (billing accounts, invoices, subscriptions,
//! tenants and usage details) from Resource Manager as CSV, JSON or rows in
//! a DuckDB document table.
//!
//! ## Features
//!
//! - **Typed records**: `record!` declares transfer shapes with tag names,
//!   optional fields and scalar overrides
//! - **Two conversions**: nested mappings or flattened dotted keys
//! - **CSV**: header locked by the first record, BOM, CRLF rows
//! - **JSON**: one document per line, compact or pretty, nested or flat
//! - **Document store**: nested documents inserted into DuckDB
//! - **Progress**: batch ticks and a final throughput line
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use azbill::output::{serializer_for, Modifiers, OutputFormat, ProgressTracker, Sink};
//! use azbill::Mode;
//! use azbill::engine::Exporter;
//! use azbill::source::IterSource;
//!
//! let format: OutputFormat = "json,pretty".parse()?;
//! let serializer = serializer_for(format, Sink::stdout(), &|_: Mode| Modifiers::new())?;
//! let mut exporter = Exporter::new(serializer, ProgressTracker::new());
//! let summary = exporter.export(&mut IterSource::new(records)).await?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           CLI                                │
//! │   accounts  invoices  subscriptions  tenants  usage-details  │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌───────────┬──────────────┬───┴──────────┬────────────────────┐
//! │  Source   │   Convert    │   Output     │   Sink             │
//! ├───────────┼──────────────┼──────────────┼────────────────────┤
//! │ ARM pager │ Nested       │ CSV          │ stdout / file      │
//! │ JSON lines│ Flatten      │ JSON         │ DuckDB documents   │
//! │ Iterator  │ Modifiers    │ Documents    │ Progress           │
//! └───────────┴──────────────┴──────────────┴────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Record descriptors and the `record!` macro
pub mod record;

/// Record to mapping conversion
pub mod convert;

/// Serializers, sinks and progress
pub mod output;

/// Record sources
pub mod source;

/// Resource Manager client with retry
pub mod http;

/// Export driver
pub mod engine;

/// Billing resource shapes and requests
pub mod billing;

/// DuckDB document store
pub mod database;

/// Settings file
pub mod config;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod fixtures;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}

// ============================================================================
// Re-exports
// ============================================================================

pub use convert::{convert, Mode};
pub use engine::Exporter;
pub use error::{Error, Result};
pub use output::{OutputFormat, RecordSerializer, Sink};
pub use record::{Optional, Record, RecordDescriptor};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
