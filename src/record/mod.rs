//! Record module
//!
//! Declared record shapes and the values read from them.
//!
//! # Overview
//!
//! - `RecordDescriptor` / `FieldDescriptor` - static description of a record type
//! - `Record` / `RecordType` - positional access to field values
//! - `Optional` - optional references (`Absent | Present`)
//! - `Timestamp`, `Decimal`, `Uuid` - scalar override types
//! - `Document` - untyped JSON checked against a descriptor
//! - `record!` - declares a transfer shape together with its descriptor

mod descriptor;
mod document;
mod macros;
mod types;

pub use descriptor::{
    FieldDescriptor, FieldKind, FieldType, Record, RecordDescriptor, RecordType, Slot, Visibility,
    ZeroRecord,
};
pub use document::Document;
pub use types::{canonical_decimal, Mapping, Optional, ScalarKind, Timestamp, Value};

pub use rust_decimal::Decimal;
pub use uuid::Uuid;
