//! Record conversion
//!
//! Turns a record into a [`Mapping`] keyed by external field names.
//!
//! # Overview
//!
//! Two modes share one depth-first, declaration-order traversal:
//! - `Nested` keeps the record hierarchy as sub-mappings
//! - `Flatten` produces a single level, joining nested names with `.`
//!
//! Omission controls absent optional references: with `omit_absent` they are
//! skipped entirely, without it they are expanded to their zero values.
//! Scalar override types are leaves; arrays and mappings are never entered.

use crate::error::{Error, Result};
use crate::record::{Document, Mapping, Record, RecordDescriptor, Slot, Value, ZeroRecord};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// Conversion mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Sub-records become sub-mappings
    #[default]
    Nested,
    /// Sub-records are merged with dotted names
    Flatten,
}

/// Convert a record to a mapping
pub fn convert(record: &dyn Record, omit_absent: bool, mode: Mode) -> Result<Mapping> {
    let mut out = Mapping::new();
    walk(record, omit_absent, mode, "", &mut out)?;
    Ok(out)
}

/// Convert an untyped JSON document against a record descriptor
///
/// Fails with a type error if `value` is not an object or a field's shape
/// contradicts the descriptor.
pub fn convert_document(
    value: JsonValue,
    descriptor: &'static RecordDescriptor,
    omit_absent: bool,
    mode: Mode,
) -> Result<Mapping> {
    convert(&Document::new(descriptor, value), omit_absent, mode)
}

fn walk(
    record: &dyn Record,
    omit_absent: bool,
    mode: Mode,
    prefix: &str,
    out: &mut Mapping,
) -> Result<()> {
    let descriptor = record.descriptor();
    let slots = record.slots()?;
    if slots.len() != descriptor.fields.len() {
        return Err(Error::type_error(format!(
            "{} declares {} fields but produced {}",
            descriptor.name,
            descriptor.fields.len(),
            slots.len()
        )));
    }

    for (field, slot) in descriptor.fields.iter().zip(slots) {
        let Some(name) = field.external_name() else {
            continue;
        };
        let key = format!("{prefix}{name}");
        match slot {
            Slot::Absent if field.optional && omit_absent => {}
            Slot::Absent => match field.kind.nested() {
                Some(nested) => descend(&ZeroRecord(nested), key, omit_absent, mode, out)?,
                None => {
                    if let Some(zero) = field.kind.zero_value() {
                        out.insert(key, zero);
                    }
                }
            },
            Slot::Record(child) => descend(child.as_ref(), key, omit_absent, mode, out)?,
            Slot::Value(value) => {
                out.insert(key, value);
            }
        }
    }
    Ok(())
}

fn descend(
    child: &dyn Record,
    key: String,
    omit_absent: bool,
    mode: Mode,
    out: &mut Mapping,
) -> Result<()> {
    match mode {
        Mode::Nested => {
            let mut sub = Mapping::new();
            walk(child, omit_absent, mode, "", &mut sub)?;
            out.insert(key, Value::Record(sub));
        }
        Mode::Flatten => walk(child, omit_absent, mode, &format!("{key}."), out)?,
    }
    Ok(())
}
