//! Records backed by untyped JSON documents
//!
//! A [`Document`] pairs a JSON value with the descriptor of the record type it
//! claims to be. Field shapes are checked while reading, so a document that
//! is not an object, or whose fields contradict the descriptor, fails with a
//! type error at conversion time.

use super::descriptor::{FieldKind, Record, RecordDescriptor, Slot};
use super::types::{json_type_name, Value};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};

/// JSON document read as a record of a known type
#[derive(Debug, Clone)]
pub struct Document {
    descriptor: &'static RecordDescriptor,
    value: JsonValue,
}

impl Document {
    /// Wrap a JSON value
    pub fn new(descriptor: &'static RecordDescriptor, value: JsonValue) -> Self {
        Self { descriptor, value }
    }

    /// The underlying JSON value
    pub fn value(&self) -> &JsonValue {
        &self.value
    }
}

impl Record for Document {
    fn descriptor(&self) -> &'static RecordDescriptor {
        self.descriptor
    }

    fn slots(&self) -> Result<Vec<Slot<'_>>> {
        let object = self.value.as_object().ok_or_else(|| {
            Error::type_error(format!(
                "input should be a {} record, got {}",
                self.descriptor.name,
                json_type_name(&self.value)
            ))
        })?;
        object_slots(self.descriptor, object)
    }
}

/// Nested object inside a document
struct ObjectRecord<'a> {
    descriptor: &'static RecordDescriptor,
    object: &'a JsonObject,
}

impl Record for ObjectRecord<'_> {
    fn descriptor(&self) -> &'static RecordDescriptor {
        self.descriptor
    }

    fn slots(&self) -> Result<Vec<Slot<'_>>> {
        object_slots(self.descriptor, self.object)
    }
}

fn object_slots<'a>(
    descriptor: &'static RecordDescriptor,
    object: &'a JsonObject,
) -> Result<Vec<Slot<'a>>> {
    descriptor
        .fields
        .iter()
        .map(|field| {
            let Some(name) = field.external_name() else {
                return Ok(Slot::Absent);
            };
            match object.get(name) {
                None | Some(JsonValue::Null) => Ok(Slot::Absent),
                Some(value) => json_slot(&field.kind, value).map_err(|e| match e {
                    Error::Type { message } => Error::type_error(format!(
                        "{}.{name}: {message}",
                        descriptor.name
                    )),
                    other => other,
                }),
            }
        })
        .collect()
}

fn json_slot<'a>(kind: &FieldKind, value: &'a JsonValue) -> Result<Slot<'a>> {
    let mismatch = || {
        Error::type_error(format!(
            "expected {}, got {}",
            kind_name(kind),
            json_type_name(value)
        ))
    };
    let value = match kind {
        FieldKind::Bool => Value::Bool(value.as_bool().ok_or_else(mismatch)?),
        FieldKind::Int => Value::Int(value.as_i64().ok_or_else(mismatch)?),
        FieldKind::UInt => Value::UInt(value.as_u64().ok_or_else(mismatch)?),
        FieldKind::Float => Value::Float(value.as_f64().ok_or_else(mismatch)?),
        FieldKind::String => Value::String(value.as_str().ok_or_else(mismatch)?.to_string()),
        FieldKind::Array => Value::Array(Some(value.as_array().ok_or_else(mismatch)?.clone())),
        FieldKind::Map => Value::Map(Some(value.as_object().ok_or_else(mismatch)?.clone())),
        FieldKind::Scalar(scalar) => Value::String(scalar.canonicalize(value)?),
        FieldKind::Record(nested) => {
            let object = value.as_object().ok_or_else(mismatch)?;
            return Ok(Slot::Record(Box::new(ObjectRecord {
                descriptor: nested(),
                object,
            })));
        }
    };
    Ok(Slot::Value(value))
}

fn kind_name(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Bool => "boolean",
        FieldKind::Int | FieldKind::UInt => "integer",
        FieldKind::Float => "number",
        FieldKind::String => "string",
        FieldKind::Array => "array",
        FieldKind::Map => "object",
        FieldKind::Scalar(_) => "scalar string",
        FieldKind::Record(_) => "record",
    }
}
