//! Static field descriptors and the record traits built on them
//!
//! Every record type carries one [`RecordDescriptor`], built once and shared
//! by nested conversion, flattened conversion and CSV header computation.
//! Values are read positionally through [`Record::slots`], in the same order
//! as the descriptor's fields.

use super::types::{canonical_decimal, Optional, ScalarKind, Timestamp, Value};
use crate::error::Result;
use crate::types::JsonValue;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

// ============================================================================
// Descriptors
// ============================================================================

/// Whether a field appears in output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Emitted under its external name
    #[default]
    Exported,
    /// Explicitly excluded from output
    Excluded,
    /// Not externally visible
    Internal,
}

/// Shape of a field's value
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Bool,
    Int,
    UInt,
    Float,
    String,
    Array,
    Map,
    /// Rendered as its canonical string, never recursed into
    Scalar(ScalarKind),
    /// Nested record, resolved lazily so record types may refer to each other
    Record(fn() -> &'static RecordDescriptor),
}

impl FieldKind {
    /// Zero value for leaf kinds; `None` for nested records
    pub fn zero_value(&self) -> Option<Value> {
        let value = match self {
            FieldKind::Bool => Value::Bool(false),
            FieldKind::Int => Value::Int(0),
            FieldKind::UInt => Value::UInt(0),
            FieldKind::Float => Value::Float(0.0),
            FieldKind::String => Value::String(String::new()),
            FieldKind::Array => Value::Array(None),
            FieldKind::Map => Value::Map(None),
            FieldKind::Scalar(kind) => Value::String(kind.zero()),
            FieldKind::Record(_) => return None,
        };
        Some(value)
    }

    /// Returns true for scalar override types
    pub fn is_scalar_override(&self) -> bool {
        matches!(self, FieldKind::Scalar(_))
    }

    /// Nested descriptor, if this is a record field
    pub fn nested(&self) -> Option<&'static RecordDescriptor> {
        match self {
            FieldKind::Record(descriptor) => Some(descriptor()),
            _ => None,
        }
    }
}

/// One declared field of a record type
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Identifier in the record type
    pub ident: &'static str,
    /// Declared external name
    pub rename: Option<&'static str>,
    pub visibility: Visibility,
    /// True for optional references
    pub optional: bool,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Create a field descriptor
    pub fn new(ident: &'static str, kind: FieldKind) -> Self {
        Self {
            ident,
            rename: None,
            visibility: Visibility::Exported,
            optional: false,
            kind,
        }
    }

    /// Set the declared external name
    #[must_use]
    pub fn renamed(mut self, name: &'static str) -> Self {
        self.rename = Some(name);
        self
    }

    /// Set the visibility
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark as an optional reference
    #[must_use]
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// External name, or `None` if the field is never emitted
    pub fn external_name(&self) -> Option<&'static str> {
        match self.visibility {
            Visibility::Exported => Some(self.rename.unwrap_or(self.ident)),
            Visibility::Excluded | Visibility::Internal => None,
        }
    }
}

/// Ordered field list of a record type
#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    /// Create a record descriptor
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }

    /// Look up a field by external name
    pub fn field(&self, external_name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.external_name() == Some(external_name))
    }
}

// ============================================================================
// Record Traits
// ============================================================================

/// A field value read from a record
pub enum Slot<'a> {
    /// Optional reference without a value
    Absent,
    /// Leaf value, including scalar overrides already rendered
    Value(Value),
    /// Nested record
    Record(Box<dyn Record + 'a>),
}

/// A record instance that can be converted
pub trait Record {
    /// Descriptor of this record's type
    fn descriptor(&self) -> &'static RecordDescriptor;

    /// Field values in descriptor order
    fn slots(&self) -> Result<Vec<Slot<'_>>>;
}

impl<R: Record + ?Sized> Record for &R {
    fn descriptor(&self) -> &'static RecordDescriptor {
        (**self).descriptor()
    }

    fn slots(&self) -> Result<Vec<Slot<'_>>> {
        (**self).slots()
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn descriptor(&self) -> &'static RecordDescriptor {
        (**self).descriptor()
    }

    fn slots(&self) -> Result<Vec<Slot<'_>>> {
        (**self).slots()
    }
}

/// Record types with a statically known descriptor
pub trait RecordType: Record {
    /// The type's descriptor
    fn record_descriptor() -> &'static RecordDescriptor;
}

/// Zero value of a record type: every field reads as absent
///
/// Converting it without omission expands each field to its zero value.
#[derive(Debug, Clone, Copy)]
pub struct ZeroRecord(pub &'static RecordDescriptor);

impl Record for ZeroRecord {
    fn descriptor(&self) -> &'static RecordDescriptor {
        self.0
    }

    fn slots(&self) -> Result<Vec<Slot<'_>>> {
        Ok(self.0.fields.iter().map(|_| Slot::Absent).collect())
    }
}

// ============================================================================
// Field Types
// ============================================================================

/// Rust types usable as record fields
pub trait FieldType {
    /// Kind recorded in the descriptor
    fn kind() -> FieldKind;

    /// True for optional references
    fn optional() -> bool {
        false
    }

    /// Read the current value
    fn slot(&self) -> Result<Slot<'_>>;
}

macro_rules! leaf_field {
    ($ty:ty, $kind:ident, |$v:ident| $value:expr) => {
        impl FieldType for $ty {
            fn kind() -> FieldKind {
                FieldKind::$kind
            }

            fn slot(&self) -> Result<Slot<'_>> {
                let $v = self;
                Ok(Slot::Value($value))
            }
        }
    };
}

leaf_field!(bool, Bool, |v| Value::Bool(*v));
leaf_field!(i32, Int, |v| Value::Int(i64::from(*v)));
leaf_field!(i64, Int, |v| Value::Int(*v));
leaf_field!(u32, UInt, |v| Value::UInt(u64::from(*v)));
leaf_field!(u64, UInt, |v| Value::UInt(*v));
leaf_field!(f64, Float, |v| Value::Float(*v));
leaf_field!(String, String, |v| Value::String(v.clone()));

impl FieldType for Timestamp {
    fn kind() -> FieldKind {
        FieldKind::Scalar(ScalarKind::Timestamp)
    }

    fn slot(&self) -> Result<Slot<'_>> {
        Ok(Slot::Value(Value::String(self.to_string())))
    }
}

impl FieldType for Decimal {
    fn kind() -> FieldKind {
        FieldKind::Scalar(ScalarKind::Decimal)
    }

    fn slot(&self) -> Result<Slot<'_>> {
        Ok(Slot::Value(Value::String(canonical_decimal(self))))
    }
}

impl FieldType for Uuid {
    fn kind() -> FieldKind {
        FieldKind::Scalar(ScalarKind::Uuid)
    }

    fn slot(&self) -> Result<Slot<'_>> {
        Ok(Slot::Value(Value::String(self.to_string())))
    }
}

impl<T: FieldType> FieldType for Optional<T> {
    fn kind() -> FieldKind {
        T::kind()
    }

    fn optional() -> bool {
        true
    }

    fn slot(&self) -> Result<Slot<'_>> {
        match self {
            Optional::Absent => Ok(Slot::Absent),
            Optional::Present(v) => v.slot(),
        }
    }
}

/// `None` is the absent zero value, not an omitted field
impl<T: Serialize> FieldType for Option<Vec<T>> {
    fn kind() -> FieldKind {
        FieldKind::Array
    }

    fn slot(&self) -> Result<Slot<'_>> {
        let items = match self {
            None => None,
            Some(items) => Some(
                items
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<std::result::Result<Vec<JsonValue>, _>>()?,
            ),
        };
        Ok(Slot::Value(Value::Array(items)))
    }
}

impl<T: Serialize> FieldType for Option<BTreeMap<String, T>> {
    fn kind() -> FieldKind {
        FieldKind::Map
    }

    fn slot(&self) -> Result<Slot<'_>> {
        let entries = match self {
            None => None,
            Some(entries) => Some(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), serde_json::to_value(v)?)))
                    .collect::<Result<_>>()?,
            ),
        };
        Ok(Slot::Value(Value::Map(entries)))
    }
}
