//! Value types shared by records, the converter and the serializers

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::de::Deserializer;
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Mapping
// ============================================================================

/// Converted record: external field name to value, ordered by key
pub type Mapping = BTreeMap<String, Value>;

/// A converted field value
///
/// `Array(None)` and `Map(None)` are the absent zero values of collection
/// fields; they stay distinct from empty collections so tabular output can
/// render them differently.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Array(Option<Vec<JsonValue>>),
    Map(Option<JsonObject>),
    /// Sub-mapping produced by nested conversion
    Record(Mapping),
    /// Arbitrary JSON, usually produced by a modifier hook
    Json(JsonValue),
}

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Get the string content if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the sub-mapping if this is a nested record
    pub fn as_record(&self) -> Option<&Mapping> {
        match self {
            Value::Record(m) => Some(m),
            _ => None,
        }
    }

    /// Get the mutable sub-mapping if this is a nested record
    pub fn as_record_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Record(m) => Some(m),
            _ => None,
        }
    }

    /// Convert to a `serde_json::Value`
    pub fn to_json(&self) -> Result<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::UInt(u) => serializer.serialize_u64(*u),
            Value::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Value::Float(f) => Err(S::Error::custom(format!(
                "non-finite float {f} cannot be encoded"
            ))),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(None) | Value::Map(None) => serializer.serialize_none(),
            Value::Array(Some(items)) => items.serialize(serializer),
            Value::Map(Some(entries)) => entries.serialize(serializer),
            Value::Record(m) => m.serialize(serializer),
            Value::Json(v) => v.serialize(serializer),
        }
    }
}

// ============================================================================
// Optional Reference
// ============================================================================

/// A field that may be absent
///
/// Absence and a present zero value are different states: `Absent` is skipped
/// when omission is enabled, `Present(0)` never is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Optional<T> {
    Absent,
    Present(T),
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Optional<T> {
    /// Returns true if the value is absent
    pub fn is_absent(&self) -> bool {
        matches!(self, Optional::Absent)
    }

    /// Returns true if a value is present
    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    /// Borrow the present value
    pub fn as_ref(&self) -> Optional<&T> {
        match self {
            Optional::Absent => Optional::Absent,
            Optional::Present(v) => Optional::Present(v),
        }
    }

    /// Get the present value, if any
    pub fn get(&self) -> Option<&T> {
        match self {
            Optional::Absent => None,
            Optional::Present(v) => Some(v),
        }
    }

    /// Convert into a std `Option`
    pub fn into_option(self) -> Option<T> {
        match self {
            Optional::Absent => None,
            Optional::Present(v) => Some(v),
        }
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Optional::Present(v),
            None => Optional::Absent,
        }
    }
}

impl<T: Serialize> Serialize for Optional<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Optional::Absent => serializer.serialize_none(),
            Optional::Present(v) => serializer.serialize_some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Optional<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Optional::from)
    }
}

// ============================================================================
// Scalar Override Types
// ============================================================================

/// Structurally composite types rendered as a single string leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Timestamp,
    Decimal,
    Uuid,
}

impl ScalarKind {
    /// Canonical rendering of the zero value
    pub fn zero(self) -> String {
        match self {
            ScalarKind::Timestamp => Timestamp::default().to_string(),
            ScalarKind::Decimal => canonical_decimal(&Decimal::ZERO),
            ScalarKind::Uuid => Uuid::nil().to_string(),
        }
    }

    /// Parse a JSON value and re-render it canonically
    pub fn canonicalize(self, value: &JsonValue) -> Result<String> {
        match (self, value) {
            (ScalarKind::Timestamp, JsonValue::String(s)) => Ok(s.parse::<Timestamp>()?.to_string()),
            (ScalarKind::Decimal, JsonValue::String(s)) => decimal_text(s),
            // Number text is kept verbatim, so no float rounding happens here
            (ScalarKind::Decimal, JsonValue::Number(n)) => decimal_text(&n.to_string()),
            (ScalarKind::Uuid, JsonValue::String(s)) => Uuid::parse_str(s)
                .map(|u| u.to_string())
                .map_err(|e| Error::type_error(format!("invalid identifier {s:?}: {e}"))),
            (kind, other) => Err(Error::type_error(format!(
                "expected {kind:?} string, got {}",
                json_type_name(other)
            ))),
        }
    }
}

/// Render a decimal without trailing fractional zeros
pub fn canonical_decimal(d: &Decimal) -> String {
    d.normalize().to_string()
}

/// Largest exponent accepted when expanding decimal text by hand
const MAX_PLAIN_EXPONENT: i64 = 4096;

fn decimal_text(text: &str) -> Result<String> {
    plain_decimal(text).ok_or_else(|| Error::type_error(format!("invalid decimal {text:?}")))
}

/// Rewrite decimal text in plain notation without going through `Decimal`
///
/// Digits beyond `Decimal`'s 28 are kept, and `1e30` becomes
/// `1000000000000000000000000000000`. Leading and trailing zeros are dropped
/// the same way [`canonical_decimal`] drops them.
fn plain_decimal(text: &str) -> Option<String> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (mantissa, exponent) = match rest.find(['e', 'E']) {
        Some(at) => (&rest[..at], rest[at + 1..].parse::<i64>().ok()?),
        None => (rest, 0),
    };
    if exponent.abs() > MAX_PLAIN_EXPONENT {
        return None;
    }
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if (int.is_empty() && frac.is_empty())
        || !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let digits = format!("{int}{frac}");
    let mut point = int.len() as i64 + exponent;
    let significant = digits.trim_start_matches('0');
    point -= (digits.len() - significant.len()) as i64;
    let significant = significant.trim_end_matches('0');
    if significant.is_empty() {
        return Some("0".to_string());
    }

    let len = significant.len() as i64;
    let (whole, fraction) = if point <= 0 {
        ("0".to_string(), format!("{}{significant}", "0".repeat((-point) as usize)))
    } else if point >= len {
        (
            format!("{significant}{}", "0".repeat((point - len) as usize)),
            String::new(),
        )
    } else {
        let (w, f) = significant.split_at(point as usize);
        (w.to_string(), f.to_string())
    };

    let sign = if negative { "-" } else { "" };
    Some(if fraction.is_empty() {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole}.{fraction}")
    })
}

/// Point in time, rendered as RFC 3339 in UTC
///
/// The zero value is `0001-01-01T00:00:00Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub DateTime<Utc>);

impl Default for Timestamp {
    fn default() -> Self {
        Self(
            Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0)
                .single()
                .expect("year 1 is representable"),
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))?;
        // Shortest fraction that keeps every non-zero digit
        let nanos = self.0.timestamp_subsec_nanos() % 1_000_000_000;
        if nanos > 0 {
            let digits = format!("{nanos:09}");
            write!(f, ".{}", digits.trim_end_matches('0'))?;
        }
        f.write_str("Z")
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        // Some management endpoints omit the offset
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self(naive.and_utc()));
        }
        if let Some(naive) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(Self(naive.and_utc()));
        }
        Err(Error::type_error(format!("invalid timestamp {s:?}")))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Short name of a JSON value's type, for error messages
pub(crate) fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
