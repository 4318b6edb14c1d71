//! Record types shared by unit tests

use crate::record::{Decimal, Optional, Timestamp, Uuid};
use std::collections::BTreeMap;

crate::record! {
    /// Plain leaves plus two nested records
    pub struct V {
        b: bool => "bool",
        i: i64 => "int",
        s: String => "string",
        a: Option<Vec<i64>> => "array_int",
        m: Option<BTreeMap<String, String>> => "map_string",
        p: P => "p",
        q: Q => "q",
        [skip] r: i64 => "r",
        [internal] cache: i64,
    }
}

crate::record! {
    /// Every leaf is an optional reference
    pub struct P {
        b: Optional<bool> => "bool",
        i: Optional<i64> => "int",
        s: Optional<String> => "string",
        a: Option<Vec<Optional<i64>>> => "array_int",
        m: Option<BTreeMap<String, Optional<String>>> => "map_string",
    }
}

crate::record! {
    /// Fields without declared names
    pub struct Q {
        b: bool,
        i: i64,
        s: String,
        a: Option<Vec<i64>>,
        m: Option<BTreeMap<String, String>>,
    }
}

crate::record! {
    /// Scalar overrides at the top level and inside an optional sub-record
    pub struct Stamped {
        at: Timestamp => "at",
        cost: Optional<Decimal> => "cost",
        meter: Uuid => "meterId",
        detail: Optional<Detail> => "detail",
    }
}

crate::record! {
    pub struct Detail {
        when: Optional<Timestamp> => "when",
        flag: Optional<bool> => "flag",
        sub: Optional<Sub> => "sub",
    }
}

crate::record! {
    pub struct Sub {
        b: bool => "bool",
        i: i64 => "int",
    }
}

crate::record! {
    /// One optional string and one boolean
    pub struct Flagged {
        b: bool => "bool",
        note: Optional<String> => "note",
    }
}

crate::record! {
    /// A boolean plus an optional sub-record with one optional integer
    pub struct Row {
        b: bool => "bool",
        sub: Optional<Counter> => "sub",
    }
}

crate::record! {
    pub struct Counter {
        i: Optional<i64> => "int",
    }
}

crate::record! {
    pub struct Measured {
        name: String => "name",
        value: f64 => "value",
    }
}

/// Cloneable in-memory writer
#[derive(Debug, Clone, Default)]
pub struct SharedBuf(pub std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }

    pub fn boxed(&self) -> Box<dyn std::io::Write + Send> {
        Box::new(self.clone())
    }
}

impl std::io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
