//! Tests for engine module

use super::*;
use crate::error::Error;
use crate::fixtures::{Measured, SharedBuf, Sub};
use crate::output::{CsvSerializer, JsonSerializer, MemoryStore, Modifiers, DocumentSerializer, UTF8_BOM};
use crate::convert::Mode;
use crate::record::{RecordDescriptor, RecordType, Slot};
use crate::source::IterSource;
use std::panic::{catch_unwind, AssertUnwindSafe};

fn quiet_progress() -> ProgressTracker {
    ProgressTracker::with_writer(Box::new(std::io::sink())).quiet(true)
}

fn subs(n: i64) -> impl Iterator<Item = Result<Sub>> + Send {
    (0..n).map(|i| Ok(Sub { b: i % 2 == 0, i }))
}

/// Panics when read
struct Exploding;

impl Record for Exploding {
    fn descriptor(&self) -> &'static RecordDescriptor {
        Sub::record_descriptor()
    }

    fn slots(&self) -> Result<Vec<Slot<'_>>> {
        panic!("record exploded")
    }
}

#[tokio::test]
async fn test_export_csv_run() {
    let buf = SharedBuf::default();
    let serializer = CsvSerializer::new(buf.boxed(), Modifiers::new()).unwrap();
    let mut exporter = Exporter::new(Box::new(serializer), quiet_progress());

    let summary = exporter.export(&mut IterSource::new(subs(3))).await.unwrap();
    assert_eq!(summary.records, 3);
    assert!(exporter.is_closed());

    let bytes = buf.bytes();
    assert!(bytes.starts_with(UTF8_BOM));
    assert_eq!(
        String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap(),
        "bool,int\r\ntrue,0\r\nfalse,1\r\ntrue,2\r\n"
    );
}

#[tokio::test]
async fn test_export_empty_source_still_closes() {
    let store = MemoryStore::new();
    let serializer = DocumentSerializer::new(Box::new(store.clone()), Modifiers::new());
    let mut exporter = Exporter::new(Box::new(serializer), quiet_progress());

    let summary = exporter.export(&mut IterSource::new(subs(0))).await.unwrap();
    assert_eq!(summary.records, 0);
    assert!(store.is_closed());
    assert!(store.documents().is_empty());
}

#[tokio::test]
async fn test_source_failure_aborts_after_cleanup() {
    let store = MemoryStore::new();
    let serializer = DocumentSerializer::new(Box::new(store.clone()), Modifiers::new());
    let mut exporter = Exporter::new(Box::new(serializer), quiet_progress());

    let items = subs(2).chain(std::iter::once(Err(Error::source_error("next page failed"))));
    let err = exporter.export(&mut IterSource::new(items)).await.unwrap_err();
    assert!(matches!(err, Error::Source { .. }));
    assert_eq!(store.documents().len(), 2);
    assert!(store.is_closed());
    assert_eq!(exporter.count(), 2);
}

#[tokio::test]
async fn test_encoding_failure_keeps_output_well_formed() {
    let buf = SharedBuf::default();
    let serializer = JsonSerializer::new(buf.boxed(), Mode::Nested, false, Modifiers::new());
    let mut exporter = Exporter::new(Box::new(serializer), quiet_progress());

    let records = vec![
        Ok(Measured {
            name: "ok".to_string(),
            value: 1.0,
        }),
        Ok(Measured {
            name: "bad".to_string(),
            value: f64::INFINITY,
        }),
        Ok(Measured::default()),
    ];
    let err = exporter
        .export(&mut IterSource::new(records.into_iter()))
        .await
        .unwrap_err();
    assert!(err.is_encoding());
    assert_eq!(exporter.count(), 1);
    assert_eq!(buf.contents(), "{\"name\":\"ok\",\"value\":1.0}\n");
}

#[test]
fn test_close_is_idempotent() {
    let store = MemoryStore::new();
    let serializer = DocumentSerializer::new(Box::new(store.clone()), Modifiers::new());
    let mut exporter = Exporter::new(Box::new(serializer), quiet_progress());
    exporter.write(&Sub::default()).unwrap();

    let first = exporter.close().unwrap();
    let second = exporter.close().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.records, 1);
}

#[test]
fn test_drop_closes_sink() {
    let store = MemoryStore::new();
    {
        let serializer = DocumentSerializer::new(Box::new(store.clone()), Modifiers::new());
        let mut exporter = Exporter::new(Box::new(serializer), quiet_progress());
        exporter.write(&Sub::default()).unwrap();
    }
    assert!(store.is_closed());
}

#[test]
fn test_panic_still_closes_sink() {
    let store = MemoryStore::new();
    let handle = store.clone();
    let result = catch_unwind(AssertUnwindSafe(move || {
        let serializer = DocumentSerializer::new(Box::new(store), Modifiers::new());
        let mut exporter = Exporter::new(Box::new(serializer), quiet_progress());
        exporter.write(&Sub::default()).unwrap();
        exporter.write(&Exploding)
    }));
    assert!(result.is_err());
    assert!(handle.is_closed());
    assert_eq!(handle.documents().len(), 1);
}
