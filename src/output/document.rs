//! Document sinks
//!
//! Document stores receive converted mappings directly; no text encoding
//! happens on this path.

use super::modifier::Modifiers;
use super::RecordSerializer;
use crate::convert::{convert, Mode};
use crate::error::{Error, Result};
use crate::record::{Mapping, Record};
use crate::types::JsonValue;
use std::sync::{Arc, Mutex};

/// A store accepting one converted mapping per record
pub trait DocumentStore: Send {
    /// Insert one document
    fn insert(&mut self, document: &Mapping) -> Result<()>;

    /// Release the connection
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// In-memory document store
///
/// Clones share the same backing list, so a test can keep one handle while
/// the serializer owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<Mutex<Vec<JsonValue>>>,
    closed: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of inserted documents
    pub fn documents(&self) -> Vec<JsonValue> {
        self.documents
            .lock()
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }

    /// Returns true once the store has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.lock().map(|c| *c).unwrap_or(false)
    }
}

impl DocumentStore for MemoryStore {
    fn insert(&mut self, document: &Mapping) -> Result<()> {
        let value = serde_json::to_value(document).map_err(|e| Error::encoding(e.to_string()))?;
        self.documents
            .lock()
            .map_err(|_| Error::store("memory store lock poisoned"))?
            .push(value);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        *self
            .closed
            .lock()
            .map_err(|_| Error::store("memory store lock poisoned"))? = true;
        Ok(())
    }
}

/// Serializer writing nested mappings into a [`DocumentStore`]
pub struct DocumentSerializer {
    store: Option<Box<dyn DocumentStore>>,
    modifiers: Modifiers,
}

impl DocumentSerializer {
    pub fn new(store: Box<dyn DocumentStore>, modifiers: Modifiers) -> Self {
        Self {
            store: Some(store),
            modifiers,
        }
    }
}

impl RecordSerializer for DocumentSerializer {
    fn write(&mut self, record: &dyn Record) -> Result<()> {
        let mut mapping = convert(record, false, Mode::Nested)?;
        self.modifiers.apply(&mut mapping)?;
        self.store
            .as_mut()
            .ok_or_else(|| Error::store("document store already closed"))?
            .insert(&mapping)
    }

    fn close(&mut self) -> Result<()> {
        match self.store.take() {
            Some(mut store) => store.close(),
            None => Ok(()),
        }
    }
}
