//! Modifier hooks
//!
//! Hooks run in order on a converted mapping before it is encoded. The first
//! failing hook aborts the record.

use crate::error::Result;
use crate::record::{Mapping, Value};
use crate::types::JsonValue;
use std::fmt;

/// A single post-conversion mutation
pub type Modifier = Box<dyn Fn(&mut Mapping) -> Result<()> + Send + Sync>;

/// Ordered list of modifier hooks
#[derive(Default)]
pub struct Modifiers {
    hooks: Vec<Modifier>,
}

impl Modifiers {
    /// Create an empty hook list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook
    #[must_use]
    pub fn with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Mapping) -> Result<()> + Send + Sync + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Number of hooks
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if there are no hooks
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook in order, stopping at the first failure
    pub fn apply(&self, mapping: &mut Mapping) -> Result<()> {
        for hook in &self.hooks {
            hook(mapping)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modifiers")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// Replace a mapping-valued field with its JSON text (`{}` when absent)
pub fn stringify_map(key: &'static str) -> impl Fn(&mut Mapping) -> Result<()> + Send + Sync {
    move |mapping: &mut Mapping| {
        if let Some(value) = mapping.get_mut(key) {
            let text = match value {
                Value::Map(None) => "{}".to_string(),
                Value::Map(Some(entries)) => serde_json::to_string(&*entries)?,
                _ => return Ok(()),
            };
            *value = Value::String(text);
        }
        Ok(())
    }
}

/// Parse a JSON-string field at `path` into an object
///
/// `path` walks nested sub-mappings. Strings that are not JSON objects are
/// left untouched.
pub fn parse_json_field(
    path: &'static [&'static str],
) -> impl Fn(&mut Mapping) -> Result<()> + Send + Sync {
    move |mapping: &mut Mapping| {
        let Some((last, parents)) = path.split_last() else {
            return Ok(());
        };
        let mut current = mapping;
        for parent in parents {
            match current.get_mut(*parent).and_then(Value::as_record_mut) {
                Some(sub) => current = sub,
                None => return Ok(()),
            }
        }
        if let Some(value) = current.get_mut(*last) {
            if let Some(JsonValue::Object(object)) = value
                .as_str()
                .and_then(|s| serde_json::from_str::<JsonValue>(s).ok())
            {
                *value = Value::Json(JsonValue::Object(object));
            }
        }
        Ok(())
    }
}
