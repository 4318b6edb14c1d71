//! DuckDB document store

use crate::error::{Error, Result};
use crate::output::DocumentStore;
use crate::record::Mapping;
use crate::types::JsonValue;
use duckdb::{params, Connection};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

/// Table used when none is configured
pub const DEFAULT_TABLE: &str = "records";

static TABLE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("valid table name pattern"));

/// Reject table names that are not plain identifiers
pub fn validate_table_name(table: &str) -> Result<()> {
    if TABLE_NAME.is_match(table) {
        Ok(())
    } else {
        Err(Error::config(format!("invalid document table name: {table:?}")))
    }
}

/// Stores each document as a JSON text row
pub struct DuckDbStore {
    conn: Option<Connection>,
    table: String,
}

impl DuckDbStore {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>, table: &str, drop_existing: bool) -> Result<Self> {
        validate_table_name(table)?;
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|e| Error::store(format!("Failed to open {}: {e}", path.display())))?;
        info!(
            path = %path.display(),
            table,
            drop = drop_existing,
            "Writing to DuckDB document store"
        );
        Self::init(conn, table, drop_existing)
    }

    /// Open a private in-memory database
    pub fn open_in_memory(table: &str) -> Result<Self> {
        validate_table_name(table)?;
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::store(format!("Failed to create DuckDB connection: {e}")))?;
        Self::init(conn, table, false)
    }

    fn init(conn: Connection, table: &str, drop_existing: bool) -> Result<Self> {
        if drop_existing {
            debug!(table, "Dropping existing table");
            conn.execute_batch(&format!("DROP TABLE IF EXISTS {table};"))?;
        }
        conn.execute_batch(&format!("CREATE TABLE IF NOT EXISTS {table} (doc VARCHAR);"))?;
        Ok(Self {
            conn: Some(conn),
            table: table.to_string(),
        })
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| Error::store("document store already closed"))
    }

    /// Table documents are written to
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Number of stored documents
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self.conn()?.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Stored documents in insertion order
    pub fn documents(&self) -> Result<Vec<JsonValue>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT doc FROM {} ORDER BY rowid", self.table))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let documents = rows
            .map(|text| -> Result<JsonValue> { Ok(serde_json::from_str(&text?)?) })
            .collect();
        documents
    }
}

impl DocumentStore for DuckDbStore {
    fn insert(&mut self, document: &Mapping) -> Result<()> {
        let text = serde_json::to_string(document).map_err(|e| Error::encoding(e.to_string()))?;
        self.conn()?.execute(
            &format!("INSERT INTO {} (doc) VALUES (?)", self.table),
            params![text],
        )?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| Error::Database(e))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for DuckDbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbStore")
            .field("table", &self.table)
            .field("open", &self.conn.is_some())
            .finish()
    }
}
