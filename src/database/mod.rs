//! Document store backed by DuckDB
//!
//! Each converted record is stored as one JSON text row, so the table can be
//! queried with DuckDB's JSON functions afterwards.

mod store;

pub use store::{validate_table_name, DuckDbStore, DEFAULT_TABLE};
