//! Column schema discovery
//!
//! The output header is fixed before any row is written: every record is
//! scanned once, payload keys are gathered in first-seen order, and the
//! result is appended after the static columns.

pub mod columns;
pub mod discover;

pub use columns::ColumnSchema;
pub use discover::{discover_schema, SchemaDiscoverer};
