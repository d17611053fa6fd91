//! Database access: the client seam and the fetches that feed each view.
//!
//! A client is built once per session and passed to whatever needs it.

#[cfg(not(target_arch = "wasm32"))]
mod pg;

#[cfg(not(target_arch = "wasm32"))]
pub use pg::PostgresClient;

use crate::error::ConsoleError;
use crate::model::{ColumnSchema, Relationship, RowPage, RowRange, TableSchema};
use crate::sql::QueryExecutor;
use tracing::warn;

/// Metadata and row access on top of raw execution.
pub trait DatabaseClient: QueryExecutor {
    /// Every table in the public schema with its columns, ordered by name.
    fn list_tables(&self) -> Result<Vec<TableSchema>, ConsoleError>;

    /// Columns of `table` in ordinal order, or `None` when the table does not exist.
    fn table_schema(&self, table: &str) -> Result<Option<Vec<ColumnSchema>>, ConsoleError>;

    fn table_rows(&self, table: &str, range: RowRange) -> Result<RowPage, ConsoleError>;

    /// Foreign-key relationships across the public schema.
    fn relationships(&self) -> Result<Vec<Relationship>, ConsoleError>;
}

/// Relationships for the diagram. A failed fetch counts as none.
pub fn fetch_relationships(client: &dyn DatabaseClient) -> Vec<Relationship> {
    client.relationships().unwrap_or_else(|e| {
        warn!(error = %e, "Error fetching relationships");
        Vec::new()
    })
}

/// Tables for the overview. A failed fetch counts as none.
pub fn fetch_tables(client: &dyn DatabaseClient) -> Vec<TableSchema> {
    client.list_tables().unwrap_or_else(|e| {
        warn!(error = %e, "Error fetching tables");
        Vec::new()
    })
}

/// Schema of one table. Missing tables and failed lookups both read as not found.
pub fn fetch_schema(client: &dyn DatabaseClient, table: &str) -> Result<TableSchema, ConsoleError> {
    match client.table_schema(table) {
        Ok(Some(columns)) => Ok(TableSchema::public(table, columns)),
        Ok(None) => Err(ConsoleError::NotFound(table.to_string())),
        Err(e) => {
            warn!(table, error = %e, "Error fetching schema");
            Err(ConsoleError::NotFound(table.to_string()))
        }
    }
}

/// One page of rows. A failed fetch gives an empty page.
pub fn fetch_rows(client: &dyn DatabaseClient, table: &str, range: RowRange) -> RowPage {
    client.table_rows(table, range).unwrap_or_else(|e| {
        warn!(table, error = %e, "Error fetching rows");
        RowPage::default()
    })
}
