//! SQL editor session: validate, execute, keep the last result for display and export.

use super::csv::to_csv;
use super::executor::QueryExecutor;
use crate::error::ConsoleError;
use crate::model::Row;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Outcome of one execution. Exactly one of rows or an error message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QueryResult {
    Rows { columns: Vec<String>, rows: Vec<Row> },
    Error { message: String },
}

impl QueryResult {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let columns = columns_of(&rows);
        Self::Rows { columns, rows }
    }

    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            Self::Rows { rows, .. } => Some(rows),
            Self::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            Self::Rows { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn row_count(&self) -> usize {
        self.rows().map_or(0, <[Row]>::len)
    }
}

/// Column names are the keys of the first row.
pub fn columns_of(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub result: QueryResult,
    /// Wall-clock time around the executor call. Advisory only.
    pub elapsed: Duration,
}

impl QueryOutcome {
    /// e.g. `Query executed in 0.12s • 3 rows returned`
    pub fn summary(&self) -> String {
        match &self.result {
            QueryResult::Rows { rows, .. } => format!(
                "Query executed in {:.2}s • {} rows returned",
                self.elapsed.as_secs_f64(),
                rows.len()
            ),
            QueryResult::Error { .. } => format!(
                "Query failed after {:.2}s",
                self.elapsed.as_secs_f64()
            ),
        }
    }
}

/// One SQL editor. Holds the query text and the last outcome.
///
/// `execute` takes `&mut self`, so a console never has two queries in flight.
pub struct SqlConsole<E: QueryExecutor> {
    executor: E,
    query: String,
    last: Option<QueryOutcome>,
}

impl<E: QueryExecutor> SqlConsole<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            query: String::new(),
            last: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Whether the run trigger should be enabled.
    pub fn can_execute(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Run the current query text.
    pub fn run(&mut self) -> Result<&QueryOutcome, ConsoleError> {
        let query = self.query.clone();
        self.execute(&query)
    }

    /// Validate and run `query`, replacing the previous outcome.
    ///
    /// Blank text is rejected without calling the executor. Executor failures
    /// are not `Err`: they come back as `QueryResult::Error`.
    pub fn execute(&mut self, query: &str) -> Result<&QueryOutcome, ConsoleError> {
        if query.trim().is_empty() {
            return Err(ConsoleError::EmptyQuery);
        }

        self.last = None;
        debug!(query, "executing sql");

        let start = Instant::now();
        let response = self.executor.execute_sql(query);
        let elapsed = start.elapsed();

        let result = match response {
            Ok(rows) => {
                info!(rows = rows.len(), elapsed_ms = elapsed.as_millis() as u64, "query executed");
                QueryResult::from_rows(rows)
            }
            Err(e) => {
                info!(error = %e, elapsed_ms = elapsed.as_millis() as u64, "query failed");
                QueryResult::Error {
                    message: e.to_string(),
                }
            }
        };

        Ok(self.last.insert(QueryOutcome { result, elapsed }))
    }

    pub fn last_outcome(&self) -> Option<&QueryOutcome> {
        self.last.as_ref()
    }

    /// CSV of the last result, when it holds at least one row.
    pub fn export_csv(&self) -> Option<String> {
        let rows = self.last.as_ref()?.result.rows()?;
        if rows.is_empty() {
            return None;
        }
        Some(to_csv(rows))
    }

    /// Drop the last result, e.g. when the view is left.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }
}
