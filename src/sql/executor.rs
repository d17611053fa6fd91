//! Raw SQL executor seam.

use crate::model::Row;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// The database rejected or failed the statement. Displayed verbatim.
    #[error("{0}")]
    Rejected(String),
    /// The statement never got an answer from the database.
    #[error("connection error: {0}")]
    Transport(String),
}

/// Anything that can run a raw SQL string and hand back rows.
///
/// Query text is forwarded as-is; rejecting unsafe input is the database's job.
pub trait QueryExecutor {
    fn execute_sql(&self, query: &str) -> Result<Vec<Row>, ExecutorError>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn execute_sql(&self, query: &str) -> Result<Vec<Row>, ExecutorError> {
        (**self).execute_sql(query)
    }
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for Box<T> {
    fn execute_sql(&self, query: &str) -> Result<Vec<Row>, ExecutorError> {
        (**self).execute_sql(query)
    }
}

const DEFAULT_FAILURE: &str = "An error occurred while executing the query";

/// Wire shape of an execution response from a backend proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<Row>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecutorResponse {
    pub fn into_result(self) -> Result<Vec<Row>, ExecutorError> {
        if self.success {
            Ok(self.data.unwrap_or_default())
        } else {
            Err(ExecutorError::Rejected(
                self.error.unwrap_or_else(|| DEFAULT_FAILURE.to_string()),
            ))
        }
    }
}

impl From<Result<Vec<Row>, ExecutorError>> for ExecutorResponse {
    fn from(result: Result<Vec<Row>, ExecutorError>) -> Self {
        match result {
            Ok(rows) => Self {
                success: true,
                data: Some(rows),
                error: None,
            },
            Err(e) => Self {
                success: false,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }
}
