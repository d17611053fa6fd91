use thiserror::Error;

/// Errors surfaced to a console view.
///
/// None of these are fatal: each one is contained and displayed by the view
/// that triggered it.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Query is empty: please enter a SQL query to execute")]
    EmptyQuery,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Executor(String),
    #[error("Table '{0}' not found")]
    NotFound(String),
    #[error("Failed to fetch {what}: {message}")]
    Fetch { what: &'static str, message: String },
    #[error("Failed to connect to database: {0}")]
    Connection(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConsoleError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn fetch(what: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Fetch {
            what,
            message: err.to_string(),
        }
    }

    /// Validation failures happen before anything reaches the database.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyQuery | Self::Validation(_))
    }
}
