//! Ad-hoc SQL: execution, result export and schema-editing statements.

mod console;
mod csv;
pub mod ddl;
mod executor;
mod types;

pub use console::{QueryOutcome, QueryResult, SqlConsole, columns_of};
pub use csv::{CSV_MIME_TYPE, csv_file_name, csv_file_name_now, to_csv};
pub use executor::{ExecutorError, ExecutorResponse, QueryExecutor};
pub use types::{DATA_TYPES, DataTypeOption, resolve_data_type};
