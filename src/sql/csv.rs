//! CSV export of query results.

use crate::model::Row;
use serde_json::Value;

pub const CSV_MIME_TYPE: &str = "text/csv";

/// Serialize rows as CSV, using the first row's keys as the header.
///
/// Strings are always quoted, nulls and missing keys become empty fields, and
/// everything else uses its plain JSON rendering. Rows are joined with `\n`
/// and there is no trailing newline. No rows gives an empty string.
pub fn to_csv(rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let columns: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(","),
    );

    for row in rows {
        let line = columns
            .iter()
            .map(|c| csv_field(row.get(c.as_str())))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

fn csv_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => quote(s),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        // Nested values are written as JSON text, which may contain commas.
        Some(other) => quote(&other.to_string()),
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Download file name for a timestamp in ISO 8601 form.
///
/// Fractional seconds and zone suffix are dropped and colons become hyphens:
/// `2024-05-01T12:30:45.123Z` -> `query-results-2024-05-01T12-30-45.csv`.
pub fn csv_file_name(iso_timestamp: &str) -> String {
    let stamp: String = iso_timestamp.chars().take(19).collect();
    format!("query-results-{}.csv", stamp.replace(':', "-"))
}

/// Download file name for the current UTC time.
pub fn csv_file_name_now() -> String {
    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string();
    csv_file_name(&now)
}
