//! Plain-text result grids.

use crate::measure::TextMetrics;
use crate::model::{ColumnSchema, Row};
use crate::sql::{QueryOutcome, QueryResult};
use serde_json::Value;

pub const NO_RESULTS: &str = "No results to display";

/// How one value is shown in a cell.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Align `cells` under `headers`, truncating wide cells.
pub fn render_table(metrics: &TextMetrics, headers: &[String], cells: &[Vec<String>]) -> String {
    let clean = |s: &str| -> String {
        let flat: String = s.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();
        metrics.truncate(&flat, metrics.max_cell_width)
    };

    let headers: Vec<String> = headers.iter().map(|h| clean(h.as_str())).collect();
    let cells: Vec<Vec<String>> = cells
        .iter()
        .map(|row| row.iter().map(|c| clean(c.as_str())).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| metrics.text_width(h)).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(metrics.text_width(cell));
        }
    }

    let line = |values: &[String]| -> String {
        widths
            .iter()
            .enumerate()
            .map(|(i, w)| metrics.pad(values.get(i).map_or("", String::as_str), *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(cells.len() + 2);
    out.push(line(&headers));
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &cells {
        out.push(line(row));
    }
    out.join("\n")
}

/// Grid of rows under the given columns.
pub fn render_rows(metrics: &TextMetrics, columns: &[String], rows: &[Row]) -> String {
    if columns.is_empty() || rows.is_empty() {
        return NO_RESULTS.to_string();
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| cell_text(row.get(c))).collect())
        .collect();
    render_table(metrics, columns, &cells)
}

/// Summary line plus grid, or the error block.
pub fn render_outcome(metrics: &TextMetrics, outcome: &QueryOutcome) -> String {
    match &outcome.result {
        QueryResult::Rows { columns, rows } => format!(
            "{}\n\n{}",
            outcome.summary(),
            render_rows(metrics, columns, rows)
        ),
        QueryResult::Error { message } => format!("Error executing query\n{}", message),
    }
}

/// Column listing for the schema view.
pub fn render_schema(metrics: &TextMetrics, columns: &[ColumnSchema]) -> String {
    let headers: Vec<String> = ["column", "type", "nullable", "default", "key", "references"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let cells: Vec<Vec<String>> = columns
        .iter()
        .map(|c| {
            let key = match (c.is_primary_key, c.is_foreign_key) {
                (true, true) => "PK, FK",
                (true, false) => "PK",
                (false, true) => "FK",
                (false, false) => "",
            };
            let references = match (&c.foreign_key_table, &c.foreign_key_column) {
                (Some(t), Some(col)) => format!("{}.{}", t, col),
                (Some(t), None) => t.clone(),
                _ => String::new(),
            };
            vec![
                c.column_name.clone(),
                c.data_type.clone(),
                if c.is_nullable { "yes" } else { "no" }.to_string(),
                c.column_default.clone().unwrap_or_default(),
                key.to_string(),
                references,
            ]
        })
        .collect();
    render_table(metrics, &headers, &cells)
}
