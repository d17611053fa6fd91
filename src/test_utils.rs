//! Shared fixtures for unit tests.

use crate::db::DatabaseClient;
use crate::error::ConsoleError;
use crate::layout::Point;
use crate::model::{ColumnSchema, Relationship, Row, RowPage, RowRange, TableSchema};
use crate::render::DrawingSurface;
use crate::sql::{ExecutorError, QueryExecutor};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Relationship `from.<to>_id -> to.id`.
pub fn relationship(from: &str, to: &str) -> Relationship {
    Relationship {
        table_name: from.to_string(),
        column_name: format!("{}_id", to),
        foreign_table: to.to_string(),
        foreign_column: "id".to_string(),
        constraint_name: format!("{}_{}_id_fkey", from, to),
    }
}

/// Build a row from a JSON object literal.
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("row fixture must be an object, got {}", other),
    }
}

/// In-memory client that records SQL and replays canned responses.
#[derive(Default)]
pub struct MockClient {
    tables: Vec<(TableSchema, Vec<Row>)>,
    relationships: Vec<Relationship>,
    metadata_fails: bool,
    responses: RefCell<VecDeque<Result<Vec<Row>, ExecutorError>>>,
    executed: RefCell<Vec<String>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: &str, columns: Vec<ColumnSchema>, rows: Vec<Row>) -> Self {
        self.tables.push((TableSchema::public(name, columns), rows));
        self
    }

    pub fn with_relationships(mut self, relationships: Vec<Relationship>) -> Self {
        self.relationships = relationships;
        self
    }

    /// Every metadata call fails as if the database were unreachable.
    pub fn failing_metadata(mut self) -> Self {
        self.metadata_fails = true;
        self
    }

    /// Queue a successful response for the next `execute_sql`.
    pub fn with_sql_rows(self, rows: Vec<Row>) -> Self {
        self.responses.borrow_mut().push_back(Ok(rows));
        self
    }

    /// Queue a rejection for the next `execute_sql`.
    pub fn with_sql_error(self, message: &str) -> Self {
        self.with_sql_failure(ExecutorError::Rejected(message.to_string()))
    }

    pub fn with_sql_failure(self, err: ExecutorError) -> Self {
        self.responses.borrow_mut().push_back(Err(err));
        self
    }

    /// SQL received by `execute_sql`, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }

    fn check_metadata(&self, what: &'static str) -> Result<(), ConsoleError> {
        if self.metadata_fails {
            return Err(ConsoleError::fetch(what, "connection refused"));
        }
        Ok(())
    }

    fn table(&self, name: &str) -> Option<&(TableSchema, Vec<Row>)> {
        self.tables.iter().find(|(t, _)| t.table_name == name)
    }
}

impl QueryExecutor for MockClient {
    fn execute_sql(&self, query: &str) -> Result<Vec<Row>, ExecutorError> {
        self.executed.borrow_mut().push(query.to_string());
        self.responses.borrow_mut().pop_front().unwrap_or(Ok(Vec::new()))
    }
}

impl DatabaseClient for MockClient {
    fn list_tables(&self) -> Result<Vec<TableSchema>, ConsoleError> {
        self.check_metadata("tables")?;
        let mut tables: Vec<TableSchema> = self.tables.iter().map(|(t, _)| t.clone()).collect();
        tables.sort_by(|a, b| a.table_name.cmp(&b.table_name));
        Ok(tables)
    }

    fn table_schema(&self, table: &str) -> Result<Option<Vec<ColumnSchema>>, ConsoleError> {
        self.check_metadata("schema")?;
        Ok(self.table(table).map(|(t, _)| t.columns.clone()))
    }

    fn table_rows(&self, table: &str, range: RowRange) -> Result<RowPage, ConsoleError> {
        self.check_metadata("rows")?;
        let Some((_, rows)) = self.table(table) else {
            return Err(ConsoleError::fetch("rows", format!("relation \"{}\" does not exist", table)));
        };
        Ok(RowPage {
            rows: rows
                .iter()
                .skip(range.offset as usize)
                .take(range.limit as usize)
                .cloned()
                .collect(),
            total_count: rows.len() as u64,
        })
    }

    fn relationships(&self) -> Result<Vec<Relationship>, ConsoleError> {
        self.check_metadata("relationships")?;
        Ok(self.relationships.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Circle {
        center: Point,
        radius: f64,
        fill: String,
        stroke: String,
    },
    Line {
        from: Point,
        to: Point,
    },
    Polygon {
        points: Vec<Point>,
        fill: String,
    },
    Text {
        text: String,
        at: Point,
    },
}

/// Surface that keeps the primitives of the current frame.
pub struct RecordingSurface {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<SurfaceOp>,
    pub clears: usize,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            clears: 0,
        }
    }

    pub fn count(&self, pred: impl Fn(&SurfaceOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.clears += 1;
    }

    fn draw_circle(&mut self, center: Point, radius: f64, fill: &str, stroke: &str, _line_width: f64) {
        self.ops.push(SurfaceOp::Circle {
            center,
            radius,
            fill: fill.to_string(),
            stroke: stroke.to_string(),
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, _stroke: &str, _line_width: f64) {
        self.ops.push(SurfaceOp::Line { from, to });
    }

    fn draw_filled_polygon(&mut self, points: &[Point], fill: &str) {
        self.ops.push(SurfaceOp::Polygon {
            points: points.to_vec(),
            fill: fill.to_string(),
        });
    }

    fn draw_text(&mut self, text: &str, at: Point, _color: &str, _font: &str) {
        self.ops.push(SurfaceOp::Text {
            text: text.to_string(),
            at,
        });
    }
}
