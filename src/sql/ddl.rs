//! DDL statements for the schema editor forms.
//!
//! Statements are built here and run through the same executor as ad-hoc SQL.

use super::types::{resolve_data_type, split_modifier, with_modifier};
use crate::error::ConsoleError;
use std::collections::HashSet;
use std::str::FromStr;

const SCHEMA: &str = "public";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    /// SQL expression, passed through as written.
    pub default_value: Option<String>,
    pub is_primary_key: bool,
    pub references: Option<ForeignKeyRef>,
}

impl ColumnDefinition {
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable: true,
            default_value: None,
            is_primary_key: false,
            references: None,
        }
    }

    /// A primary key is never nullable.
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.is_nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    pub fn default_value(mut self, expr: &str) -> Self {
        self.default_value = Some(expr.to_string());
        self
    }

    pub fn references(mut self, table: &str, column: &str) -> Self {
        self.references = Some(ForeignKeyRef {
            table: table.to_string(),
            column: column.to_string(),
        });
        self
    }
}

fn next_part(rest: &mut &str) -> Option<String> {
    let current: &str = *rest;
    if current.is_empty() {
        return None;
    }
    if current.starts_with("default=") {
        *rest = "";
        return Some(current.to_string());
    }
    let (part, tail) = current.split_once(':').unwrap_or((current, ""));
    *rest = tail;
    Some(part.to_string())
}

/// Parses `name:type[:pk][:notnull][:null][:ref=table.column][:default=EXPR]`.
///
/// `default=` takes the rest of the input, so it has to come last.
impl FromStr for ColumnDefinition {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rest = s;
        let name = next_part(&mut rest).unwrap_or_default();
        let data_type = next_part(&mut rest)
            .ok_or_else(|| ConsoleError::validation(format!("Column '{}' needs a data type", s)))?;
        let mut column = ColumnDefinition::new(name.trim(), data_type.trim());

        while let Some(flag) = next_part(&mut rest) {
            match flag.as_str() {
                "pk" => column = column.primary_key(),
                "notnull" => column = column.not_null(),
                "null" => column.is_nullable = true,
                f if f.starts_with("default=") => {
                    column = column.default_value(&f["default=".len()..]);
                }
                f if f.starts_with("ref=") => {
                    let target = &f["ref=".len()..];
                    let (table, col) = target.split_once('.').ok_or_else(|| {
                        ConsoleError::validation(format!(
                            "Reference '{}' must be written as table.column",
                            target
                        ))
                    })?;
                    column = column.references(table, col);
                }
                other => {
                    return Err(ConsoleError::validation(format!(
                        "Unknown column option '{}'",
                        other
                    )));
                }
            }
        }

        Ok(column)
    }
}

/// A change to an existing column. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnChange {
    pub column: String,
    pub data_type: Option<String>,
    pub nullable: Option<bool>,
    /// `Some(None)` drops the default.
    pub default_value: Option<Option<String>>,
}

/// Double-quote an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn qualified_table(table: &str) -> String {
    format!("{}.{}", quote_ident(SCHEMA), quote_ident(table))
}

fn require_name(kind: &str, name: &str) -> Result<(), ConsoleError> {
    if name.trim().is_empty() {
        return Err(ConsoleError::validation(format!("{} name is required", kind)));
    }
    Ok(())
}

fn sql_type(data_type: &str) -> Result<String, ConsoleError> {
    let resolved = resolve_data_type(data_type)
        .ok_or_else(|| ConsoleError::validation(format!("Unknown data type '{}'", data_type)))?;
    match split_modifier(data_type).1 {
        Some(modifier) => with_modifier(resolved, &modifier).ok_or_else(|| {
            ConsoleError::validation(format!(
                "Type '{}' does not take the modifier {}",
                resolved.value, modifier
            ))
        }),
        None => Ok(resolved.value.to_string()),
    }
}

fn column_sql(column: &ColumnDefinition) -> Result<String, ConsoleError> {
    require_name("Column", &column.name)?;

    let mut sql = format!("{} {}", quote_ident(&column.name), sql_type(&column.data_type)?);
    if !column.is_nullable || column.is_primary_key {
        sql.push_str(" NOT NULL");
    }
    if let Some(default) = column.default_value.as_deref().filter(|d| !d.trim().is_empty()) {
        sql.push_str(" DEFAULT ");
        sql.push_str(default);
    }
    if column.is_primary_key {
        sql.push_str(" PRIMARY KEY");
    }
    if let Some(fk) = &column.references {
        require_name("Referenced table", &fk.table)?;
        require_name("Referenced column", &fk.column)?;
        sql.push_str(&format!(
            " REFERENCES {}({})",
            qualified_table(&fk.table),
            quote_ident(&fk.column)
        ));
    }
    Ok(sql)
}

pub fn create_table_sql(table: &str, columns: &[ColumnDefinition]) -> Result<String, ConsoleError> {
    require_name("Table", table)?;
    if columns.is_empty() {
        return Err(ConsoleError::validation("A table needs at least one column"));
    }

    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.name.as_str()) {
            return Err(ConsoleError::validation(format!(
                "Duplicate column name '{}'",
                column.name
            )));
        }
    }
    if columns.iter().filter(|c| c.is_primary_key).count() > 1 {
        return Err(ConsoleError::validation("Only one primary key column is allowed"));
    }

    let body = columns
        .iter()
        .map(|c| column_sql(c).map(|sql| format!("  {}", sql)))
        .collect::<Result<Vec<_>, _>>()?
        .join(",\n");

    Ok(format!("CREATE TABLE {} (\n{}\n);", qualified_table(table), body))
}

pub fn add_column_sql(table: &str, column: &ColumnDefinition) -> Result<String, ConsoleError> {
    require_name("Table", table)?;
    Ok(format!(
        "ALTER TABLE {} ADD COLUMN {};",
        qualified_table(table),
        column_sql(column)?
    ))
}

pub fn drop_column_sql(table: &str, column: &str) -> Result<String, ConsoleError> {
    require_name("Table", table)?;
    require_name("Column", column)?;
    Ok(format!(
        "ALTER TABLE {} DROP COLUMN {};",
        qualified_table(table),
        quote_ident(column)
    ))
}

pub fn alter_column_sql(table: &str, change: &ColumnChange) -> Result<String, ConsoleError> {
    require_name("Table", table)?;
    require_name("Column", &change.column)?;

    let target = format!("ALTER COLUMN {}", quote_ident(&change.column));
    let mut actions = Vec::new();

    if let Some(data_type) = &change.data_type {
        actions.push(format!("{} TYPE {}", target, sql_type(data_type)?));
    }
    match change.nullable {
        Some(true) => actions.push(format!("{} DROP NOT NULL", target)),
        Some(false) => actions.push(format!("{} SET NOT NULL", target)),
        None => {}
    }
    match &change.default_value {
        Some(Some(expr)) if !expr.trim().is_empty() => {
            actions.push(format!("{} SET DEFAULT {}", target, expr))
        }
        Some(_) => actions.push(format!("{} DROP DEFAULT", target)),
        None => {}
    }

    if actions.is_empty() {
        return Err(ConsoleError::validation(format!(
            "No changes given for column '{}'",
            change.column
        )));
    }

    Ok(format!(
        "ALTER TABLE {} {};",
        qualified_table(table),
        actions.join(", ")
    ))
}
