//! Command-line definitions and the commands behind them.

use crate::config::Config;
use crate::db::{self, DatabaseClient};
use crate::error::ConsoleError;
use crate::grid::{render_outcome, render_rows, render_schema, render_table};
use crate::measure::TextMetrics;
use crate::model::{Relationship, RowRange, table_names};
use crate::render::DiagramRenderer;
use crate::sql::ddl::{self, ColumnChange, ColumnDefinition};
use crate::sql::{DATA_TYPES, QueryResult, SqlConsole, columns_of, csv_file_name_now};
use crate::svg::SvgSurface;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// PostgreSQL connection string (defaults to DATABASE_URL)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List tables with their columns
    Tables,

    /// Show the columns of a table
    Schema { table: String },

    /// Show one page of rows from a table
    Rows {
        table: String,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        page_size: Option<u64>,
    },

    /// List foreign-key relationships and optionally draw the diagram
    Relationships {
        /// Write the relationship diagram as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
    },

    /// Run an ad-hoc SQL query (reads stdin when no query is given)
    Sql {
        query: Option<String>,
        /// Read the query from a file. A script of several statements shows the
        /// rows of the last statement that returned any, as text
        #[arg(short, long, conflicts_with = "query")]
        file: Option<PathBuf>,
        /// Save the results as CSV (default name: query-results-<timestamp>.csv)
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        csv: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List the data types offered for new columns
    Types,

    /// Create a table. Columns: name:type[:pk][:notnull][:ref=table.column][:default=EXPR]
    CreateTable {
        table: String,
        #[arg(short, long = "column", required = true)]
        columns: Vec<ColumnDefinition>,
        /// Print the statement instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Add a column to a table
    AddColumn {
        table: String,
        column: ColumnDefinition,
        #[arg(long)]
        dry_run: bool,
    },

    /// Drop a column from a table
    DropColumn {
        table: String,
        column: String,
        #[arg(long)]
        dry_run: bool,
    },

    /// Change the type, nullability or default of a column
    AlterColumn {
        table: String,
        column: String,
        #[arg(long = "type")]
        data_type: Option<String>,
        #[arg(long, conflicts_with = "not_null")]
        nullable: bool,
        #[arg(long)]
        not_null: bool,
        #[arg(long, conflicts_with = "drop_default")]
        default: Option<String>,
        #[arg(long)]
        drop_default: bool,
        #[arg(long)]
        dry_run: bool,
    },
}

/// Text to print, and whether the command should exit non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub text: String,
    pub failed: bool,
}

impl CommandOutput {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: false,
        }
    }
}

impl Command {
    pub fn needs_database(&self) -> bool {
        match self {
            Command::Types => false,
            Command::CreateTable { dry_run, .. }
            | Command::AddColumn { dry_run, .. }
            | Command::DropColumn { dry_run, .. }
            | Command::AlterColumn { dry_run, .. } => !dry_run,
            _ => true,
        }
    }

    pub fn run(
        self,
        config: &Config,
        client: Option<&dyn DatabaseClient>,
    ) -> Result<CommandOutput, ConsoleError> {
        let metrics = TextMetrics::default();
        let client = || client.ok_or_else(|| ConsoleError::Connection("no database configured".to_string()));

        match self {
            Command::Tables => Ok(CommandOutput::ok(list_tables(client()?))),
            Command::Schema { table } => {
                let schema = db::fetch_schema(client()?, &table)?;
                Ok(CommandOutput::ok(format!(
                    "{} ({} columns)\n\n{}",
                    schema.table_name,
                    schema.columns.len(),
                    render_schema(&metrics, &schema.columns)
                )))
            }
            Command::Rows {
                table,
                page,
                page_size,
            } => {
                let client = client()?;
                let schema = db::fetch_schema(client, &table)?;
                let page_size = page_size.unwrap_or(config.page_size).max(1);
                let rows = db::fetch_rows(client, &table, RowRange::page(page, page_size));

                let mut columns: Vec<String> =
                    schema.columns.iter().map(|c| c.column_name.clone()).collect();
                if columns.is_empty() {
                    columns = columns_of(&rows.rows);
                }
                Ok(CommandOutput::ok(format!(
                    "{} • {} columns • {} rows • page {} of {}\n\n{}",
                    table,
                    schema.columns.len(),
                    rows.total_count,
                    page.max(1),
                    rows.total_pages(page_size).max(1),
                    render_rows(&metrics, &columns, &rows.rows)
                )))
            }
            Command::Relationships { svg, width, height } => {
                let relationships = db::fetch_relationships(client()?);
                let mut text = list_relationships(&relationships);
                if let Some(path) = svg {
                    let mut surface = SvgSurface::new(
                        width.unwrap_or(config.canvas_width),
                        height.unwrap_or(config.canvas_height),
                    );
                    DiagramRenderer::default().draw(&mut surface, &relationships);
                    fs::write(&path, surface.to_svg())?;
                    text.push_str(&format!(
                        "\n\nDiagram of {} tables written to {}",
                        table_names(&relationships).len(),
                        path.display()
                    ));
                }
                Ok(CommandOutput::ok(text))
            }
            Command::Sql {
                query,
                file,
                csv,
                format,
            } => {
                let query = match (query, file) {
                    (Some(q), _) => q,
                    (None, Some(path)) => fs::read_to_string(path)?,
                    (None, None) => std::io::read_to_string(std::io::stdin())?,
                };
                run_sql(client()?, &query, csv.as_deref(), format, &metrics)
            }
            Command::Types => {
                let headers = vec!["label".to_string(), "value".to_string(), "description".to_string()];
                let cells: Vec<Vec<String>> = DATA_TYPES
                    .iter()
                    .map(|t| vec![t.label.to_string(), t.value.to_string(), t.description.to_string()])
                    .collect();
                Ok(CommandOutput::ok(render_table(&metrics, &headers, &cells)))
            }
            Command::CreateTable {
                table,
                columns,
                dry_run,
            } => {
                let sql = ddl::create_table_sql(&table, &columns)?;
                let done = format!("Table {} has been created successfully", table);
                apply_ddl(client, sql, dry_run, done)
            }
            Command::AddColumn {
                table,
                column,
                dry_run,
            } => {
                let sql = ddl::add_column_sql(&table, &column)?;
                let done = format!("Column {} has been added to {}", column.name, table);
                apply_ddl(client, sql, dry_run, done)
            }
            Command::DropColumn {
                table,
                column,
                dry_run,
            } => {
                let sql = ddl::drop_column_sql(&table, &column)?;
                let done = format!("Column {} has been deleted from {}", column, table);
                apply_ddl(client, sql, dry_run, done)
            }
            Command::AlterColumn {
                table,
                column,
                data_type,
                nullable,
                not_null,
                default,
                drop_default,
                dry_run,
            } => {
                let change = ColumnChange {
                    column: column.clone(),
                    data_type,
                    nullable: match (nullable, not_null) {
                        (true, _) => Some(true),
                        (_, true) => Some(false),
                        _ => None,
                    },
                    default_value: match (default, drop_default) {
                        (Some(expr), _) => Some(Some(expr)),
                        (None, true) => Some(None),
                        (None, false) => None,
                    },
                };
                let sql = ddl::alter_column_sql(&table, &change)?;
                let done = format!("Column {} has been updated", column);
                apply_ddl(client, sql, dry_run, done)
            }
        }
    }
}

fn list_tables(client: &dyn DatabaseClient) -> String {
    let tables = db::fetch_tables(client);
    if tables.is_empty() {
        return "No tables found".to_string();
    }

    let mut out = Vec::new();
    for table in &tables {
        out.push(format!("{} ({} columns)", table.table_name, table.columns.len()));
        for column in table.columns.iter().take(5) {
            out.push(format!("  {}  {}", column.column_name, column.data_type));
        }
        if table.columns.len() > 5 {
            out.push(format!("  + {} more columns", table.columns.len() - 5));
        }
    }
    out.join("\n")
}

fn list_relationships(relationships: &[Relationship]) -> String {
    if relationships.is_empty() {
        return "No relationships found".to_string();
    }
    relationships
        .iter()
        .map(|rel| {
            format!(
                "{}\n  Source:     {}.{}\n  References: {}.{}",
                rel.constraint_name, rel.table_name, rel.column_name, rel.foreign_table, rel.foreign_column
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn run_sql(
    client: &dyn DatabaseClient,
    query: &str,
    csv: Option<&Path>,
    format: OutputFormat,
    metrics: &TextMetrics,
) -> Result<CommandOutput, ConsoleError> {
    let mut console = SqlConsole::new(client);
    let outcome = console.execute(query)?;
    let failed = outcome.result.is_error();

    let mut text = match format {
        OutputFormat::Table => render_outcome(metrics, outcome),
        OutputFormat::Json => serde_json::to_string_pretty(&outcome.result)?,
    };

    if let Some(path) = csv {
        let exported = console.export_csv();
        match exported {
            Some(data) => {
                let path = if path.as_os_str().is_empty() {
                    PathBuf::from(csv_file_name_now())
                } else {
                    path.to_path_buf()
                };
                fs::write(&path, data)?;
                text.push_str(&format!("\n\nResults downloaded to {}", path.display()));
            }
            None if !failed => text.push_str("\n\nNo rows to export"),
            None => {}
        }
    }

    Ok(CommandOutput { text, failed })
}

fn apply_ddl<'a>(
    client: impl FnOnce() -> Result<&'a dyn DatabaseClient, ConsoleError>,
    sql: String,
    dry_run: bool,
    done: String,
) -> Result<CommandOutput, ConsoleError> {
    if dry_run {
        return Ok(CommandOutput::ok(sql));
    }

    let mut console = SqlConsole::new(client()?);
    let outcome = console.execute(&sql)?;
    match &outcome.result {
        QueryResult::Error { message } => Err(ConsoleError::Executor(message.clone())),
        QueryResult::Rows { .. } => Ok(CommandOutput::ok(done)),
    }
}
