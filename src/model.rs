use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// One result row: column name -> value, in the order the database returned them.
pub type Row = Map<String, Value>;

/// A foreign-key relationship between two tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub table_name: String,
    pub column_name: String,
    pub foreign_table: String,
    pub foreign_column: String,
    pub constraint_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub column_name: String,
    pub data_type: String,
    #[serde(default)]
    pub is_nullable: bool,
    #[serde(default)]
    pub column_default: Option<String>,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
    #[serde(default)]
    pub foreign_key_table: Option<String>,
    #[serde(default)]
    pub foreign_key_column: Option<String>,
}

impl ColumnSchema {
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            column_name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable: true,
            column_default: None,
            is_primary_key: false,
            is_foreign_key: false,
            foreign_key_table: None,
            foreign_key_column: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table_schema: String,
    pub table_name: String,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn public(table_name: &str, columns: Vec<ColumnSchema>) -> Self {
        Self {
            table_schema: "public".to_string(),
            table_name: table_name.to_string(),
            columns,
        }
    }
}

/// A window of rows requested from a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub offset: u64,
    pub limit: u64,
}

impl RowRange {
    /// Range for a 1-based page number. Page 0 is treated as page 1.
    pub fn page(page: u64, page_size: u64) -> Self {
        let page = page.max(1);
        Self {
            offset: (page - 1) * page_size,
            limit: page_size,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowPage {
    pub rows: Vec<Row>,
    pub total_count: u64,
}

impl RowPage {
    pub fn total_pages(&self, page_size: u64) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(page_size)
    }
}

/// Unique table names involved in the relationships.
///
/// Order is first-seen: all source tables in list order, then all targets.
pub fn table_names(relationships: &[Relationship]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let sources = relationships.iter().map(|r| r.table_name.as_str());
    let targets = relationships.iter().map(|r| r.foreign_table.as_str());

    sources
        .chain(targets)
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(from: &str, to: &str) -> Relationship {
        Relationship {
            table_name: from.to_string(),
            column_name: format!("{}_id", to),
            foreign_table: to.to_string(),
            foreign_column: "id".to_string(),
            constraint_name: format!("{}_{}_id_fkey", from, to),
        }
    }

    #[test]
    fn test_table_names_sources_then_targets() {
        let rels = vec![rel("orders", "users"), rel("order_items", "orders"), rel("order_items", "products")];
        assert_eq!(
            table_names(&rels),
            vec!["orders", "order_items", "users", "products"]
        );
    }

    #[test]
    fn test_table_names_empty() {
        assert!(table_names(&[]).is_empty());
    }

    #[test]
    fn test_table_names_self_reference() {
        let rels = vec![rel("employees", "employees")];
        assert_eq!(table_names(&rels), vec!["employees"]);
    }

    #[test]
    fn test_row_range_page() {
        assert_eq!(RowRange::page(1, 50), RowRange { offset: 0, limit: 50 });
        assert_eq!(RowRange::page(3, 50), RowRange { offset: 100, limit: 50 });
        assert_eq!(RowRange::page(0, 10), RowRange { offset: 0, limit: 10 });
    }

    #[test]
    fn test_total_pages() {
        let page = RowPage {
            rows: vec![],
            total_count: 101,
        };
        assert_eq!(page.total_pages(50), 3);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(RowPage::default().total_pages(50), 0);
    }

    #[test]
    fn test_relationship_deserialize() {
        let json = r#"{
            "table_name": "orders",
            "column_name": "user_id",
            "foreign_table": "users",
            "foreign_column": "id",
            "constraint_name": "orders_user_id_fkey"
        }"#;
        let rel: Relationship = serde_json::from_str(json).unwrap();
        assert_eq!(rel.foreign_table, "users");
    }

    #[test]
    fn test_column_schema_defaults() {
        let col: ColumnSchema =
            serde_json::from_str(r#"{"column_name": "id", "data_type": "uuid"}"#).unwrap();
        assert!(!col.is_primary_key);
        assert_eq!(col.foreign_key_table, None);
    }
}
