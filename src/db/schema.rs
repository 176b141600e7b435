//! Database schema types.
//!
//! Represents the structure of a database (tables, columns, keys) together
//! with a few sample rows per table, and renders it as the schema text that
//! grounds both prompts.

use super::types::Value;
use serde::{Deserialize, Serialize};

/// Number of sample rows fetched per table for the schema text.
pub const SAMPLE_ROWS_PER_TABLE: usize = 3;

/// Represents the complete schema of a database.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Schema {
    /// All tables in the schema.
    pub tables: Vec<Table>,

    /// Foreign key relationships between tables.
    pub foreign_keys: Vec<ForeignKey>,
}

impl Schema {
    /// Creates a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Formats the schema for inclusion in an LLM prompt.
    pub fn format_for_llm(&self) -> String {
        let tables_text = self
            .tables
            .iter()
            .map(|table| self.format_table_for_llm(table))
            .collect::<Vec<_>>()
            .join("\n");

        let foreign_keys_text = if self.foreign_keys.is_empty() {
            String::new()
        } else {
            let fk_lines = self
                .foreign_keys
                .iter()
                .map(|fk| {
                    format!(
                        "  - {}.{} -> {}.{}\n",
                        fk.from_table,
                        fk.from_columns.join(", "),
                        fk.to_table,
                        fk.to_columns.join(", ")
                    )
                })
                .collect::<String>();
            format!("\nForeign Keys:\n{fk_lines}")
        };

        format!("Database Schema:\n\n{tables_text}{foreign_keys_text}")
    }

    fn format_table_for_llm(&self, table: &Table) -> String {
        let column_lines = table
            .columns
            .iter()
            .map(|column| self.format_column_for_llm(table, column))
            .collect::<String>();

        let samples = if table.sample_rows.is_empty() {
            String::new()
        } else {
            Self::format_sample_rows(table)
        };

        format!("Table: {}\n{column_lines}{samples}", table.name)
    }

    fn format_column_for_llm(&self, table: &Table, column: &Column) -> String {
        let mut annotations = Vec::new();
        if table.primary_key.contains(&column.name) {
            annotations.push("PK".to_string());
        }
        if !column.is_nullable {
            annotations.push("NOT NULL".to_string());
        }
        for fk in self
            .foreign_keys
            .iter()
            .filter(|fk| fk.from_table == table.name)
        {
            if let Some(pos) = fk.from_columns.iter().position(|c| c == &column.name) {
                let target = fk.to_columns.get(pos).map(String::as_str).unwrap_or("");
                annotations.push(format!("FK -> {}.{}", fk.to_table, target));
            }
        }
        if let Some(default) = &column.default {
            annotations.push(format!("DEFAULT {default}"));
        }

        if annotations.is_empty() {
            format!("  - {}: {}\n", column.name, column.data_type)
        } else {
            format!(
                "  - {}: {} ({})\n",
                column.name,
                column.data_type,
                annotations.join(", ")
            )
        }
    }

    fn format_sample_rows(table: &Table) -> String {
        let header = table
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join("\t");

        let rows = table
            .sample_rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(Value::to_display_string)
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "/*\n{} rows from {} table:\n{header}\n{rows}\n*/\n",
            table.sample_rows.len(),
            table.name
        )
    }
}

/// Represents a database table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    /// Table name.
    pub name: String,

    /// Columns in the table.
    pub columns: Vec<Column>,

    /// Column names that form the primary key.
    pub primary_key: Vec<String>,

    /// A few rows of data, in column order.
    #[serde(default)]
    pub sample_rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates a new table with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a column.
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets the primary key columns.
    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Sets the sample rows.
    pub fn with_samples(mut self, rows: Vec<Vec<Value>>) -> Self {
        self.sample_rows = rows;
        self
    }
}

/// Represents a column in a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Column type as reported by MySQL (e.g., "int", "varchar(120)").
    pub data_type: String,

    /// Whether the column allows NULL values.
    pub is_nullable: bool,

    /// Default value expression, if any.
    pub default: Option<String>,
}

impl Column {
    /// Creates a new nullable column with the given name and data type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_nullable: true,
            default: None,
        }
    }

    /// Sets whether the column is nullable.
    pub fn nullable(self, nullable: bool) -> Self {
        Self {
            is_nullable: nullable,
            ..self
        }
    }

    /// Sets the default value.
    pub fn with_default(self, default: impl Into<String>) -> Self {
        Self {
            default: Some(default.into()),
            ..self
        }
    }
}

/// Represents a foreign key relationship between tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ForeignKey {
    /// Source table name.
    pub from_table: String,

    /// Source column names.
    pub from_columns: Vec<String>,

    /// Target table name.
    pub to_table: String,

    /// Target column names.
    pub to_columns: Vec<String>,
}

impl ForeignKey {
    /// Creates a new foreign key relationship.
    pub fn new(
        from_table: impl Into<String>,
        from_columns: Vec<String>,
        to_table: impl Into<String>,
        to_columns: Vec<String>,
    ) -> Self {
        Self {
            from_table: from_table.into(),
            from_columns,
            to_table: to_table.into(),
            to_columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chinook_schema() -> Schema {
        Schema {
            tables: vec![
                Table::new("Album")
                    .column(Column::new("AlbumId", "int").nullable(false))
                    .column(Column::new("Title", "varchar(160)").nullable(false))
                    .column(Column::new("ArtistId", "int").nullable(false))
                    .primary_key(&["AlbumId"]),
                Table::new("Artist")
                    .column(Column::new("ArtistId", "int").nullable(false))
                    .column(Column::new("Name", "varchar(120)"))
                    .primary_key(&["ArtistId"])
                    .with_samples(vec![
                        vec![Value::Int(1), Value::from("AC/DC")],
                        vec![Value::Int(2), Value::from("Accept")],
                    ]),
            ],
            foreign_keys: vec![ForeignKey::new(
                "Album",
                vec!["ArtistId".to_string()],
                "Artist",
                vec!["ArtistId".to_string()],
            )],
        }
    }

    #[test]
    fn test_schema_format_for_llm() {
        let formatted = chinook_schema().format_for_llm();

        assert!(formatted.starts_with("Database Schema:"));
        assert!(formatted.contains("Table: Album"));
        assert!(formatted.contains("  - AlbumId: int (PK, NOT NULL)\n"));
        assert!(formatted.contains("  - ArtistId: int (NOT NULL, FK -> Artist.ArtistId)\n"));
        assert!(formatted.contains("  - Name: varchar(120)\n"));
        assert!(formatted.contains("Foreign Keys:\n  - Album.ArtistId -> Artist.ArtistId"));
    }

    #[test]
    fn test_sample_rows_block() {
        let formatted = chinook_schema().format_for_llm();

        assert!(formatted.contains(
            "/*\n2 rows from Artist table:\nArtistId\tName\n1\tAC/DC\n2\tAccept\n*/\n"
        ));
        // No block for tables without samples.
        assert!(!formatted.contains("rows from Album table"));
    }

    #[test]
    fn test_column_default_annotation() {
        let schema = Schema {
            tables: vec![Table::new("Invoice")
                .column(Column::new("Total", "decimal(10,2)").with_default("0.00"))],
            foreign_keys: vec![],
        };

        assert_eq!(
            schema.format_for_llm(),
            "Database Schema:\n\nTable: Invoice\n  - Total: decimal(10,2) (DEFAULT 0.00)\n"
        );
    }

    #[test]
    fn test_column_builder() {
        let col = Column::new("Email", "varchar(60)")
            .nullable(false)
            .with_default("''");

        assert_eq!(col.name, "Email");
        assert!(!col.is_nullable);
        assert_eq!(col.default, Some("''".to_string()));
    }

    #[test]
    fn test_empty_schema() {
        let formatted = Schema::new().format_for_llm();

        assert!(formatted.contains("Database Schema:"));
        assert!(!formatted.contains("Foreign Keys:"));
    }
}
