//! Catalog snapshot
//!
//! Flat lists of the objects known for the active connection, in the shape
//! the database CLIs report them:
//!
//! - tables: `table` or `schema.table`
//! - columns: `table.column`
//! - functions: `schema.name(arg types)` or `name(arg types)`

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read-only snapshot of known database objects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Fully-qualified table names
    #[serde(default)]
    pub tables: Vec<String>,
    /// `table.column` pairs
    #[serde(default)]
    pub columns: Vec<String>,
    /// Function signatures
    #[serde(default)]
    pub functions: Vec<String>,
}

impl Catalog {
    pub fn new(tables: Vec<String>, columns: Vec<String>, functions: Vec<String>) -> Self {
        Self {
            tables,
            columns,
            functions,
        }
    }

    /// Create an empty catalog
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.columns.is_empty() && self.functions.is_empty()
    }

    /// Load a snapshot from JSON (`{"tables": [...], "columns": [...], "functions": [...]}`)
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a snapshot from TOML with the same keys as the JSON form
    pub fn from_toml(content: &str) -> Result<Self> {
        let catalog = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(catalog)
    }

    /// Read a snapshot file; `.toml` files are TOML, anything else JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content),
            _ => Self::from_json(&content),
        }
    }
}

/// Parse the pipe-delimited listing a database CLI prints for a
/// one-column query, e.g.
///
/// ```text
/// | public.orders    |
/// | public.customers |
/// ```
///
/// The value is the text between the first and second `|`. Lines without
/// a `|` (headers in some formats, row counts, blank lines) are skipped.
pub fn parse_list_output(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let mut cells = line.split('|');
            cells.next()?;
            cells.next().map(|cell| cell.trim().to_string())
        })
        .collect()
}
