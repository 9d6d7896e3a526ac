//! sqltools - Context-aware SQL autocompletion for database client plugins
//!
//! sqltools ranks completion candidates for the identifier being typed in a
//! SQL buffer. It knows nothing about connections or processes: the caller
//! supplies a snapshot of the catalog (tables, columns, functions) that its
//! connection layer fetched, and gets back an ordered list of suggestions
//! plus a flag telling it whether to suppress the editor's own completions.
//!
//! # Features
//!
//! - **Reference extraction**: tables, sub-selects, table functions and their
//!   aliases, found by a tolerant token-level scan
//! - **Prefix scoring**: fuzzy and exact matching on lower-cased,
//!   quote-stripped identifiers
//! - **Statement awareness**: objects used in the current statement rank
//!   first, `alias.` expands to the aliased table's columns
//! - **Join inference**: `a.x_id = b.id` candidates while typing an `ON` clause
//!
//! # Architecture
//!
//! - [`config`]: Completion settings and their layered resolution
//! - [`db`]: Catalog snapshot and CLI output parsing
//! - [`sql`]: Reference extractor, completion items and the engine
//! - [`cursor`]: Prefix and statement extraction around a cursor
//! - [`error`]: Error types and result aliases
//!
//! # Example
//!
//! ```
//! use sqltools::config::CompletionSettings;
//! use sqltools::db::Catalog;
//! use sqltools::sql::Completion;
//!
//! let catalog = Catalog::new(
//!     vec!["orders".into(), "customers".into()],
//!     vec!["orders.id".into(), "orders.customer_id".into(), "customers.id".into()],
//!     vec![],
//! );
//! let engine = Completion::new(&catalog, &CompletionSettings::default());
//!
//! let sql = "SELECT o. FROM orders o";
//! let completions = engine.get_auto_complete_list("o.", sql, "SELECT o.").unwrap();
//! assert_eq!(completions.items[0].insert_text, "id");
//! assert!(completions.inhibit);
//! ```

pub mod config;
pub mod cursor;
pub mod db;
pub mod error;
pub mod sql;

pub use error::{ConfigError, ParseError, Result, SqlToolsError};
