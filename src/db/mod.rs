//! Database object catalog
//!
//! The catalog is produced by a connection layer that runs the database CLI
//! and is handed to the completion engine as a read-only snapshot.

pub mod catalog;

pub use catalog::{Catalog, parse_list_output};
