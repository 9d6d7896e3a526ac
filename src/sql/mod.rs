//! SQL utilities
//!
//! Reference extraction, completion candidates and the completion engine.

pub mod completer;
pub mod item;
pub mod join;
pub mod references;

pub use completer::{Completion, Completions};
pub use item::{CompletionItem, ItemKind, Suggestion};
pub use references::{Reference, extract_references};
