//! Error types for sqltools
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors with clear error chains.
//!
//! Note that the completion engine itself never surfaces an error to its
//! caller: a [`ParseError`] from the reference extractor is logged and the
//! request continues with catalog-only matches.

use std::io;

/// Main error type for sqltools
#[derive(Debug, thiserror::Error)]
pub enum SqlToolsError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// SQL could not be scanned for references
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed catalog snapshot
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reference extraction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The tokenizer rejected the text (unterminated quote, stray delimiter, ...)
    #[error("Failed to tokenize SQL: {0}")]
    Tokenize(String),
}

/// Configuration loading/parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Home directory not found
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// Config file could not be read
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Specialized Result type for sqltools operations
pub type Result<T> = std::result::Result<T, SqlToolsError>;

/// Specialized Result type for reference extraction
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Specialized Result type for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
