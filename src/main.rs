//! sqltools - SQL autocompletion from the command line
//!
//! Runs the completion engine over a SQL file and a catalog snapshot, the
//! same way an editor plugin would on every keystroke. Useful for checking
//! a catalog export or debugging a ranking.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sqltools::config::load_settings;
use sqltools::cursor::{prefix_before_cursor, statement_at_cursor};
use sqltools::db::Catalog;
use sqltools::sql::{Completion, Reference, extract_references};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqltools", version, about = "Context-aware SQL autocompletion")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Complete the identifier at a cursor position
    Complete {
        /// Catalog snapshot (.json or .toml)
        #[arg(long)]
        catalog: PathBuf,

        /// SQL buffer, `-` for stdin
        #[arg(long, default_value = "-")]
        sql: String,

        /// Cursor byte offset into the buffer (default: end)
        #[arg(long)]
        cursor: Option<usize>,

        /// Project settings file, layered over ~/.sqltools/settings.toml
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Print a JSON object instead of tab-separated lines
        #[arg(long)]
        json: bool,
    },

    /// List the tables and aliases a SQL buffer references
    References {
        /// SQL buffer, `-` for stdin
        #[arg(long, default_value = "-")]
        sql: String,
    },
}

#[derive(Serialize)]
struct ReferenceOutput<'a> {
    schema: Option<&'a str>,
    name: Option<&'a str>,
    alias: Option<&'a str>,
    is_function: bool,
}

impl<'a> From<&'a Reference> for ReferenceOutput<'a> {
    fn from(r: &'a Reference) -> Self {
        Self {
            schema: r.schema.as_deref(),
            name: r.name.as_deref(),
            alias: r.alias.as_deref(),
            is_function: r.is_function,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(cli.verbose);

    match cli.command {
        Commands::Complete {
            catalog,
            sql,
            cursor,
            settings,
            json,
        } => complete(&catalog, &sql, cursor, settings.as_deref(), json),
        Commands::References { sql } => references(&sql),
    }
}

/// Log to stderr; stdout is reserved for completion output
fn initialize_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_sql(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read SQL from stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let catalog = Catalog::load(path)
        .with_context(|| format!("Failed to load catalog {}", path.display()))?;
    debug!(
        tables = catalog.tables.len(),
        columns = catalog.columns.len(),
        functions = catalog.functions.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

fn complete(
    catalog: &Path,
    sql: &str,
    cursor: Option<usize>,
    settings: Option<&Path>,
    json: bool,
) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    let settings = load_settings(settings)?;
    let buffer = read_sql(sql)?;

    let offset = cursor.unwrap_or(buffer.len());
    if offset > buffer.len() {
        bail!(
            "Cursor offset {} is past the end of the input ({} bytes)",
            offset,
            buffer.len()
        );
    }

    let prefix = prefix_before_cursor(&buffer, offset);
    let (statement, to_cursor) = statement_at_cursor(&buffer, offset);
    debug!(%prefix, "completing");

    let engine = Completion::new(&catalog, &settings);
    let completions = engine.get_auto_complete_list(prefix, statement, to_cursor);

    if json {
        let value = match &completions {
            Some(c) => serde_json::to_value(c)?,
            None => serde_json::json!({ "items": [], "inhibit": false }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if let Some(completions) = completions {
        debug!(inhibit = completions.inhibit, "done");
        for item in &completions.items {
            println!("{}\t{}", item.label, item.insert_text);
        }
    }
    Ok(())
}

fn references(sql: &str) -> Result<()> {
    let buffer = read_sql(sql)?;
    let references = extract_references(&buffer)?;
    let output: Vec<ReferenceOutput<'_>> = references.iter().map(ReferenceOutput::from).collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
