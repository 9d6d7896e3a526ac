//! SQL autocomplete
//!
//! Ranks catalog objects, statement aliases, keywords and inferred join
//! conditions for the identifier fragment left of the cursor.
//!
//! The prefix is handled in one of three ways depending on how many
//! separators it holds:
//!
//! - `ident|`: everything whose name contains `ident`, with objects used by
//!   the current statement listed first.
//! - `parent.ident|`: if `parent` is a table alias, columns of the aliased
//!   table; plus a prefix search over the whole catalog. Editor completions
//!   are suppressed when anything matched, unless `parent` aliases a
//!   sub-select whose columns we cannot know.
//! - `db.table.col|`: columns only.
//!
//! Identifier case and quoting rules differ per database, so all matching is
//! done on lower-cased, quote-stripped text.

use crate::config::{CompletionMode, CompletionSettings, KeywordCase};
use crate::db::Catalog;
use crate::sql::item::{
    CompletionItem, ItemKind, SEPARATOR, Suggestion, starts_with_quote, strip_quotes,
};
use crate::sql::join::{detect_join_alias, join_condition_candidates};
use crate::sql::references::{Reference, extract_references};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

const KEYWORDS: &[&str] = &[
    "SELECT",
    "UPDATE",
    "DELETE",
    "INSERT",
    "INTO",
    "FROM",
    "WHERE",
    "GROUP BY",
    "ORDER BY",
    "HAVING",
    "JOIN",
    "INNER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "USING",
    "LIMIT",
    "DISTINCT",
    "SET",
];

/// Result of one completion request. Never empty: "nothing to offer" is
/// `None` from [`Completion::get_auto_complete_list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completions {
    pub items: Vec<Suggestion>,
    /// Suppress the editor's own word completions
    pub inhibit: bool,
}

/// Completion engine for one catalog snapshot
#[derive(Debug, Clone)]
pub struct Completion {
    tables: Vec<CompletionItem>,
    columns: Vec<CompletionItem>,
    functions: Vec<CompletionItem>,
    keywords: Vec<CompletionItem>,
    mode: CompletionMode,
    active_selectors: Vec<String>,
    ignore_selectors: Vec<String>,
}

fn catalog_items(kind: ItemKind, idents: &[String]) -> Vec<CompletionItem> {
    idents
        .iter()
        .filter_map(|ident| {
            let item = CompletionItem::new(kind, ident.as_str());
            if item.is_none() {
                debug!(?kind, "skipping blank catalog entry");
            }
            item
        })
        .collect()
}

fn keyword_items(case: KeywordCase) -> Vec<CompletionItem> {
    KEYWORDS
        .iter()
        .filter_map(|kw| CompletionItem::new(ItemKind::Keyword, case.apply(kw)))
        .collect()
}

/// Drop repeated (kind, ident) pairs, keeping the first occurrence.
fn dedup(items: Vec<CompletionItem>) -> Vec<CompletionItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// `text` without a case-insensitive `prefix`, if it starts with one
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    (head.to_lowercase() == prefix).then(|| &text[prefix.len()..])
}

fn matching<'a>(
    items: &'a [CompletionItem],
    search: &'a str,
) -> impl Iterator<Item = &'a CompletionItem> + 'a {
    items
        .iter()
        .filter(move |item| item.prefix_match_score(search, false) > 0)
}

impl Completion {
    pub fn new(catalog: &Catalog, settings: &CompletionSettings) -> Self {
        Self {
            tables: catalog_items(ItemKind::Table, &catalog.tables),
            columns: catalog_items(ItemKind::Column, &catalog.columns),
            functions: catalog_items(ItemKind::Function, &catalog.functions),
            keywords: keyword_items(settings.format.keyword_case),
            mode: settings.autocompletion,
            active_selectors: settings.autocomplete_selectors_active.clone(),
            ignore_selectors: settings.autocomplete_selectors_ignore.clone(),
        }
    }

    pub fn mode(&self) -> CompletionMode {
        self.mode
    }

    pub fn is_disabled(&self) -> bool {
        self.mode == CompletionMode::Disabled
    }

    /// Editor scopes where completion may trigger
    pub fn active_selectors(&self) -> &[String] {
        &self.active_selectors
    }

    /// Editor scopes where completion must not trigger
    pub fn ignore_selectors(&self) -> &[String] {
        &self.ignore_selectors
    }

    /// Completions for `prefix` typed inside statement `sql`, where
    /// `sql_to_cursor` is `sql` up to the cursor.
    ///
    /// Returns `None` when disabled or when nothing matched.
    pub fn get_auto_complete_list(
        &self,
        prefix: &str,
        sql: &str,
        sql_to_cursor: &str,
    ) -> Option<Completions> {
        let (items, inhibit) = match self.mode {
            CompletionMode::Disabled => return None,
            CompletionMode::Basic => (self.basic_completions(prefix), false),
            CompletionMode::Smart => self.smart_completions(prefix, sql, sql_to_cursor),
        };

        let items = dedup(items);
        debug!(count = items.len(), inhibit, "completion request finished");
        if items.is_empty() {
            return None;
        }

        // keep quotes unless the user already typed an opening one
        let strip = starts_with_quote(prefix.rsplit(SEPARATOR).next().unwrap_or_default());
        Some(Completions {
            items: items.iter().map(|item| item.format(strip)).collect(),
            inhibit,
        })
    }

    /// Columns, tables and functions matching `prefix`, no statement awareness
    fn basic_completions(&self, prefix: &str) -> Vec<CompletionItem> {
        let prefix = prefix.to_lowercase();
        matching(&self.columns, &prefix)
            .chain(matching(&self.tables, &prefix))
            .chain(matching(&self.functions, &prefix))
            .cloned()
            .collect()
    }

    fn smart_completions(
        &self,
        prefix: &str,
        sql: &str,
        sql_to_cursor: &str,
    ) -> (Vec<CompletionItem>, bool) {
        let prefix = prefix.to_lowercase();
        let separators = prefix.matches(SEPARATOR).count();

        if separators >= 2 {
            debug!(%prefix, "multi-separator completion");
            return self.multi_dot_completions(&prefix);
        }

        let references = match extract_references(sql) {
            Ok(references) => references,
            Err(e) => {
                debug!(error = %e, "could not extract references, using catalog only");
                Vec::new()
            }
        };

        // set only while editing a join condition:
        // SELECT a.* FROM tbl_a a INNER JOIN tbl_b b ON |
        let join_alias = detect_join_alias(sql_to_cursor);
        if let Some(alias) = &join_alias {
            debug!(%alias, "editing join condition");
        }

        if separators == 0 {
            debug!(%prefix, references = references.len(), "no-separator completion");
            (
                self.no_dot_completions(&prefix, &references, join_alias.as_deref()),
                false,
            )
        } else {
            debug!(%prefix, references = references.len(), "single-separator completion");
            self.single_dot_completions(&prefix, &references, join_alias.as_deref())
        }
    }

    /// Order: join conditions, statement aliases, statement columns, tables
    /// and functions, keywords, then all other columns, tables and functions.
    fn no_dot_completions(
        &self,
        prefix: &str,
        references: &[Reference],
        join_alias: Option<&str>,
    ) -> Vec<CompletionItem> {
        let mut aliases: Vec<CompletionItem> = Vec::new();
        let mut statement_tables: Vec<String> = Vec::new();
        let mut statement_table_names: Vec<String> = Vec::new();
        let mut statement_functions: Vec<String> = Vec::new();

        for reference in references {
            if let Some(alias) = reference
                .alias
                .as_deref()
                .and_then(|alias| CompletionItem::new(ItemKind::Alias, alias))
            {
                if alias.prefix_match_score(prefix, false) > 0
                    && alias.ident() != prefix
                    && !aliases.contains(&alias)
                {
                    aliases.push(alias);
                }
            }

            let Some(full_name) = reference.full_name() else {
                continue;
            };
            if reference.is_function {
                statement_functions.push(full_name);
            } else {
                statement_tables.push(full_name);
                if let Some(name) = &reference.name {
                    statement_table_names.push(name.to_lowercase());
                }
            }
        }

        let (sql_columns, other_columns): (Vec<_>, Vec<_>) =
            matching(&self.columns, prefix).partition(|column| {
                column
                    .parent()
                    .and_then(|parent| parent.rsplit(SEPARATOR).next())
                    .map(|table| strip_quotes(table).to_lowercase())
                    .is_some_and(|table| statement_table_names.contains(&table))
            });
        let (sql_tables, other_tables): (Vec<_>, Vec<_>) = matching(&self.tables, prefix)
            .partition(|table| table.prefix_match_list_score(&statement_tables, true) > 0);
        let (sql_functions, other_functions): (Vec<_>, Vec<_>) =
            matching(&self.functions, prefix)
                .partition(|func| func.prefix_match_list_score(&statement_functions, true) > 0);
        let keywords = matching(&self.keywords, prefix);

        let conditions: Vec<CompletionItem> = match join_alias {
            Some(join_alias) => join_condition_candidates(references, join_alias, &self.columns)
                .into_iter()
                .filter(|condition| condition.ident().to_lowercase().starts_with(prefix))
                .collect(),
            None => Vec::new(),
        };

        let mut result = conditions;
        result.extend(aliases);
        result.extend(sql_columns.into_iter().cloned());
        result.extend(sql_tables.into_iter().cloned());
        result.extend(sql_functions.into_iter().cloned());
        result.extend(keywords.cloned());
        result.extend(other_columns.into_iter().cloned());
        result.extend(other_tables.into_iter().cloned());
        result.extend(other_functions.into_iter().cloned());
        result
    }

    fn single_dot_completions(
        &self,
        prefix: &str,
        references: &[Reference],
        join_alias: Option<&str>,
    ) -> (Vec<CompletionItem>, bool) {
        let Some((parent, object)) = prefix.split_once(SEPARATOR) else {
            return (Vec::new(), false);
        };
        let parent = strip_quotes(parent);

        let mut query_alias = false;
        let mut aliased_tables: Vec<&str> = Vec::new();
        for reference in references {
            let Some(alias) = &reference.alias else {
                continue;
            };
            if alias.to_lowercase() != parent {
                continue;
            }
            if reference.is_query_alias() {
                query_alias = true;
            }
            if reference.is_table_alias() {
                if let Some(name) = reference.name.as_deref() {
                    if !aliased_tables.contains(&name) {
                        aliased_tables.push(name);
                    }
                }
            }
        }

        let mut result = Vec::new();

        if let Some(join_alias) = join_alias {
            let alias_prefix = format!("{}{}", parent, SEPARATOR);
            for condition in join_condition_candidates(references, join_alias, &self.columns) {
                let Some(rest) = strip_prefix_ignore_case(condition.ident(), &alias_prefix) else {
                    continue;
                };
                if rest.to_lowercase().starts_with(object) {
                    result.extend(CompletionItem::new(ItemKind::Condition, rest));
                }
            }
        }

        // select x.co| from tab x  -->  tab.co
        for table in aliased_tables {
            let expanded = format!("{}{}{}", table, SEPARATOR, object);
            result.extend(matching(&self.columns, &expanded).cloned());
        }

        result.extend(matching(&self.columns, prefix).cloned());
        result.extend(matching(&self.tables, prefix).cloned());
        result.extend(matching(&self.functions, prefix).cloned());

        // columns of a sub-select are unknown, let the editor contribute
        let inhibit = !result.is_empty() && !query_alias;
        (result, inhibit)
    }

    fn multi_dot_completions(&self, prefix: &str) -> (Vec<CompletionItem>, bool) {
        let result: Vec<CompletionItem> = matching(&self.columns, prefix).cloned().collect();
        let inhibit = !result.is_empty();
        (result, inhibit)
    }
}
