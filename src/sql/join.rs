//! Join condition inference
//!
//! While the user is typing the `ON` clause of a join, guess conditions from
//! `...id` columns whose names look like a foreign key to another table in
//! the statement, e.g. `c.id = o.customer_id` for
//! `FROM orders o JOIN customers c ON |`.

use crate::sql::item::{CompletionItem, ItemKind, strip_quotes};
use crate::sql::references::Reference;
use inflector::Inflector;
use regex::Regex;
use std::sync::LazyLock;

/// `... JOIN <table> [AS] <alias> ON [<qualifier>.]` at the end of the text
static JOIN_CONDITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+?JOIN\s+?[\w\.`"]+\s+?(?:AS\s+)?(\w+)\s+?ON\s+?(?:[\w\.]+)?$"#)
        .expect("join condition pattern is valid")
});

/// Alias of the joined table when the cursor sits in its `ON` clause.
pub fn detect_join_alias(sql_to_cursor: &str) -> Option<String> {
    JOIN_CONDITION
        .captures(sql_to_cursor)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// A catalog column bound to the alias it is reachable through
struct AliasedColumn<'a> {
    alias: &'a str,
    column: &'a CompletionItem,
    name: String,
}

impl<'a> AliasedColumn<'a> {
    fn new(alias: &'a str, column: &'a CompletionItem) -> Self {
        Self {
            alias,
            column,
            name: strip_quotes(column.name()).to_lowercase(),
        }
    }

    /// Names another column may end with to reference this one.
    ///
    /// For `orders.id`: `ordersid`, `orders_id`, `orderid`, `order_id`.
    /// For `orders.customer_id`: `customer_id` plus the same table-prefixed forms.
    fn key_patterns(&self) -> Vec<String> {
        let table = self
            .column
            .parent()
            .and_then(|parent| parent.rsplit('.').next())
            .map(|table| strip_quotes(table).to_lowercase())
            .unwrap_or_default();

        let mut tables = vec![table.clone()];
        let singular = table.to_singular();
        if !singular.is_empty() && singular != table {
            tables.push(singular);
        }

        let mut patterns = Vec::new();
        if self.name != "id" {
            patterns.push(self.name.clone());
        }
        for table in &tables {
            patterns.push(format!("{}{}", table, self.name));
            patterns.push(format!("{}_{}", table, self.name));
        }
        patterns
    }

    fn references(&self, other: &AliasedColumn<'_>) -> bool {
        self.key_patterns()
            .iter()
            .any(|pattern| other.name.ends_with(pattern.as_str()))
    }

    fn qualified(&self) -> String {
        format!("{}.{}", self.alias, self.column.name())
    }
}

/// Candidate `ON` conditions between `join_alias` and every other aliased
/// table in `references`. Each match yields both `a = b` and `b = a`.
pub fn join_condition_candidates(
    references: &[Reference],
    join_alias: &str,
    columns: &[CompletionItem],
) -> Vec<CompletionItem> {
    let mut join_side: Vec<AliasedColumn<'_>> = Vec::new();
    let mut other_side: Vec<AliasedColumn<'_>> = Vec::new();

    for reference in references.iter().filter(|r| !r.is_function) {
        let (Some(alias), Some(name)) = (reference.alias.as_deref(), reference.name.as_deref())
        else {
            continue;
        };
        let table_prefix = format!("{}.", name);
        let side = if alias.eq_ignore_ascii_case(join_alias) {
            &mut join_side
        } else {
            &mut other_side
        };

        for column in columns {
            if column.prefix_match_score(&table_prefix, true) == 0 {
                continue;
            }
            let candidate = AliasedColumn::new(alias, column);
            if !candidate.name.ends_with("id") {
                continue;
            }
            let seen = side
                .iter()
                .any(|c| c.alias == candidate.alias && c.column == candidate.column);
            if !seen {
                side.push(candidate);
            }
        }
    }

    let mut conditions = Vec::new();
    for joined in &join_side {
        for other in &other_side {
            if !(joined.references(other) || other.references(joined)) {
                continue;
            }
            let side_a = joined.qualified();
            let side_b = other.qualified();
            conditions.extend(CompletionItem::new(
                ItemKind::Condition,
                format!("{} = {}", side_a, side_b),
            ));
            conditions.extend(CompletionItem::new(
                ItemKind::Condition,
                format!("{} = {}", side_b, side_a),
            ));
        }
    }
    conditions
}
