//! Table reference extraction
//!
//! A lightweight structural scan over the token stream of one or more SQL
//! statements. It does not validate SQL; it only needs to find the tables,
//! sub-selects and table functions a statement reads from or writes to,
//! together with the aliases bound to them.
//!
//! The scan works on a tree of tokens where every parenthesized group is a
//! node of its own. Walking a level, a flag records whether a table name is
//! expected next: it is raised by `FROM`, `INTO`, `UPDATE`, `TABLE`, `COPY`
//! and any `...JOIN`, and lowered by any other keyword.

use crate::error::{ParseError, ParseResult};
use sqlparser::dialect::GenericDialect;
use sqlparser::tokenizer::{Token, Tokenizer, Word};
use tracing::trace;

/// One table, sub-select or table function referenced by a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    /// Qualifier of the name, e.g. `public` in `public.orders`
    pub schema: Option<String>,
    /// Object name; `None` for an anonymous sub-select
    pub name: Option<String>,
    pub alias: Option<String>,
    pub is_function: bool,
}

impl Reference {
    pub fn has_alias(&self) -> bool {
        self.alias.is_some()
    }

    /// An aliased sub-select: `(SELECT ...) AS x`
    pub fn is_query_alias(&self) -> bool {
        self.name.is_none() && self.alias.is_some()
    }

    /// A named table with an alias: `orders o`
    pub fn is_table_alias(&self) -> bool {
        self.name.is_some() && self.alias.is_some() && !self.is_function
    }

    /// `schema.name`, or just `name` when unqualified
    pub fn full_name(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        Some(match &self.schema {
            Some(schema) => format!("{}.{}", schema, name),
            None => name.to_string(),
        })
    }
}

/// Keywords that start a table reference list
const TABLE_PREFIXES: &[&str] = &["FROM", "INTO", "UPDATE", "TABLE", "COPY"];

/// Keywords that may sit between a table prefix and the table name
/// without ending the list (`LEFT OUTER JOIN`, `FROM ONLY t`, `IF NOT EXISTS`).
const LIST_MODIFIERS: &[&str] = &[
    "INNER", "LEFT", "RIGHT", "FULL", "OUTER", "CROSS", "NATURAL", "LATERAL", "ONLY", "IF",
    "NOT", "EXISTS",
];

/// Keywords that start a sub-select inside parentheses
const SUBSELECT_KEYWORDS: &[&str] = &["SELECT", "INSERT", "UPDATE", "CREATE", "DELETE"];

/// Words that can never be a table name or an alias when unquoted
const RESERVED: &[&str] = &[
    "ALL", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "COPY", "CREATE", "CROSS", "DEFAULT",
    "DELETE", "DESC", "DISTINCT", "ELSE", "END", "EXCEPT", "EXISTS", "FETCH", "FOR", "FROM",
    "FULL", "GROUP", "HAVING", "IF", "IN", "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN",
    "LATERAL", "LEFT", "LIKE", "LIMIT", "LOCKED", "MINUS", "NATURAL", "NOT", "NOWAIT", "NULL",
    "OF", "OFFSET", "ON", "ONLY", "OR", "ORDER", "OUTER", "QUALIFY", "RETURNING", "RIGHT",
    "SELECT", "SET", "SKIP", "TABLE", "THEN", "TO", "UNION", "UPDATE", "USING", "VALUES", "WHEN",
    "WHERE", "WINDOW", "WITH",
];

#[derive(Debug, Clone)]
enum Node {
    Token(Token),
    Group(Vec<Node>),
}

/// Extract every reference from `sql`, which may hold several statements.
///
/// References are returned in source order. A quote left open while typing
/// does not lose the rest of the statement: the text is cut before the
/// last quote and tokenized again. When no cut is left to try (an unclosed
/// block comment in quote-free text, say), the tokenizer's error is returned.
pub fn extract_references(sql: &str) -> ParseResult<Vec<Reference>> {
    let tokens = tokenize(sql)?;

    let mut scanner = Scanner::default();
    for statement in split_statements(tokens) {
        scanner.scan(&statement, false);
    }
    Ok(scanner.references)
}

/// Tokenize `sql`, dropping the text from an unterminated quote onwards.
fn tokenize(sql: &str) -> ParseResult<Vec<Token>> {
    let dialect = GenericDialect {};
    let mut text = sql;
    loop {
        let err = match Tokenizer::new(&dialect, text).tokenize() {
            Ok(tokens) => return Ok(tokens),
            Err(err) => err,
        };
        // every retry is strictly shorter
        match text.rfind(['\'', '"', '`']) {
            Some(cut) => {
                trace!(error = %err, cut, "retrying before dangling quote");
                text = &text[..cut];
            }
            None => return Err(ParseError::Tokenize(err.to_string())),
        }
    }
}

/// Split on top-level `;` and nest parenthesized groups.
///
/// Unbalanced input is tolerated: a stray `)` is dropped and groups still
/// open at the end of a statement are closed there.
fn split_statements(tokens: Vec<Token>) -> Vec<Vec<Node>> {
    fn close_all(stack: &mut Vec<Vec<Node>>) {
        while stack.len() > 1 {
            if let Some(group) = stack.pop() {
                if let Some(parent) = stack.last_mut() {
                    parent.push(Node::Group(group));
                }
            }
        }
    }

    let mut statements = Vec::new();
    let mut stack: Vec<Vec<Node>> = vec![Vec::new()];

    for token in tokens {
        match token {
            Token::Whitespace(_) | Token::EOF => {}
            Token::LParen => stack.push(Vec::new()),
            Token::RParen => {
                if stack.len() > 1 {
                    if let Some(group) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.push(Node::Group(group));
                        }
                    }
                }
            }
            Token::SemiColon => {
                close_all(&mut stack);
                let statement = std::mem::take(&mut stack[0]);
                if !statement.is_empty() {
                    statements.push(statement);
                }
            }
            other => {
                if let Some(level) = stack.last_mut() {
                    level.push(Node::Token(other));
                }
            }
        }
    }

    close_all(&mut stack);
    let last = std::mem::take(&mut stack[0]);
    if !last.is_empty() {
        statements.push(last);
    }
    statements
}

fn as_word(node: Option<&Node>) -> Option<&Word> {
    match node {
        Some(Node::Token(Token::Word(word))) => Some(word),
        _ => None,
    }
}

fn is_reserved(upper: &str) -> bool {
    RESERVED.contains(&upper) || upper.ends_with("JOIN")
}

/// Upper-cased keyword if `node` is an unquoted reserved word
fn keyword(node: Option<&Node>) -> Option<String> {
    let word = as_word(node)?;
    if word.quote_style.is_some() {
        return None;
    }
    let upper = word.value.to_ascii_uppercase();
    is_reserved(&upper).then_some(upper)
}

/// A word usable as a table name or alias
fn name(node: Option<&Node>) -> Option<&str> {
    let word = as_word(node)?;
    if word.quote_style.is_none() && is_reserved(&word.value.to_ascii_uppercase()) {
        return None;
    }
    Some(&word.value)
}

fn is_subselect(nodes: &[Node]) -> bool {
    nodes.iter().any(|node| {
        keyword(Some(node)).is_some_and(|kw| SUBSELECT_KEYWORDS.contains(&kw.as_str()))
    })
}

fn is_period(node: Option<&Node>) -> bool {
    matches!(node, Some(Node::Token(Token::Period)))
}

#[derive(Default)]
struct Scanner {
    references: Vec<Reference>,
}

impl Scanner {
    fn scan(&mut self, nodes: &[Node], mut expecting: bool) {
        // Set after INTO/TABLE, where `name (...)` is a column list
        let mut column_list_follows = false;
        let mut i = 0;

        while i < nodes.len() {
            let node = &nodes[i];

            if expecting {
                if let Node::Group(inner) = node {
                    if is_subselect(inner) {
                        self.scan(inner, false);
                        let (alias, next) = read_alias(nodes, i + 1);
                        if alias.is_some() {
                            self.push(Reference {
                                schema: None,
                                name: None,
                                alias,
                                is_function: false,
                            });
                        }
                        i = next;
                    } else {
                        // parenthesized join: `FROM (a JOIN b ON ...)`
                        self.scan(inner, true);
                        i += 1;
                    }
                    continue;
                }

                if let Some(kw) = keyword(Some(node)) {
                    if kw == "FROM" || kw.ends_with("JOIN") || LIST_MODIFIERS.contains(&kw.as_str())
                    {
                        i += 1;
                        continue;
                    }
                    expecting = false;
                } else if name(Some(node)).is_some() {
                    i = self.read_reference(nodes, i, column_list_follows);
                    continue;
                } else {
                    i += 1;
                    continue;
                }
            }

            match node {
                Node::Group(inner) => {
                    if is_subselect(inner) || i == 0 || name(nodes.get(i - 1)).is_none() {
                        self.scan(inner, false);
                    } else {
                        // argument list of a function call
                        self.scan_nested(inner);
                    }
                }
                Node::Token(_) => {
                    if let Some(kw) = keyword(Some(node)) {
                        // `FOR UPDATE` is a locking clause, not a target table
                        let locking = kw == "UPDATE"
                            && i > 0
                            && keyword(nodes.get(i - 1)).as_deref() == Some("FOR");
                        let opens_list =
                            TABLE_PREFIXES.contains(&kw.as_str()) || kw.ends_with("JOIN");
                        if opens_list && !locking {
                            expecting = true;
                            column_list_follows = kw == "INTO" || kw == "TABLE";
                        }
                    }
                }
            }
            i += 1;
        }
    }

    /// Look for sub-selects below `nodes` without scanning `nodes` itself.
    fn scan_nested(&mut self, nodes: &[Node]) {
        for node in nodes {
            if let Node::Group(inner) = node {
                if is_subselect(inner) {
                    self.scan(inner, false);
                } else {
                    self.scan_nested(inner);
                }
            }
        }
    }

    /// Read `[schema.]name [(args)] [[AS] alias]` starting at `start`.
    /// Returns the index just past it.
    fn read_reference(&mut self, nodes: &[Node], start: usize, column_list_follows: bool) -> usize {
        let mut parts: Vec<String> = Vec::new();
        if let Some(first) = name(nodes.get(start)) {
            parts.push(first.to_string());
        }
        let mut i = start + 1;
        while is_period(nodes.get(i)) {
            match as_word(nodes.get(i + 1)) {
                Some(word) => {
                    parts.push(word.value.clone());
                    i += 2;
                }
                None => break,
            }
        }

        let mut is_function = false;
        if let Some(Node::Group(inner)) = nodes.get(i) {
            if is_subselect(inner) {
                self.scan(inner, false);
            } else if !column_list_follows {
                is_function = true;
                self.scan_nested(inner);
            }
            i += 1;
        }

        let (alias, next) = read_alias(nodes, i);

        // `FROM "" x` names nothing
        let Some(real_name) = parts.pop().filter(|name| !name.is_empty()) else {
            return next.max(start + 1);
        };
        let schema = (!parts.is_empty()).then(|| parts.join("."));
        self.push(Reference {
            schema,
            name: Some(real_name),
            alias,
            is_function,
        });
        next
    }

    fn push(&mut self, reference: Reference) {
        trace!(?reference, "extracted reference");
        self.references.push(reference);
    }
}

/// Read an optional `[AS] alias [(column aliases)]` at `start`.
fn read_alias(nodes: &[Node], start: usize) -> (Option<String>, usize) {
    let (alias, mut next) = if keyword(nodes.get(start)).as_deref() == Some("AS") {
        match name(nodes.get(start + 1)) {
            Some(alias) => (Some(alias.to_string()), start + 2),
            None => (None, start + 1),
        }
    } else {
        match name(nodes.get(start)) {
            Some(alias) => (Some(alias.to_string()), start + 1),
            None => (None, start),
        }
    };

    if alias.is_some() {
        if let Some(Node::Group(inner)) = nodes.get(next) {
            if !is_subselect(inner) {
                next += 1;
            }
        }
    }
    (alias, next)
}
