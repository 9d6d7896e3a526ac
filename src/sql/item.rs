//! Completion candidates
//!
//! A [`CompletionItem`] is one thing the editor may insert: a catalog object,
//! a keyword, an alias from the statement, or an inferred join condition.
//! Matching is always done on a lower-cased identifier with quote characters
//! stripped from each segment, so `"MyTable"."myCol"` matches `mytable.myco`.

use serde::Serialize;

/// Identifier separator (`schema.table`, `table.column`, `alias.column`)
pub const SEPARATOR: char = '.';

/// What a candidate refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Table,
    Column,
    Function,
    Keyword,
    Alias,
    Condition,
}

impl ItemKind {
    /// Tag shown next to the label in the completion popup
    pub fn tag(self) -> Option<&'static str> {
        match self {
            ItemKind::Table => Some("Table"),
            ItemKind::Column => Some("Col"),
            ItemKind::Function => Some("Func"),
            ItemKind::Keyword => Some("Keyword"),
            ItemKind::Alias => Some("Alias"),
            ItemKind::Condition => None,
        }
    }
}

/// A formatted completion as handed to the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Text shown in the popup, with a tab-separated kind hint
    pub label: String,
    /// Text inserted on accept
    pub insert_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompletionItem {
    kind: ItemKind,
    ident: String,
}

/// Strip leading and trailing identifier quotes
pub fn strip_quotes(ident: &str) -> &str {
    ident.trim_matches(|c| matches!(c, '"' | '\'' | '`'))
}

/// Whether `ident` opens with an identifier quote
pub fn starts_with_quote(ident: &str) -> bool {
    ident.starts_with(['`', '"'])
}

fn escape_dollar_sign(ident: &str) -> String {
    ident.replace('$', "\\$")
}

/// `(parent, object)` from the last two segments of a dotted identifier
fn split_last_two(ident: &str) -> (&str, &str) {
    let mut segments = ident.rsplit(SEPARATOR);
    let object = segments.next().unwrap_or_default();
    let parent = segments.next().unwrap_or_default();
    (strip_quotes(parent), strip_quotes(object))
}

/// Exact mode: equal, or an empty search (matches everything).
/// Fuzzy mode: a single character must start the target, anything longer
/// may occur anywhere in it.
fn string_matched(target: &str, search: &str, exactly: bool) -> bool {
    if exactly {
        return target == search || search.is_empty();
    }
    if search.chars().count() == 1 {
        target.starts_with(search)
    } else {
        target.contains(search)
    }
}

impl CompletionItem {
    /// Create an item. Blank identifiers are rejected.
    pub fn new(kind: ItemKind, ident: impl Into<String>) -> Option<Self> {
        let ident = ident.into();
        if ident.trim().is_empty() {
            return None;
        }
        Some(Self { kind, ident })
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Byte index of the separator splitting parent from name.
    ///
    /// Function argument lists are excluded so `s.round(numeric(10.2))`
    /// splits after `s`.
    fn split_at(&self) -> Option<usize> {
        let head = match self.kind {
            ItemKind::Function => self.ident.split('(').next().unwrap_or_default(),
            _ => &self.ident,
        };
        head.rfind(SEPARATOR)
    }

    /// Text before the last separator, e.g. `table` in `table.column`
    pub fn parent(&self) -> Option<&str> {
        self.split_at().map(|i| &self.ident[..i])
    }

    /// Text after the last separator, e.g. `column` in `table.column`
    pub fn name(&self) -> &str {
        match self.split_at() {
            Some(i) => &self.ident[i + 1..],
            None => &self.ident,
        }
    }

    /// Lower-cased identifier used for matching; functions drop their
    /// argument list (`mydb.myAdd(int, int)` -> `mydb.myadd`).
    fn match_key(&self) -> String {
        match self.kind {
            ItemKind::Function => self
                .ident
                .split('(')
                .next()
                .unwrap_or_default()
                .to_lowercase(),
            _ => self.ident.to_lowercase(),
        }
    }

    /// Score this item against `search`. Lower is better, 0 is no match.
    ///
    /// - 1: both are dotted, parents equal and the objects match
    ///   (`table.column` ~ `table.co`)
    /// - 2: only the item is dotted and its object matches (`table.column` ~ `co`)
    /// - 3: neither is dotted and they match (`table` ~ `tab`)
    pub fn prefix_match_score(&self, search: &str, exactly: bool) -> u8 {
        let target = self.match_key();
        let search = search.to_lowercase();

        let target_dotted = target.contains(SEPARATOR);
        if target_dotted && search.contains(SEPARATOR) {
            let (search_parent, search_object) = split_last_two(&search);
            let (target_parent, target_object) = split_last_two(&target);
            if search_parent == target_parent
                && string_matched(target_object, search_object, exactly)
            {
                return 1;
            }
            return 0;
        }

        let search = strip_quotes(&search);
        if target_dotted {
            let (_, target_object) = split_last_two(&target);
            if string_matched(target_object, search, exactly) {
                return 2;
            }
            return 0;
        }

        if string_matched(strip_quotes(&target), search, exactly) {
            3
        } else {
            0
        }
    }

    /// First non-zero score over `searches`, or 0.
    pub fn prefix_match_list_score<S: AsRef<str>>(&self, searches: &[S], exactly: bool) -> u8 {
        searches
            .iter()
            .map(|search| self.prefix_match_score(search.as_ref(), exactly))
            .find(|score| *score > 0)
            .unwrap_or(0)
    }

    /// Format for the editor. Dotted identifiers insert only their name;
    /// quotes are stripped from the inserted text when `strip` is set
    /// (the user already typed an opening quote).
    pub fn format(&self, strip: bool) -> Suggestion {
        let on_demand = |text: &str| -> String {
            let escaped = escape_dollar_sign(text);
            if strip {
                strip_quotes(&escaped).to_string()
            } else {
                escaped
            }
        };

        let Some(tag) = self.kind.tag() else {
            return Suggestion {
                label: self.ident.clone(),
                insert_text: on_demand(&self.ident),
            };
        };

        match self.parent() {
            Some(parent) => Suggestion {
                label: format!("{}\t({} {})", self.name(), parent, tag),
                insert_text: on_demand(self.name()),
            },
            None => Suggestion {
                label: format!("{}\t({})", self.ident, tag),
                insert_text: on_demand(&self.ident),
            },
        }
    }
}
