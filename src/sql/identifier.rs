//! Identifier quoting for Snowflake.
//!
//! Snowflake stores unquoted identifiers in uppercase. This crate treats the
//! all-lowercase spelling as the logical "case-insensitive" form, so any
//! identifier that is not all-lowercase (or collides with a reserved word, or
//! contains characters outside `[A-Za-z0-9_$]`) must be wrapped in double
//! quotes to keep its exact spelling.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

// =============================================================================
// Reserved Words
// =============================================================================

/// Snowflake reserved and limited keywords, stored lowercase.
static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "account",
        "all",
        "alter",
        "and",
        "any",
        "as",
        "between",
        "by",
        "case",
        "cast",
        "check",
        "column",
        "connect",
        "connection",
        "constraint",
        "create",
        "cross",
        "current",
        "current_date",
        "current_time",
        "current_timestamp",
        "current_user",
        "database",
        "delete",
        "distinct",
        "drop",
        "else",
        "exists",
        "false",
        "following",
        "for",
        "from",
        "full",
        "grant",
        "group",
        "gscluster",
        "having",
        "ilike",
        "in",
        "increment",
        "inner",
        "insert",
        "intersect",
        "into",
        "is",
        "issue",
        "join",
        "lateral",
        "left",
        "like",
        "localtime",
        "localtimestamp",
        "minus",
        "natural",
        "not",
        "null",
        "of",
        "on",
        "or",
        "order",
        "organization",
        "qualify",
        "regexp",
        "revoke",
        "right",
        "rlike",
        "row",
        "rows",
        "sample",
        "schema",
        "select",
        "set",
        "some",
        "start",
        "table",
        "tablesample",
        "then",
        "to",
        "trigger",
        "true",
        "try_cast",
        "union",
        "unique",
        "update",
        "using",
        "values",
        "view",
        "when",
        "whenever",
        "where",
        "with",
    ]
    .into_iter()
    .collect()
});

static LEGAL_CHARACTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_$]+$").expect("valid identifier regex"));

/// Returns true if `word` (any case) is a Snowflake reserved word.
pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(word.to_lowercase().as_str())
}

// =============================================================================
// Ident
// =============================================================================

/// An identifier plus its quoting decision.
///
/// `quote` is `None` for "quote when required", `Some(true)` to force quotes
/// and `Some(false)` to never quote.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub value: String,
    pub quote: Option<bool>,
}

impl Ident {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quote: None,
        }
    }

    /// An identifier that is always rendered inside double quotes.
    pub fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quote: Some(true),
        }
    }

    /// An identifier that is rendered verbatim.
    pub fn bare(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quote: Some(false),
        }
    }

    pub fn is_quoted(&self) -> bool {
        self.quote == Some(true)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Ident::new(s)
    }
}

impl From<String> for Ident {
    fn from(s: String) -> Self {
        Ident::new(s)
    }
}

impl From<&String> for Ident {
    fn from(s: &String) -> Self {
        Ident::new(s.clone())
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&IdentifierPreparer.quote(self))
    }
}

// =============================================================================
// Identifier Preparer
// =============================================================================

/// Stateless quoting rules for Snowflake identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentifierPreparer;

impl IdentifierPreparer {
    /// Wrap `name` in double quotes, doubling any embedded quote.
    pub fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Whether `name` has to be quoted to survive a round trip unchanged.
    pub fn requires_quotes(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        RESERVED_WORDS.contains(lower.as_str())
            || name
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit() || c == '$')
            || !LEGAL_CHARACTERS.is_match(name)
            || lower != name
    }

    /// Quote `ident` according to its quoting mark.
    pub fn quote(&self, ident: &Ident) -> String {
        match ident.quote {
            Some(true) => self.quote_identifier(&ident.value),
            Some(false) => ident.value.clone(),
            None if self.requires_quotes(&ident.value) => self.quote_identifier(&ident.value),
            None => ident.value.clone(),
        }
    }

    /// Quote a bare string under the "quote when required" rule.
    pub fn quote_str(&self, name: &str) -> String {
        if self.requires_quotes(name) {
            self.quote_identifier(name)
        } else {
            name.to_string()
        }
    }

    /// Split a dotted name into its segments, honoring double-quoted segments.
    ///
    /// `"A.b".c` yields `["A.b", "c"]`. Empty segments are dropped and an
    /// unterminated quoted segment is emitted as-is.
    pub fn split_qualified(&self, name: &str) -> Vec<String> {
        let chars: Vec<char> = name.chars().collect();
        let mut parts = Vec::new();
        let mut start = 0usize;
        let mut in_quote = false;

        for (idx, &ch) in chars.iter().enumerate() {
            if !in_quote {
                if ch == '.' && start < idx {
                    parts.push(chars[start..idx].iter().collect());
                    start = idx + 1;
                } else if ch == '"' {
                    in_quote = true;
                    start = idx + 1;
                }
            } else if ch == '"' && start < idx {
                parts.push(chars[start..idx].iter().collect());
                in_quote = false;
                // skip the separator that follows the closing quote
                start = idx + 2;
            }
        }

        if start < chars.len() && chars[start] == '.' {
            start += 1;
        }
        if start < chars.len() {
            parts.push(chars[start..].iter().collect());
        }
        parts
    }

    /// Quote each present segment and join them with `.`.
    pub fn quote_free_identifiers(&self, parts: &[Option<&str>]) -> String {
        parts
            .iter()
            .flatten()
            .map(|p| self.quote_str(p))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quote a possibly dotted schema name (`db.schema`), segment by segment.
    pub fn quote_schema(&self, schema: &str) -> String {
        self.split_qualified(schema)
            .iter()
            .map(|p| self.quote_str(p))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Render `schema.name` (or just `name`) with conditional quoting.
    pub fn format_qualified(&self, schema: Option<&str>, name: &str) -> String {
        match schema {
            Some(schema) => format!("{}.{}", self.quote_schema(schema), self.quote_str(name)),
            None => self.quote_str(name),
        }
    }
}
