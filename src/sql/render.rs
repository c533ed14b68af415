//! Rendering options and literal formatting helpers.

/// Options threaded through every `to_tokens` / `to_sql` call.
///
/// - `deterministic` sorts assignment lists, COPY options, formatter options
///   and credential attributes by key so output is stable for tests.
/// - `escape_percent` doubles `%` in string literals and in the modulo
///   operator, for drivers that interpolate parameters with `%` placeholders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub deterministic: bool,
    pub escape_percent: bool,
}

impl RenderOptions {
    /// Default options with deterministic ordering switched on.
    pub fn deterministic() -> Self {
        Self {
            deterministic: true,
            escape_percent: false,
        }
    }

    #[must_use]
    pub fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    #[must_use]
    pub fn with_escape_percent(mut self, escape_percent: bool) -> Self {
        self.escape_percent = escape_percent;
        self
    }
}

// =============================================================================
// Literal Formatting
// =============================================================================

/// Quote a string literal: backslashes and single quotes are doubled, and
/// `%` is doubled under percent escaping.
pub fn quote_string(s: &str, opts: RenderOptions) -> String {
    let escaped = s.replace('\\', "\\\\").replace('\'', "''");
    if opts.escape_percent {
        format!("'{}'", escaped.replace('%', "%%"))
    } else {
        format!("'{}'", escaped)
    }
}

/// Quote a value inside a stage, storage or file format clause.
///
/// Escape sequences such as `\t` are passed through for the warehouse to
/// interpret, so only the quote character is escaped.
pub fn quote_option_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "\\'"))
}

pub fn format_bool(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Sort `(key, value)` pairs by key when deterministic output is requested.
pub fn ordered<'a, K: AsRef<str>, V>(items: &'a [(K, V)], opts: RenderOptions) -> Vec<&'a (K, V)> {
    let mut refs: Vec<&(K, V)> = items.iter().collect();
    if opts.deterministic {
        refs.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));
    }
    refs
}
