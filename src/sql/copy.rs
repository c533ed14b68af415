//! `COPY INTO` for loading tables from storage and unloading them back.
//!
//! # Example
//!
//! ```ignore
//! use snowflake_dialect::sql::{AwsBucket, CopyInto, CsvFormatter, RenderOptions, TableRef};
//!
//! let mut csv = CsvFormatter::new();
//! csv.skip_header(1);
//!
//! let copy = CopyInto::new(TableRef::new("orders"), AwsBucket::new("landing", Some("orders")))
//!     .formatter(csv)
//!     .purge(true);
//! copy.to_sql(RenderOptions::default());
//! ```

use super::expr::Expr;
use super::formatter::CopyFormatter;
use super::query::{Query, TableRef};
use super::render::{format_bool, ordered, quote_option_string, RenderOptions};
use super::stage::ExternalStage;
use super::storage::{AwsBucket, AzureContainer, StorageLocation};
use super::token::{Token, TokenStream};

// ============================================================================
// Targets
// ============================================================================

/// The source or destination of a COPY.
#[derive(Debug, Clone, PartialEq)]
pub enum CopyTarget {
    Table(TableRef),
    Location(StorageLocation),
    Stage(ExternalStage),
    /// A subquery, only valid as the source of an unload.
    Query(Box<Query>),
}

impl CopyTarget {
    fn location(&self) -> Option<&StorageLocation> {
        match self {
            CopyTarget::Location(location) => Some(location),
            _ => None,
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            CopyTarget::Table(table) => {
                ts.append(&table.name_tokens());
            }
            CopyTarget::Location(location) => {
                ts.raw(location.quoted_uri());
            }
            CopyTarget::Stage(stage) => {
                ts.append(&stage.to_tokens());
            }
            CopyTarget::Query(query) => {
                ts.lparen().append(&query.to_tokens()).rparen();
            }
        }
        ts
    }
}

impl From<TableRef> for CopyTarget {
    fn from(table: TableRef) -> Self {
        CopyTarget::Table(table)
    }
}

impl From<&str> for CopyTarget {
    fn from(table: &str) -> Self {
        CopyTarget::Table(TableRef::new(table))
    }
}

impl From<StorageLocation> for CopyTarget {
    fn from(location: StorageLocation) -> Self {
        CopyTarget::Location(location)
    }
}

impl From<AwsBucket> for CopyTarget {
    fn from(bucket: AwsBucket) -> Self {
        CopyTarget::Location(bucket.into())
    }
}

impl From<AzureContainer> for CopyTarget {
    fn from(container: AzureContainer) -> Self {
        CopyTarget::Location(container.into())
    }
}

impl From<ExternalStage> for CopyTarget {
    fn from(stage: ExternalStage) -> Self {
        CopyTarget::Stage(stage)
    }
}

impl From<Query> for CopyTarget {
    fn from(query: Query) -> Self {
        CopyTarget::Query(Box::new(query))
    }
}

// ============================================================================
// Options
// ============================================================================

/// A copy option value.
#[derive(Debug, Clone, PartialEq)]
pub enum CopyValue {
    Str(String),
    Bool(bool),
    Int(i64),
    /// A file list, `('a.csv', 'b.csv')`.
    Files(Vec<String>),
    Expr(Expr),
}

impl CopyValue {
    fn render(&self, opts: RenderOptions) -> String {
        match self {
            CopyValue::Str(s) => quote_option_string(s),
            CopyValue::Bool(b) => format_bool(*b).to_string(),
            CopyValue::Int(n) => n.to_string(),
            CopyValue::Files(files) => format!(
                "({})",
                files
                    .iter()
                    .map(|f| quote_option_string(f))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            CopyValue::Expr(expr) => expr.to_tokens().serialize(opts),
        }
    }
}

impl From<&str> for CopyValue {
    fn from(s: &str) -> Self {
        CopyValue::Str(s.to_string())
    }
}

impl From<bool> for CopyValue {
    fn from(b: bool) -> Self {
        CopyValue::Bool(b)
    }
}

impl From<i64> for CopyValue {
    fn from(n: i64) -> Self {
        CopyValue::Int(n)
    }
}

impl From<Expr> for CopyValue {
    fn from(expr: Expr) -> Self {
        CopyValue::Expr(expr)
    }
}

// ============================================================================
// CopyInto
// ============================================================================

/// `COPY INTO <into> FROM <from> ...`
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct CopyInto {
    pub into: CopyTarget,
    pub from: CopyTarget,
    pub formatter: Option<CopyFormatter>,
    pub partition_by: Option<Expr>,
    options: Vec<(String, CopyValue)>,
}

impl CopyInto {
    pub fn new(into: impl Into<CopyTarget>, from: impl Into<CopyTarget>) -> Self {
        Self {
            into: into.into(),
            from: from.into(),
            formatter: None,
            partition_by: None,
            options: Vec::new(),
        }
    }

    pub fn formatter(mut self, formatter: impl Into<CopyFormatter>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }

    /// Partition unloaded files by an expression.
    pub fn partition_by(mut self, expr: Expr) -> Self {
        self.partition_by = Some(expr);
        self
    }

    /// Set a copy option. Setting an option again replaces its value and
    /// keeps its position.
    pub fn option(mut self, name: &str, value: impl Into<CopyValue>) -> Self {
        let name = name.to_ascii_uppercase();
        let value = value.into();
        match self.options.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.options.push((name, value)),
        }
        self
    }

    pub fn options(&self) -> &[(String, CopyValue)] {
        &self.options
    }

    pub fn force(self, force: bool) -> Self {
        self.option("FORCE", force)
    }

    pub fn single(self, single: bool) -> Self {
        self.option("SINGLE", single)
    }

    pub fn max_file_size(self, bytes: u64) -> Self {
        self.option("MAX_FILE_SIZE", CopyValue::Int(bytes as i64))
    }

    pub fn files(self, files: &[&str]) -> Self {
        self.option(
            "FILES",
            CopyValue::Files(files.iter().map(|f| f.to_string()).collect()),
        )
    }

    pub fn pattern(self, pattern: &str) -> Self {
        self.option("PATTERN", pattern)
    }

    pub fn header(self, header: bool) -> Self {
        self.option("HEADER", header)
    }

    pub fn overwrite(self, overwrite: bool) -> Self {
        self.option("OVERWRITE", overwrite)
    }

    pub fn purge(self, purge: bool) -> Self {
        self.option("PURGE", purge)
    }

    pub fn on_error(self, action: &str) -> Self {
        self.option("ON_ERROR", action)
    }

    /// The storage location whose credentials are rendered: the destination
    /// when unloading to a location, otherwise the source.
    fn credentialed_location(&self) -> Option<&StorageLocation> {
        self.into.location().or_else(|| self.from.location())
    }

    pub fn to_tokens(&self, opts: RenderOptions) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Copy)
            .space()
            .push(Token::Into)
            .space()
            .append(&self.into.to_tokens())
            .space()
            .push(Token::From)
            .space()
            .append(&self.from.to_tokens());

        if let Some(expr) = &self.partition_by {
            ts.space()
                .push(Token::PartitionBy)
                .space()
                .append(&expr.to_tokens());
        }

        if let Some(formatter) = &self.formatter {
            ts.space().raw(formatter.to_sql(opts));
        }

        for (name, value) in ordered(&self.options, opts) {
            ts.space()
                .raw(name)
                .space()
                .push(Token::Eq)
                .space()
                .raw(value.render(opts));
        }

        if let Some(location) = self.credentialed_location() {
            for clause in location.trailing_clauses(opts) {
                ts.space().raw(clause);
            }
        }

        ts
    }

    pub fn to_sql(&self, opts: RenderOptions) -> String {
        self.to_tokens(opts).serialize(opts)
    }
}
