//! Errors raised while building or rendering statements.

use thiserror::Error;

/// Builder validation failure. Raised eagerly by validated setters, which
/// leave the node untouched when they fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// Value outside a fixed vocabulary.
    #[error("{option} must be one of {allowed:?}, got '{value}'")]
    NotAllowed {
        option: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    /// Delimiter-style option that does not decode to a single character.
    #[error("{option} must be a single character or NONE, got '{value}'")]
    NotSingleChar { option: &'static str, value: String },

    #[error("invalid S3 bucket URI '{0}', expected s3://bucket[/path]")]
    InvalidBucketUri(String),

    #[error(
        "invalid Azure container URI '{0}', expected azure://account.blob.core.windows.net/container[/path]"
    )]
    InvalidContainerUri(String),
}

/// A table option that was rejected when it was created.
///
/// Carried inside `CreateTable` as `Err(..)` and reported when the table is
/// rendered, together with every other problem found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {option} option: {message}")]
pub struct TableOptionError {
    pub option: &'static str,
    pub message: String,
}

impl TableOptionError {
    pub fn new(option: &'static str, message: impl Into<String>) -> Self {
        Self {
            option,
            message: message.into(),
        }
    }
}

/// Every problem found while validating a `CREATE TABLE`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid table '{table}': {}", .problems.join("; "))]
pub struct TableValidationError {
    pub table: String,
    pub problems: Vec<String>,
}

/// Render-time failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// `WHEN ... THEN UPDATE SET` or `THEN INSERT` with nothing to assign.
    #[error("MERGE {kind} clause requires at least one assignment")]
    EmptyMergeClause { kind: &'static str },

    #[error("column '{column}' has an unsupported type")]
    UnsupportedType { column: String },

    #[error("table '{table}' does not support indexes; only hybrid tables do")]
    IndexesNotSupported { table: String },

    #[error("file format '{0}' is a named format and cannot be created from a formatter")]
    NamedFileFormat(String),

    #[error(transparent)]
    InvalidTable(#[from] TableValidationError),
}

pub type CompileResult<T> = Result<T, CompileError>;
