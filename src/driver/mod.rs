//! The interface this crate needs from a warehouse driver.
//!
//! The crate never speaks the wire protocol itself. Execution and
//! reflection go through the [`Connection`] trait, which a driver crate (or
//! a test double) implements.

mod error;

use std::sync::Arc;

use async_trait::async_trait;

pub use error::{
    DriverError, DriverResult, ERRNO_OBJECT_DOES_NOT_EXIST, ERRNO_OBJECT_NOT_FOUND,
    ERRNO_TOO_MUCH_DATA,
};

// =============================================================================
// Values and rows
// =============================================================================

/// A single cell or bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer value, parsing text cells such as `"38"`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean value. Metadata views report flags as `Y`/`N` or `YES`/`NO`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(n) => Some(*n != 0),
            Value::Text(s) => match s.to_ascii_uppercase().as_str() {
                "Y" | "YES" | "TRUE" => Some(true),
                "N" | "NO" | "FALSE" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// One result row with positional and by-name access.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Look up a cell by column name, ignoring ASCII case.
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .and_then(|i| self.values.get(i))
    }

    /// Non-null text cell by column name.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get_named(name).and_then(Value::as_str)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Rows plus the column description of a statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Affected row count for DML.
    pub rowcount: Option<u64>,
}

impl QueryResult {
    pub fn new(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let names: Arc<[String]> = columns.iter().map(|c| c.to_string()).collect();
        Self {
            columns: names.to_vec(),
            rows: rows
                .into_iter()
                .map(|values| Row {
                    columns: Arc::clone(&names),
                    values,
                })
                .collect(),
            rowcount: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_rowcount(mut self, rowcount: u64) -> Self {
        self.rowcount = Some(rowcount);
        self
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// First cell of the first row.
    pub fn scalar(&self) -> Option<&Value> {
        self.first().and_then(|row| row.get(0))
    }
}

// =============================================================================
// Connection
// =============================================================================

/// Per-call execution flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Run parameter interpolation even when no parameters are bound, so
    /// that doubled `%%` in the text collapses to `%`.
    pub interpolate_empty_params: bool,
}

/// An open warehouse session.
#[async_trait]
pub trait Connection: Send + Sync {
    async fn execute(
        &self,
        sql: &str,
        params: &[Value],
        options: ExecuteOptions,
    ) -> DriverResult<QueryResult>;

    /// Execute one statement once per parameter row.
    async fn execute_many(
        &self,
        sql: &str,
        rows: &[Vec<Value>],
        options: ExecuteOptions,
    ) -> DriverResult<QueryResult>;

    async fn commit(&self) -> DriverResult<()>;

    async fn rollback(&self) -> DriverResult<()>;

    async fn set_autocommit(&self, autocommit: bool) -> DriverResult<()>;
}
