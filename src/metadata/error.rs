//! Reflection errors.

use thiserror::Error;

use crate::driver::DriverError;

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, ReflectionError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReflectionError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("table {schema}.{table} does not exist")]
    NoSuchTable { schema: String, table: String },

    /// A metadata query returned rows in a shape this crate does not know.
    #[error("unexpected metadata result: {0}")]
    UnexpectedResult(String),
}

impl ReflectionError {
    pub(crate) fn no_such_table(schema: &str, table: &str) -> Self {
        Self::NoSuchTable {
            schema: schema.to_string(),
            table: table.to_string(),
        }
    }
}
