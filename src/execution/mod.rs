//! Execution context: autocommit decisions, sequence firing, percent
//! escaping and the isolation-level vocabulary.

mod context;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::driver::DriverError;
use crate::sql::error::CompileError;

pub use context::{should_autocommit, ExecutionContext, Sequence};

/// Result type for execution.
pub type ExecutionResult<T> = Result<T, ExecutionError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A statement expected to return a value returned no rows.
    #[error("statement returned no rows: {0}")]
    EmptyResult(String),

    #[error("unknown isolation level '{0}'; expected READ COMMITTED or AUTOCOMMIT")]
    UnknownIsolationLevel(String),
}

/// The isolation levels the warehouse exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsolationLevel {
    ReadCommitted,
    Autocommit,
}

impl IsolationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::Autocommit => "AUTOCOMMIT",
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IsolationLevel {
    type Err = ExecutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('_', " ").as_str() {
            "READ COMMITTED" => Ok(IsolationLevel::ReadCommitted),
            "AUTOCOMMIT" => Ok(IsolationLevel::Autocommit),
            _ => Err(ExecutionError::UnknownIsolationLevel(s.to_string())),
        }
    }
}
