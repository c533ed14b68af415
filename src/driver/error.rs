//! Driver error types.

use thiserror::Error;

/// `DESC` on an object that does not exist.
pub const ERRNO_OBJECT_DOES_NOT_EXIST: i32 = 2002;
/// Object not found, or not authorized.
pub const ERRNO_OBJECT_NOT_FOUND: i32 = 2003;
/// Result set too large to return, raised by schema-wide metadata queries.
pub const ERRNO_TOO_MUCH_DATA: i32 = 90030;

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors reported by a [`Connection`](super::Connection).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// The warehouse rejected a statement.
    #[error("{message} (errno {errno})")]
    Programming {
        errno: i32,
        sqlstate: Option<String>,
        message: String,
    },

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("connection is closed")]
    Closed,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl DriverError {
    pub fn programming(errno: i32, message: impl Into<String>) -> Self {
        Self::Programming {
            errno,
            sqlstate: None,
            message: message.into(),
        }
    }

    /// The warehouse error code, when the error came from the warehouse.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Programming { errno, .. } => Some(*errno),
            _ => None,
        }
    }

    /// The object named in the statement does not exist.
    pub fn is_object_missing(&self) -> bool {
        matches!(
            self.errno(),
            Some(ERRNO_OBJECT_DOES_NOT_EXIST | ERRNO_OBJECT_NOT_FOUND)
        )
    }

    pub fn is_too_much_data(&self) -> bool {
        self.errno() == Some(ERRNO_TOO_MUCH_DATA)
    }
}
