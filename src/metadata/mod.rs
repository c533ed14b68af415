//! Reflection engine.
//!
//! [`SnowflakeDialect`] answers catalog questions (schemas, tables, columns,
//! keys, indexes) by running `SHOW`, `DESC` and `information_schema` queries
//! through a [`Connection`](crate::driver::Connection) and normalizing the
//! names it reads back.
//!
//! # Example
//!
//! ```ignore
//! use snowflake_dialect::metadata::{DialectConfig, SnowflakeDialect};
//!
//! let dialect = SnowflakeDialect::new(DialectConfig {
//!     cache_column_metadata: true,
//!     ..Default::default()
//! });
//!
//! let tables = dialect.get_table_names(&conn, Some("analytics.public")).await?;
//! let columns = dialect.get_columns(&conn, "orders", Some("analytics.public")).await?;
//! ```

mod columns;
mod dialect;
mod error;
mod keys;
mod types;

pub use columns::parse_identity_default;
pub use dialect::SnowflakeDialect;
pub use error::{MetadataResult, ReflectionError};
pub use types::*;
