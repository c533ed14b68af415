//! # snowflake-dialect
//!
//! The Snowflake SQL dialect: statement compilation, identifier
//! normalization, structured types and schema reflection.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │   Builders: Query, Insert, MergeInto, CopyInto, ...       │
//! └──────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql::statement]
//! ┌──────────────────────────────────────────────────────────┐
//! │   TokenStream ──serialize(RenderOptions)──▶ SQL text      │
//! └──────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [execution]
//! ┌──────────────────────────────────────────────────────────┐
//! │   driver::Connection  ◀── metadata::SnowflakeDialect      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The crate does not speak the wire protocol. A driver implements
//! [`driver::Connection`]; execution and reflection run on top of it.

pub mod config;
pub mod driver;
pub mod execution;
pub mod metadata;
pub mod sql;

// Re-export SQL submodules at crate level
pub use sql::ddl;
pub use sql::dml;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

pub mod prelude {
    pub use crate::config::{ConnectionUrl, Settings};
    pub use crate::driver::{Connection, DriverError, QueryResult, Value};
    pub use crate::execution::{ExecutionContext, IsolationLevel};
    pub use crate::metadata::{DialectConfig, SnowflakeDialect};
    pub use crate::sql::{
        col, func, lit_int, lit_str, table_col, CompileResult, CopyInto, CreateTable, DataType,
        ExprExt, Insert, MergeInto, Query, RenderOptions, Statement,
    };
}
