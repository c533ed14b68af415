//! SQL generation for the Snowflake dialect.
//!
//! Statements are built with typed builders and rendered through a token
//! stream:
//!
//! - [`identifier`] / [`normalize`] - identifier quoting and case normalization
//! - [`types`], [`type_parser`], [`type_compiler`] - column types, parsed and rendered
//! - [`expr`] / [`query`] - expression AST and SELECT builder
//! - [`dml`] - INSERT, UPDATE, DELETE and MERGE
//! - [`ddl`] / [`table_options`] - table DDL including dynamic, iceberg and hybrid tables
//! - [`copy`], [`formatter`], [`storage`], [`stage`] - bulk loading and unloading
//! - [`statement`] - the statement sum type and compilation entry point

pub mod copy;
pub mod ddl;
pub mod dml;
pub mod error;
pub mod expr;
pub mod formatter;
pub mod identifier;
pub mod normalize;
pub mod query;
pub mod render;
pub mod stage;
pub mod statement;
pub mod storage;
pub mod table_options;
pub mod token;
pub mod type_compiler;
pub mod type_parser;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use error::{CompileError, CompileResult, OptionError, TableOptionError, TableValidationError};
pub use expr::{
    cast, col, func, lit_bool, lit_float, lit_int, lit_null, lit_str, next_value, raw_sql,
    table_col, BinaryOperator, Expr, ExprExt, Literal,
};
pub use identifier::{Ident, IdentifierPreparer};
pub use normalize::{denormalize_name, denormalize_quote_join, normalize_name, quote_for_sql};
pub use query::{Query, SelectExpr, TableRef};
pub use render::RenderOptions;
pub use token::{Token, TokenStream};
pub use type_parser::{parse_index_columns, parse_type, tokenize_parameters};
pub use types::{DataType, ObjectField, VectorElement};

// DML
pub use dml::{Delete, Insert, MergeClause, MergeClauseKind, MergeInto, MergeSource, Update};

// DDL
pub use ddl::{
    AlterAction, AlterTable, ColumnDef, CreateIndex, CreateTable, DropIndex, DropTable, Identity,
    ReferentialAction, TableConstraint, TableKind, TableLifetime,
};
pub use table_options::{RefreshMode, TableOption, TableOptionResult, TargetLag, TimeUnit};

// Loading and unloading
pub use copy::{CopyInto, CopyTarget, CopyValue};
pub use formatter::{CopyFormatter, CsvFormatter, FileKind, FormatValue, JsonFormatter, ParquetFormatter};
pub use stage::{CreateFileFormat, CreateStage, ExternalStage};
pub use storage::{AwsBucket, AzureContainer, StorageLocation};

pub use statement::{CompiledStatement, Statement};
