//! Reflected metadata types.
//!
//! Names are reported in their normalized (logical) spelling, see
//! [`normalize_name`](crate::sql::normalize::normalize_name).

use crate::sql::ddl::{Identity, TableLifetime};
use crate::sql::identifier::Ident;
use crate::sql::types::DataType;

/// Reflection behaviour of a [`SnowflakeDialect`](super::SnowflakeDialect).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialectConfig {
    /// Fetch column metadata for a whole schema in one query and cache it.
    pub cache_column_metadata: bool,

    /// Client application name injected into connection arguments.
    pub application_name: Option<String>,

    /// Schema used when a reflection call names none.
    pub default_schema: Option<String>,
}

/// A reflected column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: Ident,
    pub data_type: DataType,
    pub nullable: bool,
    /// Default expression text; `None` for identity columns.
    pub default: Option<String>,
    pub autoincrement: bool,
    pub identity: Option<Identity>,
    pub comment: Option<String>,
    pub primary_key: bool,
}

/// A table listed by `SHOW TABLES`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: Ident,
    pub lifetime: TableLifetime,
    /// Hybrid tables are the only ones that support indexes.
    pub is_hybrid: bool,
    pub is_dynamic: bool,
    pub is_iceberg: bool,
    pub comment: Option<String>,
}

impl TableInfo {
    pub fn is_temporary(&self) -> bool {
        self.lifetime == TableLifetime::Temporary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryKey {
    pub name: Option<Ident>,
    /// Ordered by key sequence.
    pub columns: Vec<Ident>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: Ident,
    pub constrained_columns: Vec<Ident>,
    /// `None` when the referenced table lives in the reflected schema.
    pub referred_schema: Option<Ident>,
    pub referred_table: Ident,
    pub referred_columns: Vec<Ident>,
    /// Only reported when it is not `NO ACTION`.
    pub on_update: Option<String>,
    pub on_delete: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueConstraint {
    pub name: Ident,
    pub columns: Vec<Ident>,
}

/// A secondary index on a hybrid table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    pub name: Ident,
    pub columns: Vec<Ident>,
    pub included_columns: Vec<Ident>,
    pub unique: bool,
}
