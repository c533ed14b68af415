//! Column reflection.
//!
//! Two paths produce the same [`ColumnInfo`] shape:
//!
//! - the schema path: one `information_schema.columns` query for every table
//!   in a schema, cached per schema;
//! - the describe path: `DESC TABLE ... TYPE = COLUMNS` for one table.
//!
//! The schema path is used when column caching is on. When the warehouse
//! refuses it with "too much data" (errno 90030) the refusal is remembered
//! for that schema and every table in it is described on its own.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::dialect::{flag, literal, non_empty, required, SchemaRef, SnowflakeDialect};
use super::error::{MetadataResult, ReflectionError};
use super::types::ColumnInfo;
use crate::driver::{Connection, QueryResult, Row, Value};
use crate::sql::ddl::Identity;
use crate::sql::normalize::{denormalize_name, normalize_name};
use crate::sql::type_parser::parse_type;
use crate::sql::types::DataType;

/// Column metadata of one schema, keyed by the warehouse spelling of the
/// table name.
pub(super) type ColumnsBySchema = HashMap<String, Vec<ColumnInfo>>;

static IDENTITY_DEFAULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"IDENTITY START (\d+) INCREMENT (\d+) (ORDER|NOORDER)")
        .expect("valid identity regex")
});

const CLUSTERING_COLUMN_PREFIX: &str = "sys_clustering_column";

/// Parse an identity description such as
/// `IDENTITY START 1 INCREMENT 1 ORDER` from a column default.
pub fn parse_identity_default(text: &str) -> Option<Identity> {
    let caps = IDENTITY_DEFAULT.captures(text)?;
    let start = caps[1].parse().ok()?;
    let increment = caps[2].parse().ok()?;
    Some(Identity::new(start, increment).ordered(&caps[3] == "ORDER"))
}

fn is_clustering_column(name: &str) -> bool {
    name.to_ascii_lowercase().starts_with(CLUSTERING_COLUMN_PREFIX)
}

fn length(row: &Row, column: &str) -> Option<u32> {
    row.get_named(column)
        .and_then(Value::as_i64)
        .and_then(|n| u32::try_from(n).ok())
}

fn warn_unknown(table: &str, column: &str, type_name: &str, data_type: &DataType) {
    if data_type.is_unknown() {
        warn!(
            target: "snowflake_dialect::metadata",
            table,
            column,
            type_name,
            "unrecognized column type"
        );
    }
}

impl SnowflakeDialect {
    /// Columns of a table, in ordinal order.
    pub async fn get_columns(
        &self,
        conn: &dyn Connection,
        table: &str,
        schema: Option<&str>,
    ) -> MetadataResult<Vec<ColumnInfo>> {
        let schema = self.resolve_schema(conn, schema).await?;
        if !self.config.cache_column_metadata {
            return self.describe_columns(conn, &schema, table).await;
        }

        let Some(columns) = self.schema_columns(conn, &schema).await? else {
            return self.describe_columns(conn, &schema, table).await;
        };

        let name = denormalize_name(table);
        columns
            .get(&name)
            .cloned()
            .ok_or_else(|| ReflectionError::no_such_table(&schema.name, &name))
    }

    /// `DESC TABLE` on a quoted table name; `table` is the warehouse
    /// spelling reported in errors.
    async fn describe(
        &self,
        conn: &dyn Connection,
        schema: &SchemaRef,
        table_sql: &str,
        table: &str,
    ) -> MetadataResult<QueryResult> {
        let sql = format!("DESC TABLE {} TYPE = COLUMNS", table_sql);
        match self.query(conn, &sql).await {
            Err(ReflectionError::Driver(err)) if err.is_object_missing() => {
                Err(ReflectionError::no_such_table(&schema.name, table))
            }
            result => result,
        }
    }

    async fn describe_columns(
        &self,
        conn: &dyn Connection,
        schema: &SchemaRef,
        table: &str,
    ) -> MetadataResult<Vec<ColumnInfo>> {
        let result = self
            .describe(conn, schema, &schema.table_sql(table), &denormalize_name(table))
            .await?;
        let mut columns = Vec::with_capacity(result.rows.len());

        for row in &result.rows {
            let name = required(row, "name")?;
            if is_clustering_column(name) {
                continue;
            }
            let type_name = required(row, "type")?;
            let data_type = parse_type(type_name);
            warn_unknown(table, name, type_name, &data_type);

            let default = non_empty(row, "default");
            let identity = default.as_deref().and_then(parse_identity_default);

            columns.push(ColumnInfo {
                name: normalize_name(name),
                data_type,
                nullable: flag(row, "null?"),
                default: if identity.is_some() { None } else { default },
                autoincrement: identity.is_some(),
                identity,
                comment: non_empty(row, "comment"),
                primary_key: flag(row, "primary key"),
            });
        }
        Ok(columns)
    }

    /// Column name to type text for one table, from `DESC TABLE`. `table` is
    /// the warehouse spelling.
    ///
    /// `information_schema` reports only `ARRAY`, `OBJECT` or `MAP` for
    /// structured columns; the element and field types come from here.
    async fn structured_types(
        &self,
        conn: &dyn Connection,
        schema: &SchemaRef,
        table: &str,
    ) -> MetadataResult<Arc<HashMap<String, String>>> {
        let key = (schema.cache_key(), table.to_string());
        if let Some(cached) = self.structured_cache.get(&key) {
            return Ok(Arc::clone(&cached));
        }

        let result = self
            .describe(conn, schema, &schema.warehouse_table_sql(table), table)
            .await?;
        let types = result
            .rows
            .iter()
            .map(|row| Ok((required(row, "name")?.to_string(), required(row, "type")?.to_string())))
            .collect::<MetadataResult<HashMap<_, _>>>()?;

        let types = Arc::new(types);
        self.structured_cache.insert(key, Arc::clone(&types));
        Ok(types)
    }

    /// Column metadata of a whole schema, or `None` once the warehouse has
    /// refused the schema query with "too much data". Both outcomes are
    /// cached until [`clear_cache`](SnowflakeDialect::clear_cache).
    async fn schema_columns(
        &self,
        conn: &dyn Connection,
        schema: &SchemaRef,
    ) -> MetadataResult<Option<Arc<ColumnsBySchema>>> {
        let key = schema.cache_key();
        if let Some(cached) = self.column_cache.get(&key) {
            return Ok(cached.value().clone());
        }

        let sql = format!(
            "SELECT ic.table_name, ic.column_name, ic.data_type, \
             ic.character_maximum_length, ic.numeric_precision, ic.numeric_scale, \
             ic.is_nullable, ic.column_default, ic.is_identity, ic.comment, \
             ic.identity_start, ic.identity_increment, ic.identity_ordered \
             FROM {}.columns ic WHERE ic.table_schema = {} \
             ORDER BY ic.ordinal_position",
            schema.information_schema(),
            literal(&schema.name)
        );
        let result = match self.query(conn, &sql).await {
            Ok(result) => result,
            Err(ReflectionError::Driver(err)) if err.is_too_much_data() => {
                warn!(
                    target: "snowflake_dialect::metadata",
                    schema = %schema.sql,
                    "schema column metadata too large, describing tables one at a time"
                );
                self.column_cache.insert(key, None);
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let primary_keys = self.schema_primary_keys(conn, schema).await?;

        let mut by_table = ColumnsBySchema::new();
        for row in &result.rows {
            let table = required(row, "table_name")?;
            let name = required(row, "column_name")?;
            if is_clustering_column(name) {
                continue;
            }

            let type_name = required(row, "data_type")?;
            let data_type = match type_name {
                "NUMBER" => DataType::Number {
                    precision: length(row, "numeric_precision"),
                    scale: length(row, "numeric_scale"),
                },
                "TEXT" => DataType::Varchar(length(row, "character_maximum_length")),
                "BINARY" => DataType::Binary(length(row, "character_maximum_length")),
                "ARRAY" | "OBJECT" | "MAP" => {
                    let described = self.structured_types(conn, schema, table).await?;
                    parse_type(described.get(name).map_or(type_name, String::as_str))
                }
                other => parse_type(other),
            };
            warn_unknown(table, name, type_name, &data_type);

            let default = non_empty(row, "column_default");
            let identity = if flag(row, "is_identity") {
                Some(Identity {
                    start: row.get_named("identity_start").and_then(Value::as_i64).unwrap_or(1),
                    increment: row
                        .get_named("identity_increment")
                        .and_then(Value::as_i64)
                        .unwrap_or(1),
                    order: row.get_named("identity_ordered").and_then(Value::as_bool),
                })
            } else {
                default.as_deref().and_then(parse_identity_default)
            };

            let column = normalize_name(name);
            let primary_key = primary_keys
                .get(table)
                .is_some_and(|pk| pk.columns.contains(&column));

            by_table.entry(table.to_string()).or_default().push(ColumnInfo {
                name: column,
                data_type,
                nullable: flag(row, "is_nullable"),
                default: if identity.is_some() { None } else { default },
                autoincrement: identity.is_some(),
                identity,
                comment: non_empty(row, "comment"),
                primary_key,
            });
        }

        let by_table = Arc::new(by_table);
        self.column_cache.insert(key, Some(Arc::clone(&by_table)));
        Ok(Some(by_table))
    }
}
