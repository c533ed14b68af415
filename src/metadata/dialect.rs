//! The reflection entry point and its schema/table listing queries.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::columns::ColumnsBySchema;
use super::error::{MetadataResult, ReflectionError};
use super::types::{DialectConfig, TableInfo};
use crate::config::{ConnectArgs, ConnectionUrl, ParamValue, UrlResult};
use crate::driver::{Connection, ExecuteOptions, QueryResult, Row, Value};
use crate::sql::ddl::TableLifetime;
use crate::sql::identifier::{Ident, IdentifierPreparer};
use crate::sql::normalize::{denormalize_name, denormalize_quote_join, normalize_name, quote_for_sql};

const PREPARER: IdentifierPreparer = IdentifierPreparer;
const APPLICATION_PARAM: &str = "application";

/// A schema resolved for a reflection call.
#[derive(Debug, Clone)]
pub(super) struct SchemaRef {
    /// Quoted form for use in statements.
    pub sql: String,
    /// Warehouse spelling of the last segment, as reported in `schema_name`
    /// columns.
    pub name: String,
    /// Quoted database prefix when the schema was given as `db.schema`.
    pub database: Option<String>,
}

impl SchemaRef {
    fn from_logical(schema: &str) -> Self {
        let mut segments = PREPARER.split_qualified(schema);
        let name = segments.pop().unwrap_or_default();
        let database = (!segments.is_empty()).then(|| {
            segments
                .iter()
                .map(|s| quote_for_sql(s))
                .collect::<Vec<_>>()
                .join(".")
        });
        Self {
            sql: denormalize_quote_join(&[Some(schema)]),
            name: denormalize_name(&name),
            database,
        }
    }

    fn from_warehouse(name: &str) -> Self {
        Self {
            sql: quote_warehouse_name(name),
            name: name.to_string(),
            database: None,
        }
    }

    /// The `information_schema` of the database holding this schema.
    pub fn information_schema(&self) -> String {
        match &self.database {
            Some(database) => format!("{}.information_schema", database),
            None => "information_schema".to_string(),
        }
    }

    /// Fully qualified, quoted name of a table in this schema.
    pub fn table_sql(&self, table: &str) -> String {
        format!("{}.{}", self.sql, quote_for_sql(table))
    }

    /// Fully qualified name of a table reported by the warehouse.
    pub fn warehouse_table_sql(&self, table: &str) -> String {
        format!("{}.{}", self.sql, quote_warehouse_name(table))
    }

    pub fn cache_key(&self) -> String {
        self.sql.clone()
    }
}

/// Quote a name exactly as the warehouse reported it.
fn quote_warehouse_name(name: &str) -> String {
    let ident = normalize_name(name);
    if ident.is_quoted() {
        PREPARER.quote_identifier(&ident.value)
    } else {
        quote_for_sql(&ident.value)
    }
}

/// Quote text as a single-quoted literal inside a metadata statement.
pub(super) fn literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

pub(super) fn flag(row: &Row, column: &str) -> bool {
    row.get_named(column)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Non-empty text cell.
pub(super) fn non_empty(row: &Row, column: &str) -> Option<String> {
    row.text(column)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(super) fn required<'r>(row: &'r Row, column: &str) -> MetadataResult<&'r str> {
    row.text(column).ok_or_else(|| {
        ReflectionError::UnexpectedResult(format!("missing column '{}' in metadata row", column))
    })
}

/// Reflects schemas, tables, columns and constraints through a
/// [`Connection`].
///
/// Column metadata may be cached per schema when
/// [`DialectConfig::cache_column_metadata`] is set. Constraint listings are
/// always cached per schema. Caches live as long as the dialect value; call
/// [`clear_cache`](Self::clear_cache) after DDL.
#[derive(Debug, Default)]
pub struct SnowflakeDialect {
    pub(super) config: DialectConfig,
    /// `None` marks a schema whose column query was too large.
    pub(super) column_cache: DashMap<String, Option<Arc<ColumnsBySchema>>>,
    pub(super) structured_cache: DashMap<(String, String), Arc<HashMap<String, String>>>,
    /// `SHOW ... KEYS IN SCHEMA` results, keyed by schema and statement.
    pub(super) key_cache: DashMap<(String, &'static str), Arc<QueryResult>>,
}

impl SnowflakeDialect {
    pub fn new(config: DialectConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DialectConfig {
        &self.config
    }

    pub fn clear_cache(&self) {
        self.column_cache.clear();
        self.structured_cache.clear();
        self.key_cache.clear();
    }

    /// Driver connection arguments for `url`, with the configured
    /// application name added unless the URL sets one.
    pub fn connect_args(&self, url: &ConnectionUrl) -> UrlResult<ConnectArgs> {
        let mut args = url.connect_args()?;
        if let Some(application) = &self.config.application_name {
            args.params
                .entry(APPLICATION_PARAM.to_string())
                .or_insert_with(|| ParamValue::Str(application.clone()));
        }
        Ok(args)
    }

    pub(super) async fn query(&self, conn: &dyn Connection, sql: &str) -> MetadataResult<QueryResult> {
        debug!(target: "snowflake_dialect::metadata", sql, "reflection query");
        Ok(conn.execute(sql, &[], ExecuteOptions::default()).await?)
    }

    pub(super) async fn resolve_schema(
        &self,
        conn: &dyn Connection,
        schema: Option<&str>,
    ) -> MetadataResult<SchemaRef> {
        if let Some(schema) = schema.or(self.config.default_schema.as_deref()) {
            return Ok(SchemaRef::from_logical(schema));
        }
        let result = self
            .query(conn, "SELECT current_database(), current_schema()")
            .await?;
        result
            .first()
            .and_then(|row| row.get(1))
            .and_then(Value::as_str)
            .map(SchemaRef::from_warehouse)
            .ok_or_else(|| ReflectionError::UnexpectedResult("no current schema".to_string()))
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// The session's current database and schema, normalized.
    pub async fn current_database_schema(
        &self,
        conn: &dyn Connection,
    ) -> MetadataResult<(Option<Ident>, Option<Ident>)> {
        let result = self
            .query(conn, "SELECT current_database(), current_schema()")
            .await?;
        let Some(row) = result.first() else {
            return Ok((None, None));
        };
        let name = |i: usize| row.get(i).and_then(Value::as_str).map(normalize_name);
        Ok((name(0), name(1)))
    }

    async fn object_exists(&self, conn: &dyn Connection, sql: &str) -> MetadataResult<bool> {
        match self.query(conn, sql).await {
            Ok(_) => Ok(true),
            Err(ReflectionError::Driver(err)) if err.is_object_missing() => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn has_table(
        &self,
        conn: &dyn Connection,
        table: &str,
        schema: Option<&str>,
    ) -> MetadataResult<bool> {
        let schema = self.resolve_schema(conn, schema).await?;
        self.object_exists(conn, &format!("DESC TABLE {}", schema.table_sql(table)))
            .await
    }

    pub async fn has_sequence(
        &self,
        conn: &dyn Connection,
        sequence: &str,
        schema: Option<&str>,
    ) -> MetadataResult<bool> {
        let schema = self.resolve_schema(conn, schema).await?;
        self.object_exists(conn, &format!("DESC SEQUENCE {}", schema.table_sql(sequence)))
            .await
    }

    // =========================================================================
    // Names
    // =========================================================================

    async fn names(&self, conn: &dyn Connection, sql: &str) -> MetadataResult<Vec<Ident>> {
        let result = self.query(conn, sql).await?;
        result
            .rows
            .iter()
            .map(|row| required(row, "name").map(normalize_name))
            .collect()
    }

    pub async fn get_schema_names(&self, conn: &dyn Connection) -> MetadataResult<Vec<Ident>> {
        self.names(conn, "SHOW SCHEMAS").await
    }

    /// Every table in a schema with its kind and lifetime flags.
    pub async fn get_tables_info(
        &self,
        conn: &dyn Connection,
        schema: Option<&str>,
    ) -> MetadataResult<Vec<TableInfo>> {
        let schema = self.resolve_schema(conn, schema).await?;
        let result = self
            .query(conn, &format!("SHOW TABLES IN SCHEMA {}", schema.sql))
            .await?;
        result.rows.iter().map(table_info).collect()
    }

    /// Permanent and transient tables.
    pub async fn get_table_names(
        &self,
        conn: &dyn Connection,
        schema: Option<&str>,
    ) -> MetadataResult<Vec<Ident>> {
        let tables = self.get_tables_info(conn, schema).await?;
        Ok(tables
            .into_iter()
            .filter(|t| !t.is_temporary())
            .map(|t| t.name)
            .collect())
    }

    pub async fn get_temp_table_names(
        &self,
        conn: &dyn Connection,
        schema: Option<&str>,
    ) -> MetadataResult<Vec<Ident>> {
        let tables = self.get_tables_info(conn, schema).await?;
        Ok(tables
            .into_iter()
            .filter(TableInfo::is_temporary)
            .map(|t| t.name)
            .collect())
    }

    pub async fn get_view_names(
        &self,
        conn: &dyn Connection,
        schema: Option<&str>,
    ) -> MetadataResult<Vec<Ident>> {
        let schema = self.resolve_schema(conn, schema).await?;
        self.names(conn, &format!("SHOW VIEWS IN SCHEMA {}", schema.sql))
            .await
    }

    pub async fn get_sequence_names(
        &self,
        conn: &dyn Connection,
        schema: Option<&str>,
    ) -> MetadataResult<Vec<Ident>> {
        let schema = self.resolve_schema(conn, schema).await?;
        self.names(conn, &format!("SHOW SEQUENCES IN SCHEMA {}", schema.sql))
            .await
    }

    /// The `CREATE VIEW` text of a view.
    pub async fn get_view_definition(
        &self,
        conn: &dyn Connection,
        view: &str,
        schema: Option<&str>,
    ) -> MetadataResult<Option<String>> {
        let schema = self.resolve_schema(conn, schema).await?;
        let sql = format!(
            "SELECT GET_DDL('VIEW', {})",
            literal(&schema.table_sql(view))
        );
        let result = self.query(conn, &sql).await?;
        Ok(result
            .scalar()
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// The single `SHOW TABLES LIKE` row for a table.
    pub(super) async fn show_table(
        &self,
        conn: &dyn Connection,
        schema: &SchemaRef,
        table: &str,
    ) -> MetadataResult<TableInfo> {
        let name = denormalize_name(table);
        let sql = format!(
            "SHOW TABLES LIKE {} IN SCHEMA {}",
            literal(&name),
            schema.sql
        );
        let result = self.query(conn, &sql).await?;
        let row = result
            .rows
            .iter()
            .find(|row| row.text("name") == Some(name.as_str()))
            .ok_or_else(|| ReflectionError::no_such_table(&schema.name, &name))?;
        table_info(row)
    }

    pub async fn get_table_comment(
        &self,
        conn: &dyn Connection,
        table: &str,
        schema: Option<&str>,
    ) -> MetadataResult<Option<String>> {
        let schema = self.resolve_schema(conn, schema).await?;
        Ok(self.show_table(conn, &schema, table).await?.comment)
    }
}

fn table_info(row: &Row) -> MetadataResult<TableInfo> {
    let lifetime = match row.text("kind").unwrap_or("TABLE") {
        "TEMPORARY" | "LOCAL TEMPORARY" => TableLifetime::Temporary,
        "TRANSIENT" => TableLifetime::Transient,
        _ => TableLifetime::Permanent,
    };
    Ok(TableInfo {
        name: normalize_name(required(row, "name")?),
        lifetime,
        is_hybrid: flag(row, "is_hybrid"),
        is_dynamic: flag(row, "is_dynamic"),
        is_iceberg: flag(row, "is_iceberg"),
        comment: non_empty(row, "comment"),
    })
}
