//! Constraint and index reflection.
//!
//! Constraints are read schema-wide with `SHOW ... KEYS IN SCHEMA` and
//! grouped per table; one cached query serves every table in the schema.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::dialect::{flag, required, SchemaRef, SnowflakeDialect};
use super::error::MetadataResult;
use super::types::{ForeignKey, IndexInfo, PrimaryKey, UniqueConstraint};
use crate::driver::{Connection, QueryResult, Row, Value};
use crate::sql::identifier::Ident;
use crate::sql::normalize::{denormalize_name, normalize_name};
use crate::sql::type_parser::parse_index_columns;

const NO_ACTION: &str = "NO ACTION";

const PRIMARY_KEYS: &str = "PRIMARY KEYS";
const IMPORTED_KEYS: &str = "IMPORTED KEYS";
const UNIQUE_KEYS: &str = "UNIQUE KEYS";

fn key_sequence(row: &Row) -> i64 {
    row.get_named("key_sequence")
        .and_then(Value::as_i64)
        .unwrap_or(0)
}

/// Columns of one constraint, collected out of order and sorted on finish.
#[derive(Debug, Default)]
struct KeyColumns(Vec<(i64, Ident)>);

impl KeyColumns {
    fn push(&mut self, sequence: i64, column: &str) {
        self.0.push((sequence, normalize_name(column)));
    }

    fn finish(mut self) -> Vec<Ident> {
        self.0.sort_by_key(|(sequence, _)| *sequence);
        self.0.into_iter().map(|(_, column)| column).collect()
    }
}

/// A rule is reported only when it changes the default behaviour.
fn referential_rule(row: &Row, column: &str) -> Option<String> {
    row.text(column)
        .filter(|rule| !rule.eq_ignore_ascii_case(NO_ACTION))
        .map(str::to_string)
}

/// Skip the index that backs a hybrid table's primary key.
fn is_primary_key_index(name: &str) -> bool {
    name.starts_with("SYS_INDEX_") && name.ends_with("_PRIMARY")
}

impl SnowflakeDialect {
    /// `SHOW <keys> IN SCHEMA`, run once per schema until the cache is
    /// cleared.
    async fn show_keys(
        &self,
        conn: &dyn Connection,
        schema: &SchemaRef,
        keys: &'static str,
    ) -> MetadataResult<Arc<QueryResult>> {
        let cache_key = (schema.cache_key(), keys);
        if let Some(cached) = self.key_cache.get(&cache_key) {
            return Ok(Arc::clone(&cached));
        }

        let result = Arc::new(
            self.query(conn, &format!("SHOW {} IN SCHEMA {}", keys, schema.sql))
                .await?,
        );
        self.key_cache.insert(cache_key, Arc::clone(&result));
        Ok(result)
    }

    /// Primary keys of every table in a schema, keyed by the warehouse
    /// spelling of the table name.
    pub(super) async fn schema_primary_keys(
        &self,
        conn: &dyn Connection,
        schema: &SchemaRef,
    ) -> MetadataResult<HashMap<String, PrimaryKey>> {
        let result = self.show_keys(conn, schema, PRIMARY_KEYS).await?;

        let mut grouped: HashMap<String, (Option<Ident>, KeyColumns)> = HashMap::new();
        for row in &result.rows {
            let table = required(row, "table_name")?;
            let column = required(row, "column_name")?;
            let entry = grouped.entry(table.to_string()).or_default();
            if entry.0.is_none() {
                entry.0 = row.text("constraint_name").map(normalize_name);
            }
            entry.1.push(key_sequence(row), column);
        }

        Ok(grouped
            .into_iter()
            .map(|(table, (name, columns))| {
                let key = PrimaryKey {
                    name,
                    columns: columns.finish(),
                };
                (table, key)
            })
            .collect())
    }

    /// The primary key of a table; empty when it has none.
    pub async fn get_pk_constraint(
        &self,
        conn: &dyn Connection,
        table: &str,
        schema: Option<&str>,
    ) -> MetadataResult<PrimaryKey> {
        let schema = self.resolve_schema(conn, schema).await?;
        let mut keys = self.schema_primary_keys(conn, &schema).await?;
        Ok(keys.remove(&denormalize_name(table)).unwrap_or_default())
    }

    /// Foreign keys declared on a table, in constraint-name order.
    pub async fn get_foreign_keys(
        &self,
        conn: &dyn Connection,
        table: &str,
        schema: Option<&str>,
    ) -> MetadataResult<Vec<ForeignKey>> {
        let schema = self.resolve_schema(conn, schema).await?;
        let table = denormalize_name(table);
        let result = self.show_keys(conn, &schema, IMPORTED_KEYS).await?;

        struct Pending {
            key: ForeignKey,
            constrained: KeyColumns,
            referred: KeyColumns,
        }

        let mut grouped: BTreeMap<String, Pending> = BTreeMap::new();
        for row in result
            .rows
            .iter()
            .filter(|row| row.text("fk_table_name") == Some(table.as_str()))
        {
            let name = required(row, "fk_name")?;
            let sequence = key_sequence(row);

            if !grouped.contains_key(name) {
                let referred_schema = required(row, "pk_schema_name")?;
                let key = ForeignKey {
                    name: normalize_name(name),
                    constrained_columns: Vec::new(),
                    referred_schema: (referred_schema != schema.name)
                        .then(|| normalize_name(referred_schema)),
                    referred_table: normalize_name(required(row, "pk_table_name")?),
                    referred_columns: Vec::new(),
                    on_update: referential_rule(row, "update_rule"),
                    on_delete: referential_rule(row, "delete_rule"),
                };
                grouped.insert(
                    name.to_string(),
                    Pending {
                        key,
                        constrained: KeyColumns::default(),
                        referred: KeyColumns::default(),
                    },
                );
            }
            if let Some(pending) = grouped.get_mut(name) {
                pending.constrained.push(sequence, required(row, "fk_column_name")?);
                pending.referred.push(sequence, required(row, "pk_column_name")?);
            }
        }

        Ok(grouped
            .into_values()
            .map(|pending| ForeignKey {
                constrained_columns: pending.constrained.finish(),
                referred_columns: pending.referred.finish(),
                ..pending.key
            })
            .collect())
    }

    /// Unique constraints declared on a table, in constraint-name order.
    pub async fn get_unique_constraints(
        &self,
        conn: &dyn Connection,
        table: &str,
        schema: Option<&str>,
    ) -> MetadataResult<Vec<UniqueConstraint>> {
        let schema = self.resolve_schema(conn, schema).await?;
        let table = denormalize_name(table);
        let result = self.show_keys(conn, &schema, UNIQUE_KEYS).await?;

        let mut grouped: BTreeMap<String, KeyColumns> = BTreeMap::new();
        for row in result
            .rows
            .iter()
            .filter(|row| row.text("table_name") == Some(table.as_str()))
        {
            let name = required(row, "constraint_name")?;
            grouped
                .entry(name.to_string())
                .or_default()
                .push(key_sequence(row), required(row, "column_name")?);
        }

        Ok(grouped
            .into_iter()
            .map(|(name, columns)| UniqueConstraint {
                name: normalize_name(&name),
                columns: columns.finish(),
            })
            .collect())
    }

    /// Secondary indexes of a table. Only hybrid tables have any.
    pub async fn get_indexes(
        &self,
        conn: &dyn Connection,
        table: &str,
        schema: Option<&str>,
    ) -> MetadataResult<Vec<IndexInfo>> {
        let schema = self.resolve_schema(conn, schema).await?;
        if !self.show_table(conn, &schema, table).await?.is_hybrid {
            return Ok(Vec::new());
        }

        let table = denormalize_name(table);
        let result = self
            .query(conn, &format!("SHOW INDEXES IN SCHEMA {}", schema.sql))
            .await?;

        let mut indexes = Vec::new();
        for row in result
            .rows
            .iter()
            .filter(|row| row.text("table") == Some(table.as_str()))
        {
            let name = required(row, "name")?;
            if is_primary_key_index(name) {
                continue;
            }
            let columns = |column: &str| {
                row.text(column)
                    .map(parse_index_columns)
                    .unwrap_or_default()
                    .iter()
                    .map(|c| normalize_name(c))
                    .collect::<Vec<_>>()
            };
            indexes.push(IndexInfo {
                name: normalize_name(name),
                columns: columns("columns"),
                included_columns: columns("included_columns"),
                unique: flag(row, "is_unique"),
            });
        }
        Ok(indexes)
    }
}
