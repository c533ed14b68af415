//! Statement execution over a [`Connection`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{ExecutionError, ExecutionResult, IsolationLevel};
use crate::driver::{Connection, ExecuteOptions, QueryResult, Value};
use crate::sql::expr::next_value;
use crate::sql::render::RenderOptions;
use crate::sql::statement::{CompiledStatement, Statement};

static AUTOCOMMIT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(UPDATE|INSERT|DELETE|MERGE|COPY)").expect("valid autocommit regex"));

/// Whether raw statement text modifies data and should be committed.
pub fn should_autocommit(text: &str) -> bool {
    AUTOCOMMIT_PREFIX.is_match(text)
}

/// A named sequence, optionally schema-qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub name: String,
    pub schema: Option<String>,
}

impl Sequence {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// Executes compiled statements and commits data-modifying ones.
///
/// Commits after a successful data-modifying statement unless an explicit
/// transaction was opened with [`begin`](Self::begin) or the session runs
/// in [`IsolationLevel::Autocommit`].
pub struct ExecutionContext<'c> {
    conn: &'c dyn Connection,
    in_transaction: bool,
    isolation_level: IsolationLevel,
}

impl<'c> ExecutionContext<'c> {
    pub fn new(conn: &'c dyn Connection) -> Self {
        Self {
            conn,
            in_transaction: false,
            isolation_level: IsolationLevel::ReadCommitted,
        }
    }

    pub fn isolation_level(&self) -> IsolationLevel {
        self.isolation_level
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    pub async fn set_isolation_level(&mut self, level: IsolationLevel) -> ExecutionResult<()> {
        self.conn
            .set_autocommit(level == IsolationLevel::Autocommit)
            .await?;
        self.isolation_level = level;
        Ok(())
    }

    /// Open an explicit transaction; statements no longer commit on their own.
    pub fn begin(&mut self) {
        self.in_transaction = true;
    }

    pub async fn commit(&mut self) -> ExecutionResult<()> {
        self.conn.commit().await?;
        self.in_transaction = false;
        Ok(())
    }

    pub async fn rollback(&mut self) -> ExecutionResult<()> {
        self.conn.rollback().await?;
        self.in_transaction = false;
        Ok(())
    }

    async fn finish(&mut self, autocommit: bool) -> ExecutionResult<()> {
        if autocommit && !self.in_transaction && self.isolation_level != IsolationLevel::Autocommit
        {
            debug!(target: "snowflake_dialect::execution", "committing");
            self.conn.commit().await?;
        }
        Ok(())
    }

    /// Execute a compiled statement with bound parameters.
    pub async fn execute(
        &mut self,
        statement: &CompiledStatement,
        params: &[Value],
    ) -> ExecutionResult<QueryResult> {
        debug!(target: "snowflake_dialect::execution", sql = %statement.sql, "execute");

        let options = ExecuteOptions {
            interpolate_empty_params: statement.escape_percent,
        };
        let result = self.conn.execute(&statement.sql, params, options).await?;

        let autocommit = statement
            .autocommit
            .unwrap_or_else(|| should_autocommit(&statement.sql));
        self.finish(autocommit).await?;
        Ok(result)
    }

    /// Compile and execute a statement.
    pub async fn execute_statement(
        &mut self,
        statement: &Statement,
        opts: RenderOptions,
        params: &[Value],
    ) -> ExecutionResult<QueryResult> {
        let compiled = statement.compile(opts)?;
        self.execute(&compiled, params).await
    }

    /// Execute raw SQL text. Whether it commits is decided from the text.
    pub async fn execute_text(&mut self, sql: &str, params: &[Value]) -> ExecutionResult<QueryResult> {
        let statement = CompiledStatement {
            sql: sql.to_string(),
            escape_percent: false,
            autocommit: None,
            is_insert: false,
        };
        self.execute(&statement, params).await
    }

    /// Execute a statement once per parameter row.
    ///
    /// Batched execution never interpolates an empty parameter list, so any
    /// doubled `%%` from rendering is collapsed here first.
    pub async fn execute_batch(
        &mut self,
        statement: &CompiledStatement,
        rows: &[Vec<Value>],
    ) -> ExecutionResult<QueryResult> {
        let sql = if statement.escape_percent {
            statement.sql.replace("%%", "%")
        } else {
            statement.sql.clone()
        };
        debug!(
            target: "snowflake_dialect::execution",
            sql = %sql,
            rows = rows.len(),
            "execute batch"
        );

        let result = self
            .conn
            .execute_many(&sql, rows, ExecuteOptions::default())
            .await?;

        let autocommit = statement
            .autocommit
            .unwrap_or_else(|| should_autocommit(&sql));
        self.finish(autocommit).await?;
        Ok(result)
    }

    /// Fetch the next value of a sequence.
    pub async fn fire_sequence(&mut self, sequence: &Sequence) -> ExecutionResult<Value> {
        let expr = next_value(sequence.schema.as_deref(), &sequence.name);
        let sql = format!(
            "SELECT {}",
            expr.to_tokens().serialize(RenderOptions::default())
        );
        debug!(target: "snowflake_dialect::execution", sql = %sql, "fire sequence");

        let result = self
            .conn
            .execute(&sql, &[], ExecuteOptions::default())
            .await?;
        result
            .scalar()
            .cloned()
            .ok_or(ExecutionError::EmptyResult(sql))
    }
}
