//! DML (Data Manipulation Language) support.
//!
//! Builders for INSERT, UPDATE, DELETE and the warehouse's MERGE statement.
//!
//! # Examples
//!
//! ```ignore
//! use snowflake_dialect::sql::{Insert, Update, Delete, MergeInto};
//! use snowflake_dialect::sql::expr::{col, table_col, lit_str, lit_int, ExprExt};
//!
//! let insert = Insert::into("users")
//!     .columns(["name", "email"])
//!     .values([lit_str("Alice"), lit_str("alice@example.com")]);
//!
//! let update = Update::table("users")
//!     .set("status", lit_str("active"))
//!     .filter(col("id").eq(lit_int(1)));
//!
//! let merge = MergeInto::new("users", "staged", table_col("users", "id").eq(table_col("staged", "id")))
//!     .when_matched_then_update([("name", table_col("staged", "name"))]);
//! ```

use super::error::{CompileError, CompileResult};
use super::expr::{Expr, ExprExt};
use super::identifier::Ident;
use super::query::{Query, TableRef};
use super::render::{ordered, RenderOptions};
use super::token::{Token, TokenStream};

fn push_table_list(ts: &mut TokenStream, tables: &[TableRef]) {
    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.append(&table.to_tokens());
    }
}

fn and_filter(existing: Option<Expr>, expr: Expr) -> Expr {
    match existing {
        Some(existing) => existing.and(expr),
        None => expr,
    }
}

// ============================================================================
// INSERT
// ============================================================================

/// INSERT statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Insert {
    pub table: TableRef,
    pub columns: Vec<Ident>,
    pub values: Vec<Vec<Expr>>,
    pub from_query: Option<Box<Query>>,
}

impl Insert {
    /// Create a new INSERT statement.
    pub fn into(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
            from_query: None,
        }
    }

    /// Set the columns to insert.
    pub fn columns(mut self, cols: impl IntoIterator<Item = impl Into<Ident>>) -> Self {
        self.columns = cols.into_iter().map(|c| c.into()).collect();
        self
    }

    /// Add a row of values.
    pub fn values(mut self, vals: impl IntoIterator<Item = impl Into<Expr>>) -> Self {
        self.values.push(vals.into_iter().map(|v| v.into()).collect());
        self
    }

    /// Add multiple rows of values.
    pub fn values_many(mut self, rows: impl IntoIterator<Item = Vec<Expr>>) -> Self {
        self.values.extend(rows);
        self
    }

    /// Insert from a SELECT query.
    pub fn from_select(mut self, query: Query) -> Self {
        self.from_query = Some(Box::new(query));
        self
    }

    /// True when more than one VALUES row is present.
    pub fn is_multi_row(&self) -> bool {
        self.values.len() > 1
    }

    pub fn to_sql(&self, opts: RenderOptions) -> String {
        self.to_tokens().serialize(opts)
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Insert).space().push(Token::Into).space();
        ts.append(&self.table.name_tokens());

        if !self.columns.is_empty() {
            ts.space().lparen();
            for (i, col) in self.columns.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.push(Token::Ident(col.clone()));
            }
            ts.rparen();
        }

        if let Some(ref query) = self.from_query {
            ts.space().append(&query.to_tokens());
        } else if !self.values.is_empty() {
            ts.space().push(Token::Values);
            for (row_idx, row) in self.values.iter().enumerate() {
                if row_idx > 0 {
                    ts.comma();
                }
                ts.space().lparen();
                for (i, val) in row.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&val.to_tokens());
                }
                ts.rparen();
            }
        }

        ts
    }
}

// ============================================================================
// UPDATE
// ============================================================================

/// UPDATE statement, with the warehouse's `FROM t2, t3` extension.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Update {
    pub table: TableRef,
    pub set: Vec<(Ident, Expr)>,
    pub from: Vec<TableRef>,
    pub filter: Option<Expr>,
}

impl Update {
    /// Create a new UPDATE statement.
    pub fn table(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            set: Vec::new(),
            from: Vec::new(),
            filter: None,
        }
    }

    /// Set a column to a value.
    pub fn set(mut self, column: impl Into<Ident>, value: impl Into<Expr>) -> Self {
        self.set.push((column.into(), value.into()));
        self
    }

    /// Set multiple columns.
    pub fn set_many(
        mut self,
        assignments: impl IntoIterator<Item = (impl Into<Ident>, impl Into<Expr>)>,
    ) -> Self {
        self.set
            .extend(assignments.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a table to the FROM list.
    pub fn from(mut self, table: impl Into<TableRef>) -> Self {
        self.from.push(table.into());
        self
    }

    /// Add WHERE clause (ANDed with any existing condition).
    pub fn filter(mut self, expr: Expr) -> Self {
        self.filter = Some(and_filter(self.filter.take(), expr));
        self
    }

    pub fn to_sql(&self, opts: RenderOptions) -> String {
        self.to_tokens().serialize(opts)
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Update).space();
        ts.append(&self.table.to_tokens());

        ts.space().push(Token::Set).space();
        for (i, (col, expr)) in self.set.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(Token::Ident(col.clone()))
                .space()
                .push(Token::Eq)
                .space()
                .append(&expr.to_tokens());
        }

        if !self.from.is_empty() {
            ts.space().push(Token::From).space();
            push_table_list(&mut ts, &self.from);
        }

        if let Some(ref filter) = self.filter {
            ts.space()
                .push(Token::Where)
                .space()
                .append(&filter.to_tokens());
        }

        ts
    }
}

// ============================================================================
// DELETE
// ============================================================================

/// DELETE statement, with `USING t2, t3`.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Delete {
    pub table: TableRef,
    pub using: Vec<TableRef>,
    pub filter: Option<Expr>,
}

impl Delete {
    /// Create a new DELETE statement.
    pub fn from(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            using: Vec::new(),
            filter: None,
        }
    }

    /// Add a table to the USING list.
    pub fn using(mut self, table: impl Into<TableRef>) -> Self {
        self.using.push(table.into());
        self
    }

    /// Add WHERE clause (ANDed with any existing condition).
    pub fn filter(mut self, expr: Expr) -> Self {
        self.filter = Some(and_filter(self.filter.take(), expr));
        self
    }

    pub fn to_sql(&self, opts: RenderOptions) -> String {
        self.to_tokens().serialize(opts)
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Delete).space().push(Token::From).space();
        ts.append(&self.table.to_tokens());

        if !self.using.is_empty() {
            ts.space().push(Token::Using).space();
            push_table_list(&mut ts, &self.using);
        }

        if let Some(ref filter) = self.filter {
            ts.space()
                .push(Token::Where)
                .space()
                .append(&filter.to_tokens());
        }

        ts
    }
}

// ============================================================================
// MERGE
// ============================================================================

/// `MERGE INTO target USING source ON predicate WHEN ...`.
///
/// Clauses render in the order they were added. Assignments keep insertion
/// order unless [`RenderOptions::deterministic`] is set, in which case each
/// clause's assignments are sorted by column name.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct MergeInto {
    pub target: TableRef,
    pub source: MergeSource,
    pub on: Expr,
    pub clauses: Vec<MergeClause>,
}

/// Source for a MERGE statement: a table or an aliased subquery.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeSource {
    Table(TableRef),
    Query { query: Box<Query>, alias: Ident },
}

impl MergeSource {
    pub fn query(query: Query, alias: impl Into<Ident>) -> Self {
        MergeSource::Query {
            query: Box::new(query),
            alias: alias.into(),
        }
    }

    fn to_tokens(&self) -> TokenStream {
        match self {
            MergeSource::Table(table) => table.to_tokens(),
            MergeSource::Query { query, alias } => {
                let mut ts = TokenStream::new();
                ts.lparen()
                    .append(&query.to_tokens())
                    .rparen()
                    .space()
                    .push(Token::As)
                    .space()
                    .push(Token::Ident(alias.clone()));
                ts
            }
        }
    }
}

impl From<TableRef> for MergeSource {
    fn from(table: TableRef) -> Self {
        MergeSource::Table(table)
    }
}

impl From<&str> for MergeSource {
    fn from(table: &str) -> Self {
        MergeSource::Table(TableRef::new(table))
    }
}

/// Action taken by a MERGE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeClauseKind {
    /// `WHEN MATCHED THEN UPDATE SET ...`
    Update,
    /// `WHEN MATCHED THEN DELETE`
    Delete,
    /// `WHEN NOT MATCHED THEN INSERT (...) VALUES (...)`
    Insert,
}

impl MergeClauseKind {
    fn keyword(self) -> &'static str {
        match self {
            MergeClauseKind::Update => "UPDATE",
            MergeClauseKind::Delete => "DELETE",
            MergeClauseKind::Insert => "INSERT",
        }
    }
}

/// One `WHEN [NOT] MATCHED [AND predicate] THEN ...` clause.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct MergeClause {
    pub kind: MergeClauseKind,
    pub predicate: Option<Expr>,
    pub set: Vec<(String, Expr)>,
}

impl MergeClause {
    pub fn matched_update(
        set: impl IntoIterator<Item = (impl Into<String>, impl Into<Expr>)>,
    ) -> Self {
        Self::with_kind(MergeClauseKind::Update, set)
    }

    pub fn matched_delete() -> Self {
        Self {
            kind: MergeClauseKind::Delete,
            predicate: None,
            set: Vec::new(),
        }
    }

    pub fn not_matched_insert(
        set: impl IntoIterator<Item = (impl Into<String>, impl Into<Expr>)>,
    ) -> Self {
        Self::with_kind(MergeClauseKind::Insert, set)
    }

    fn with_kind(
        kind: MergeClauseKind,
        set: impl IntoIterator<Item = (impl Into<String>, impl Into<Expr>)>,
    ) -> Self {
        Self {
            kind,
            predicate: None,
            set: set.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Add an `AND predicate` condition (ANDed with any existing one).
    pub fn filter(mut self, predicate: Expr) -> Self {
        self.predicate = Some(and_filter(self.predicate.take(), predicate));
        self
    }

    /// Assign one more column. Re-assigning a column replaces its value.
    pub fn value(mut self, column: impl Into<String>, expr: impl Into<Expr>) -> Self {
        let column = column.into();
        let expr = expr.into();
        match self.set.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = expr,
            None => self.set.push((column, expr)),
        }
        self
    }

    pub fn to_tokens(&self, opts: RenderOptions) -> CompileResult<TokenStream> {
        if self.kind != MergeClauseKind::Delete && self.set.is_empty() {
            return Err(CompileError::EmptyMergeClause {
                kind: self.kind.keyword(),
            });
        }

        let mut ts = TokenStream::new();
        ts.push(Token::When).space();
        if self.kind == MergeClauseKind::Insert {
            ts.push(Token::Not).space();
        }
        ts.push(Token::Matched);

        if let Some(ref predicate) = self.predicate {
            ts.space()
                .push(Token::And)
                .space()
                .append(&predicate.to_tokens());
        }

        ts.space().push(Token::Then).space();

        let assignments = ordered(&self.set, opts);
        match self.kind {
            MergeClauseKind::Update => {
                ts.push(Token::Update).space().push(Token::Set).space();
                for (i, (col, expr)) in assignments.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.push(Token::ident(col.as_str()))
                        .space()
                        .push(Token::Eq)
                        .space()
                        .append(&expr.to_tokens());
                }
            }
            MergeClauseKind::Delete => {
                ts.push(Token::Delete);
            }
            MergeClauseKind::Insert => {
                ts.push(Token::Insert).space().lparen();
                for (i, (col, _)) in assignments.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.push(Token::ident(col.as_str()));
                }
                ts.rparen().space().push(Token::Values).space().lparen();
                for (i, (_, expr)) in assignments.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&expr.to_tokens());
                }
                ts.rparen();
            }
        }

        Ok(ts)
    }
}

impl MergeInto {
    /// Create a MERGE of `source` into `target` matched on `on`.
    pub fn new(target: impl Into<TableRef>, source: impl Into<MergeSource>, on: Expr) -> Self {
        Self {
            target: target.into(),
            source: source.into(),
            on,
            clauses: Vec::new(),
        }
    }

    /// Append a clause.
    pub fn when(mut self, clause: MergeClause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Append `WHEN MATCHED THEN UPDATE SET ...`.
    pub fn when_matched_then_update(
        self,
        set: impl IntoIterator<Item = (impl Into<String>, impl Into<Expr>)>,
    ) -> Self {
        self.when(MergeClause::matched_update(set))
    }

    /// Append `WHEN MATCHED THEN DELETE`.
    pub fn when_matched_then_delete(self) -> Self {
        self.when(MergeClause::matched_delete())
    }

    /// Append `WHEN NOT MATCHED THEN INSERT (...) VALUES (...)`.
    pub fn when_not_matched_then_insert(
        self,
        set: impl IntoIterator<Item = (impl Into<String>, impl Into<Expr>)>,
    ) -> Self {
        self.when(MergeClause::not_matched_insert(set))
    }

    pub fn to_sql(&self, opts: RenderOptions) -> CompileResult<String> {
        Ok(self.to_tokens(opts)?.serialize(opts))
    }

    pub fn to_tokens(&self, opts: RenderOptions) -> CompileResult<TokenStream> {
        let mut ts = TokenStream::new();

        ts.push(Token::Merge).space().push(Token::Into).space();
        ts.append(&self.target.to_tokens());

        ts.space().push(Token::Using).space();
        ts.append(&self.source.to_tokens());

        ts.space().push(Token::On).space().append(&self.on.to_tokens());

        for clause in &self.clauses {
            ts.space().append(&clause.to_tokens(opts)?);
        }

        Ok(ts)
    }
}

// ============================================================================
// Tests
// ============================================================================
