//! DDL (Data Definition Language) support.
//!
//! Builders for CREATE / ALTER / DROP TABLE, including the warehouse's
//! dynamic, iceberg and hybrid table kinds, and the index statements that
//! only hybrid tables accept.
//!
//! # Examples
//!
//! ```ignore
//! use snowflake_dialect::sql::ddl::{CreateTable, ColumnDef, TableConstraint};
//! use snowflake_dialect::sql::types::DataType;
//!
//! let table = CreateTable::hybrid("users")
//!     .column(ColumnDef::new("id", DataType::Integer).not_null().autoincrement())
//!     .column(ColumnDef::new("name", DataType::Varchar(None)))
//!     .constraint(TableConstraint::primary_key(["id"]));
//!
//! println!("{}", table.to_sql(RenderOptions::default())?);
//! ```

use super::error::{CompileError, CompileResult, TableValidationError};
use super::expr::Expr;
use super::identifier::Ident;
use super::query::{Query, TableRef};
use super::render::RenderOptions;
use super::table_options::{sort_options, TableOption, TableOptionResult};
use super::token::{Token, TokenStream};
use super::types::DataType;

// ============================================================================
// Table kinds
// ============================================================================

/// Storage flavour of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableKind {
    #[default]
    Standard,
    Dynamic,
    Iceberg,
    /// Row-store table with enforced keys and secondary indexes.
    Hybrid,
}

impl TableKind {
    pub fn supports_indexes(self) -> bool {
        self == TableKind::Hybrid
    }

    fn token(self) -> Option<Token> {
        match self {
            TableKind::Standard => None,
            TableKind::Dynamic => Some(Token::Dynamic),
            TableKind::Iceberg => Some(Token::Iceberg),
            TableKind::Hybrid => Some(Token::Hybrid),
        }
    }
}

/// `TEMPORARY` / `TRANSIENT` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableLifetime {
    #[default]
    Permanent,
    Temporary,
    Transient,
}

// ============================================================================
// CREATE TABLE
// ============================================================================

/// CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct CreateTable {
    pub table: TableRef,
    pub kind: TableKind,
    pub lifetime: TableLifetime,
    pub or_replace: bool,
    pub if_not_exists: bool,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<TableConstraint>,
    pub cluster_by: Vec<Expr>,
    /// Options as built; rejected ones surface when the table is rendered.
    pub options: Vec<TableOptionResult>,
}

impl CreateTable {
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            kind: TableKind::Standard,
            lifetime: TableLifetime::Permanent,
            or_replace: false,
            if_not_exists: false,
            columns: Vec::new(),
            constraints: Vec::new(),
            cluster_by: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn dynamic(table: impl Into<TableRef>) -> Self {
        Self::new(table).kind(TableKind::Dynamic)
    }

    pub fn iceberg(table: impl Into<TableRef>) -> Self {
        Self::new(table).kind(TableKind::Iceberg)
    }

    pub fn hybrid(table: impl Into<TableRef>) -> Self {
        Self::new(table).kind(TableKind::Hybrid)
    }

    pub fn kind(mut self, kind: TableKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn temporary(mut self) -> Self {
        self.lifetime = TableLifetime::Temporary;
        self
    }

    pub fn transient(mut self) -> Self {
        self.lifetime = TableLifetime::Transient;
        self
    }

    pub fn or_replace(mut self) -> Self {
        self.or_replace = true;
        self
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn column(mut self, col: ColumnDef) -> Self {
        self.columns.push(col);
        self
    }

    pub fn columns(mut self, cols: impl IntoIterator<Item = ColumnDef>) -> Self {
        self.columns.extend(cols);
        self
    }

    pub fn constraint(mut self, constraint: TableConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn cluster_by(mut self, exprs: Vec<Expr>) -> Self {
        self.cluster_by = exprs;
        self
    }

    /// Add an option. Invalid options are kept and reported at render time.
    pub fn option(mut self, option: TableOptionResult) -> Self {
        self.options.push(option);
        self
    }

    /// `AS <query>`.
    pub fn as_query(self, query: Query) -> Self {
        self.option(TableOption::as_query(query))
    }

    fn has_option(&self, name: &str) -> bool {
        self.options
            .iter()
            .any(|o| matches!(o, Ok(opt) if opt.name() == name))
    }

    fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|c| c.primary_key)
            || self
                .constraints
                .iter()
                .any(|c| matches!(c, TableConstraint::PrimaryKey { .. }))
    }

    fn table_name(&self) -> String {
        self.table.name_tokens().serialize(RenderOptions::default())
    }

    /// Check every option and the table-kind requirements, collecting all
    /// problems into one error.
    pub fn validate(&self) -> Result<(), TableValidationError> {
        let mut problems: Vec<String> = self
            .options
            .iter()
            .filter_map(|o| o.as_ref().err())
            .map(|e| e.to_string())
            .collect();

        match self.kind {
            TableKind::Dynamic => {
                for required in ["WAREHOUSE", "TARGET_LAG"] {
                    if !self.has_option(required) {
                        problems.push(format!("dynamic tables require a {} option", required));
                    }
                }
                if !self.has_option("AS") {
                    problems.push("dynamic tables require an AS query".to_string());
                }
            }
            TableKind::Iceberg => {
                for required in ["EXTERNAL_VOLUME", "BASE_LOCATION"] {
                    if !self.has_option(required) {
                        problems.push(format!("iceberg tables require a {} option", required));
                    }
                }
            }
            TableKind::Hybrid => {
                if !self.has_primary_key() {
                    problems.push("hybrid tables require a primary key".to_string());
                }
            }
            TableKind::Standard => {}
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(TableValidationError {
                table: self.table_name(),
                problems,
            })
        }
    }

    pub fn to_sql(&self, opts: RenderOptions) -> CompileResult<String> {
        Ok(self.to_tokens()?.serialize(opts))
    }

    pub fn to_tokens(&self) -> CompileResult<TokenStream> {
        if !self.kind.supports_indexes()
            && self
                .constraints
                .iter()
                .any(|c| matches!(c, TableConstraint::Index { .. }))
        {
            return Err(CompileError::IndexesNotSupported {
                table: self.table_name(),
            });
        }
        self.validate()?;

        let mut ts = TokenStream::new();

        ts.push(Token::Create).space();
        if self.or_replace {
            ts.push(Token::Or).space().push(Token::Replace).space();
        }
        match self.lifetime {
            TableLifetime::Permanent => {}
            TableLifetime::Temporary => {
                ts.push(Token::Temporary).space();
            }
            TableLifetime::Transient => {
                ts.push(Token::Transient).space();
            }
        }
        if let Some(kind) = self.kind.token() {
            ts.push(kind).space();
        }
        ts.push(Token::Table).space();
        if self.if_not_exists {
            ts.push(Token::If)
                .space()
                .push(Token::Not)
                .space()
                .push(Token::Exists)
                .space();
        }
        ts.append(&self.table.name_tokens());

        if !self.columns.is_empty() || !self.constraints.is_empty() {
            ts.space().lparen();
            let mut first = true;
            for col in &self.columns {
                if !first {
                    ts.comma().space();
                }
                first = false;
                ts.append(&col.to_tokens()?);
            }
            for constraint in &self.constraints {
                if !first {
                    ts.comma().space();
                }
                first = false;
                ts.append(&constraint.to_tokens());
            }
            ts.rparen();
        }

        if !self.cluster_by.is_empty() {
            ts.space().append(&cluster_by_tokens(&self.cluster_by));
        }

        let mut options: Vec<&TableOption> =
            self.options.iter().filter_map(|o| o.as_ref().ok()).collect();
        sort_options(&mut options);
        for option in options {
            ts.space().append(&option.to_tokens());
        }

        Ok(ts)
    }
}

fn cluster_by_tokens(exprs: &[Expr]) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::ClusterBy).space().lparen();
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.append(&expr.to_tokens());
    }
    ts.rparen();
    ts
}

// ============================================================================
// Column Definition
// ============================================================================

/// `IDENTITY(start, increment) [ORDER | NOORDER]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    pub start: i64,
    pub increment: i64,
    /// `Some(true)` for ORDER, `Some(false)` for NOORDER.
    pub order: Option<bool>,
}

impl Identity {
    pub fn new(start: i64, increment: i64) -> Self {
        Self {
            start,
            increment,
            order: None,
        }
    }

    pub fn ordered(mut self, order: bool) -> Self {
        self.order = Some(order);
        self
    }
}

/// Column definition for CREATE TABLE / ADD COLUMN.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct ColumnDef {
    pub name: Ident,
    pub data_type: DataType,
    pub nullable: Option<bool>,
    pub default: Option<Expr>,
    pub autoincrement: bool,
    pub identity: Option<Identity>,
    pub primary_key: bool,
    pub unique: bool,
    pub comment: Option<String>,
}

impl ColumnDef {
    pub fn new(name: impl Into<Ident>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: None,
            default: None,
            autoincrement: false,
            identity: None,
            primary_key: false,
            unique: false,
            comment: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = Some(false);
        self
    }

    pub fn null(mut self) -> Self {
        self.nullable = Some(true);
        self
    }

    pub fn default(mut self, expr: Expr) -> Self {
        self.default = Some(expr);
        self
    }

    /// Plain `AUTOINCREMENT`.
    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn to_tokens(&self) -> CompileResult<TokenStream> {
        if self.data_type.is_unknown() {
            return Err(CompileError::UnsupportedType {
                column: self.name.as_str().to_string(),
            });
        }

        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.name.clone()))
            .space()
            .raw(self.data_type.compile());

        match self.nullable {
            Some(false) => {
                ts.space().push(Token::Not).space().push(Token::Null);
            }
            Some(true) => {
                ts.space().push(Token::Null);
            }
            None => {}
        }

        if let Some(ref expr) = self.default {
            ts.space()
                .push(Token::Default)
                .space()
                .append(&expr.to_tokens());
        }

        if let Some(identity) = self.identity {
            ts.space()
                .push(Token::Identity)
                .lparen()
                .push(Token::LitInt(identity.start))
                .comma()
                .space()
                .push(Token::LitInt(identity.increment))
                .rparen();
            match identity.order {
                Some(true) => {
                    ts.space().push(Token::Order);
                }
                Some(false) => {
                    ts.space().push(Token::NoOrder);
                }
                None => {}
            }
        } else if self.autoincrement {
            ts.space().push(Token::Autoincrement);
        }

        if self.primary_key {
            ts.space().push(Token::Primary).space().push(Token::Key);
        }
        if self.unique {
            ts.space().push(Token::Unique);
        }

        if let Some(ref comment) = self.comment {
            ts.space()
                .push(Token::Comment)
                .space()
                .push(Token::LitString(comment.clone()));
        }

        Ok(ts)
    }
}

// ============================================================================
// Table Constraints
// ============================================================================

/// Table-level constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
    PrimaryKey {
        name: Option<Ident>,
        columns: Vec<Ident>,
    },
    Unique {
        name: Option<Ident>,
        columns: Vec<Ident>,
    },
    ForeignKey {
        name: Option<Ident>,
        columns: Vec<Ident>,
        references_table: TableRef,
        references_columns: Vec<Ident>,
        on_delete: Option<ReferentialAction>,
        on_update: Option<ReferentialAction>,
    },
    /// Inline secondary index, hybrid tables only.
    Index {
        name: Ident,
        columns: Vec<Ident>,
        include: Vec<Ident>,
    },
}

fn idents(columns: impl IntoIterator<Item = impl Into<Ident>>) -> Vec<Ident> {
    columns.into_iter().map(|c| c.into()).collect()
}

impl TableConstraint {
    pub fn primary_key(columns: impl IntoIterator<Item = impl Into<Ident>>) -> Self {
        TableConstraint::PrimaryKey {
            name: None,
            columns: idents(columns),
        }
    }

    pub fn primary_key_named(
        name: impl Into<Ident>,
        columns: impl IntoIterator<Item = impl Into<Ident>>,
    ) -> Self {
        TableConstraint::PrimaryKey {
            name: Some(name.into()),
            columns: idents(columns),
        }
    }

    pub fn unique(columns: impl IntoIterator<Item = impl Into<Ident>>) -> Self {
        TableConstraint::Unique {
            name: None,
            columns: idents(columns),
        }
    }

    pub fn foreign_key(
        columns: impl IntoIterator<Item = impl Into<Ident>>,
        references_table: impl Into<TableRef>,
        references_columns: impl IntoIterator<Item = impl Into<Ident>>,
    ) -> Self {
        TableConstraint::ForeignKey {
            name: None,
            columns: idents(columns),
            references_table: references_table.into(),
            references_columns: idents(references_columns),
            on_delete: None,
            on_update: None,
        }
    }

    pub fn index(
        name: impl Into<Ident>,
        columns: impl IntoIterator<Item = impl Into<Ident>>,
    ) -> Self {
        TableConstraint::Index {
            name: name.into(),
            columns: idents(columns),
            include: Vec::new(),
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            TableConstraint::PrimaryKey { name, columns } => {
                emit_constraint_name(&mut ts, name);
                ts.push(Token::Primary).space().push(Token::Key).space();
                emit_column_list(&mut ts, columns);
            }
            TableConstraint::Unique { name, columns } => {
                emit_constraint_name(&mut ts, name);
                ts.push(Token::Unique).space();
                emit_column_list(&mut ts, columns);
            }
            TableConstraint::ForeignKey {
                name,
                columns,
                references_table,
                references_columns,
                on_delete,
                on_update,
            } => {
                emit_constraint_name(&mut ts, name);
                ts.push(Token::Foreign).space().push(Token::Key).space();
                emit_column_list(&mut ts, columns);
                ts.space()
                    .push(Token::References)
                    .space()
                    .append(&references_table.name_tokens())
                    .space();
                emit_column_list(&mut ts, references_columns);

                if let Some(action) = on_delete {
                    ts.space()
                        .push(Token::On)
                        .space()
                        .push(Token::Delete)
                        .space()
                        .push(action.token());
                }
                if let Some(action) = on_update {
                    ts.space()
                        .push(Token::On)
                        .space()
                        .push(Token::Update)
                        .space()
                        .push(action.token());
                }
            }
            TableConstraint::Index {
                name,
                columns,
                include,
            } => {
                ts.push(Token::Index)
                    .space()
                    .push(Token::Ident(name.clone()))
                    .space();
                emit_column_list(&mut ts, columns);
                if !include.is_empty() {
                    ts.space().push(Token::Include).space();
                    emit_column_list(&mut ts, include);
                }
            }
        }

        ts
    }
}

/// Referential action for foreign key constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    fn token(self) -> Token {
        match self {
            ReferentialAction::NoAction => Token::NoAction,
            ReferentialAction::Restrict => Token::Restrict,
            ReferentialAction::Cascade => Token::Cascade,
            ReferentialAction::SetNull => Token::SetNull,
            ReferentialAction::SetDefault => Token::SetDefault,
        }
    }
}

// ============================================================================
// ALTER TABLE
// ============================================================================

/// ALTER TABLE statement with a single action.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct AlterTable {
    pub table: TableRef,
    pub action: AlterAction,
}

/// ALTER TABLE actions.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterAction {
    AddColumn(ColumnDef),
    DropColumn(Ident),
    RenameColumn { from: Ident, to: Ident },
    /// `SET COMMENT = '...'`
    SetComment(String),
    /// `UNSET COMMENT`
    UnsetComment,
    /// `ALTER <col> COMMENT '...'`
    SetColumnComment { column: Ident, comment: String },
    /// `ALTER <col> UNSET COMMENT`
    UnsetColumnComment(Ident),
    ClusterBy(Vec<Expr>),
}

impl AlterTable {
    pub fn new(table: impl Into<TableRef>, action: AlterAction) -> Self {
        Self {
            table: table.into(),
            action,
        }
    }

    pub fn add_column(table: impl Into<TableRef>, column: ColumnDef) -> Self {
        Self::new(table, AlterAction::AddColumn(column))
    }

    pub fn drop_column(table: impl Into<TableRef>, column: impl Into<Ident>) -> Self {
        Self::new(table, AlterAction::DropColumn(column.into()))
    }

    pub fn rename_column(
        table: impl Into<TableRef>,
        from: impl Into<Ident>,
        to: impl Into<Ident>,
    ) -> Self {
        Self::new(
            table,
            AlterAction::RenameColumn {
                from: from.into(),
                to: to.into(),
            },
        )
    }

    /// Set the table comment, or remove it with `None`.
    pub fn comment(table: impl Into<TableRef>, comment: Option<&str>) -> Self {
        let action = match comment {
            Some(text) => AlterAction::SetComment(text.to_string()),
            None => AlterAction::UnsetComment,
        };
        Self::new(table, action)
    }

    /// Set a column comment, or remove it with `None`.
    pub fn column_comment(
        table: impl Into<TableRef>,
        column: impl Into<Ident>,
        comment: Option<&str>,
    ) -> Self {
        let column = column.into();
        let action = match comment {
            Some(text) => AlterAction::SetColumnComment {
                column,
                comment: text.to_string(),
            },
            None => AlterAction::UnsetColumnComment(column),
        };
        Self::new(table, action)
    }

    pub fn cluster_by(table: impl Into<TableRef>, exprs: Vec<Expr>) -> Self {
        Self::new(table, AlterAction::ClusterBy(exprs))
    }

    pub fn to_sql(&self, opts: RenderOptions) -> CompileResult<String> {
        Ok(self.to_tokens()?.serialize(opts))
    }

    pub fn to_tokens(&self) -> CompileResult<TokenStream> {
        let mut ts = TokenStream::new();

        ts.push(Token::Alter).space().push(Token::Table).space();
        ts.append(&self.table.name_tokens()).space();

        match &self.action {
            AlterAction::AddColumn(col) => {
                ts.push(Token::Add)
                    .space()
                    .push(Token::Column)
                    .space()
                    .append(&col.to_tokens()?);
            }
            AlterAction::DropColumn(name) => {
                ts.push(Token::Drop)
                    .space()
                    .push(Token::Column)
                    .space()
                    .push(Token::Ident(name.clone()));
            }
            AlterAction::RenameColumn { from, to } => {
                ts.push(Token::Rename)
                    .space()
                    .push(Token::Column)
                    .space()
                    .push(Token::Ident(from.clone()))
                    .space()
                    .push(Token::To)
                    .space()
                    .push(Token::Ident(to.clone()));
            }
            AlterAction::SetComment(comment) => {
                ts.push(Token::Set)
                    .space()
                    .push(Token::Comment)
                    .space()
                    .push(Token::Eq)
                    .space()
                    .push(Token::LitString(comment.clone()));
            }
            AlterAction::UnsetComment => {
                ts.push(Token::Unset).space().push(Token::Comment);
            }
            AlterAction::SetColumnComment { column, comment } => {
                ts.push(Token::Alter)
                    .space()
                    .push(Token::Ident(column.clone()))
                    .space()
                    .push(Token::Comment)
                    .space()
                    .push(Token::LitString(comment.clone()));
            }
            AlterAction::UnsetColumnComment(column) => {
                ts.push(Token::Alter)
                    .space()
                    .push(Token::Ident(column.clone()))
                    .space()
                    .push(Token::Unset)
                    .space()
                    .push(Token::Comment);
            }
            AlterAction::ClusterBy(exprs) => {
                ts.append(&cluster_by_tokens(exprs));
            }
        }

        Ok(ts)
    }
}

// ============================================================================
// DROP TABLE
// ============================================================================

/// DROP TABLE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct DropTable {
    pub if_exists: bool,
    pub table: TableRef,
    pub cascade: Option<bool>,
}

impl DropTable {
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            if_exists: false,
            table: table.into(),
            cascade: None,
        }
    }

    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    pub fn cascade(mut self) -> Self {
        self.cascade = Some(true);
        self
    }

    pub fn restrict(mut self) -> Self {
        self.cascade = Some(false);
        self
    }

    pub fn to_sql(&self, opts: RenderOptions) -> String {
        self.to_tokens().serialize(opts)
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Drop).space().push(Token::Table);
        if self.if_exists {
            ts.space().push(Token::If).space().push(Token::Exists);
        }
        ts.space().append(&self.table.name_tokens());

        match self.cascade {
            Some(true) => {
                ts.space().push(Token::Cascade);
            }
            Some(false) => {
                ts.space().push(Token::Restrict);
            }
            None => {}
        }

        ts
    }
}

// ============================================================================
// CREATE / DROP INDEX
// ============================================================================

/// CREATE INDEX statement. Only hybrid tables accept indexes.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct CreateIndex {
    pub if_not_exists: bool,
    pub name: Ident,
    pub table: TableRef,
    pub table_kind: TableKind,
    pub columns: Vec<Ident>,
    pub include: Vec<Ident>,
}

impl CreateIndex {
    pub fn new(name: impl Into<Ident>, table: impl Into<TableRef>, table_kind: TableKind) -> Self {
        Self {
            if_not_exists: false,
            name: name.into(),
            table: table.into(),
            table_kind,
            columns: Vec::new(),
            include: Vec::new(),
        }
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn columns(mut self, cols: impl IntoIterator<Item = impl Into<Ident>>) -> Self {
        self.columns.extend(idents(cols));
        self
    }

    pub fn include(mut self, cols: impl IntoIterator<Item = impl Into<Ident>>) -> Self {
        self.include.extend(idents(cols));
        self
    }

    pub fn to_sql(&self, opts: RenderOptions) -> CompileResult<String> {
        Ok(self.to_tokens()?.serialize(opts))
    }

    pub fn to_tokens(&self) -> CompileResult<TokenStream> {
        if !self.table_kind.supports_indexes() {
            return Err(CompileError::IndexesNotSupported {
                table: self.table.name_tokens().serialize(RenderOptions::default()),
            });
        }

        let mut ts = TokenStream::new();
        ts.push(Token::Create).space().push(Token::Index);
        if self.if_not_exists {
            ts.space()
                .push(Token::If)
                .space()
                .push(Token::Not)
                .space()
                .push(Token::Exists);
        }
        ts.space()
            .push(Token::Ident(self.name.clone()))
            .space()
            .push(Token::On)
            .space()
            .append(&self.table.name_tokens())
            .space();
        emit_column_list(&mut ts, &self.columns);

        if !self.include.is_empty() {
            ts.space().push(Token::Include).space();
            emit_column_list(&mut ts, &self.include);
        }

        Ok(ts)
    }
}

/// `DROP INDEX [IF EXISTS] <table>.<index>`.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct DropIndex {
    pub if_exists: bool,
    pub name: Ident,
    pub table: TableRef,
    pub table_kind: TableKind,
}

impl DropIndex {
    pub fn new(name: impl Into<Ident>, table: impl Into<TableRef>, table_kind: TableKind) -> Self {
        Self {
            if_exists: false,
            name: name.into(),
            table: table.into(),
            table_kind,
        }
    }

    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    pub fn to_sql(&self, opts: RenderOptions) -> CompileResult<String> {
        Ok(self.to_tokens()?.serialize(opts))
    }

    pub fn to_tokens(&self) -> CompileResult<TokenStream> {
        if !self.table_kind.supports_indexes() {
            return Err(CompileError::IndexesNotSupported {
                table: self.table.name_tokens().serialize(RenderOptions::default()),
            });
        }

        let mut ts = TokenStream::new();
        ts.push(Token::Drop).space().push(Token::Index);
        if self.if_exists {
            ts.space().push(Token::If).space().push(Token::Exists);
        }
        ts.space()
            .append(&self.table.name_tokens())
            .push(Token::Dot)
            .push(Token::Ident(self.name.clone()));
        Ok(ts)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn emit_constraint_name(ts: &mut TokenStream, name: &Option<Ident>) {
    if let Some(n) = name {
        ts.push(Token::Constraint)
            .space()
            .push(Token::Ident(n.clone()))
            .space();
    }
}

fn emit_column_list(ts: &mut TokenStream, columns: &[Ident]) {
    ts.lparen();
    for (i, col) in columns.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.push(Token::Ident(col.clone()));
    }
    ts.rparen();
}

// ============================================================================
// Tests
// ============================================================================
