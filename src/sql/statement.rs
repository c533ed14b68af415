//! The statement sum type and its compilation entry point.
//!
//! Every statement kind has exactly one render function; `Statement::render`
//! is an exhaustive `match`, so adding a variant without a renderer does not
//! compile.

use super::copy::CopyInto;
use super::ddl::{AlterTable, CreateIndex, CreateTable, DropIndex, DropTable};
use super::dml::{Delete, Insert, MergeInto, Update};
use super::error::CompileResult;
use super::query::Query;
use super::render::RenderOptions;
use super::stage::{CreateFileFormat, CreateStage};

/// Any statement the compiler can render.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Query(Box<Query>),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Merge(MergeInto),
    Copy(CopyInto),
    CreateTable(CreateTable),
    AlterTable(AlterTable),
    DropTable(DropTable),
    CreateIndex(CreateIndex),
    DropIndex(DropIndex),
    CreateStage(CreateStage),
    CreateFileFormat(CreateFileFormat),
}

/// Rendered SQL plus the execution hints derived from the statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStatement {
    pub sql: String,
    /// `%` was doubled while rendering; the driver must interpolate
    /// parameters even when none are given.
    pub escape_percent: bool,
    /// `Some(true)` for data-modifying statements, `None` when the text
    /// should decide.
    pub autocommit: Option<bool>,
    /// A multi-row INSERT, eligible for batched execution.
    pub is_insert: bool,
}

impl Statement {
    pub fn render(&self, opts: RenderOptions) -> CompileResult<String> {
        match self {
            Statement::Query(query) => Ok(query.to_sql(opts)),
            Statement::Insert(insert) => Ok(insert.to_sql(opts)),
            Statement::Update(update) => Ok(update.to_sql(opts)),
            Statement::Delete(delete) => Ok(delete.to_sql(opts)),
            Statement::Merge(merge) => merge.to_sql(opts),
            Statement::Copy(copy) => Ok(copy.to_sql(opts)),
            Statement::CreateTable(create) => create.to_sql(opts),
            Statement::AlterTable(alter) => alter.to_sql(opts),
            Statement::DropTable(drop) => Ok(drop.to_sql(opts)),
            Statement::CreateIndex(create) => create.to_sql(opts),
            Statement::DropIndex(drop) => drop.to_sql(opts),
            Statement::CreateStage(create) => Ok(create.to_sql(opts)),
            Statement::CreateFileFormat(create) => create.to_sql(opts),
        }
    }

    /// Whether the statement modifies data and should commit on success.
    pub fn is_dml(&self) -> bool {
        matches!(
            self,
            Statement::Insert(_)
                | Statement::Update(_)
                | Statement::Delete(_)
                | Statement::Merge(_)
                | Statement::Copy(_)
        )
    }

    pub fn compile(&self, opts: RenderOptions) -> CompileResult<CompiledStatement> {
        Ok(CompiledStatement {
            sql: self.render(opts)?,
            escape_percent: opts.escape_percent,
            autocommit: self.is_dml().then_some(true),
            is_insert: matches!(self, Statement::Insert(insert) if insert.is_multi_row()),
        })
    }
}

macro_rules! statement_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Statement {
                fn from(node: $ty) -> Self {
                    Statement::$variant(node)
                }
            }
        )*
    };
}

statement_from!(
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Merge(MergeInto),
    Copy(CopyInto),
    CreateTable(CreateTable),
    AlterTable(AlterTable),
    DropTable(DropTable),
    CreateIndex(CreateIndex),
    DropIndex(DropIndex),
    CreateStage(CreateStage),
    CreateFileFormat(CreateFileFormat),
);

impl From<Query> for Statement {
    fn from(query: Query) -> Self {
        Statement::Query(Box::new(query))
    }
}
