//! The SELECT shape embedded in other statements: MERGE sources,
//! `INSERT ... SELECT`, COPY sources and unloads, and `CREATE TABLE ... AS`.

use super::expr::{Expr, ExprExt};
use super::identifier::Ident;
use super::render::RenderOptions;
use super::token::{Token, TokenStream};

/// A SELECT list item with an optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<Ident>,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = self.expr.to_tokens();
        if let Some(alias) = &self.alias {
            push_alias(&mut ts, alias);
        }
        ts
    }
}

impl From<Expr> for SelectExpr {
    fn from(expr: Expr) -> Self {
        SelectExpr::new(expr)
    }
}

fn push_alias(ts: &mut TokenStream, alias: &Ident) {
    ts.space()
        .push(Token::As)
        .space()
        .push(Token::Ident(alias.clone()));
}

/// `[database.][schema.]table [AS alias]`
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub database: Option<Ident>,
    pub schema: Option<Ident>,
    pub table: Ident,
    pub alias: Option<Ident>,
}

impl TableRef {
    pub fn new(table: impl Into<Ident>) -> Self {
        Self {
            database: None,
            schema: None,
            table: table.into(),
            alias: None,
        }
    }

    pub fn with_database(mut self, database: impl Into<Ident>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<Ident>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<Ident>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The dotted name without the alias.
    pub fn name_tokens(&self) -> TokenStream {
        let parts = [&self.database, &self.schema]
            .into_iter()
            .flatten()
            .chain(std::iter::once(&self.table))
            .cloned()
            .collect();
        let mut ts = TokenStream::new();
        ts.push(Token::QualifiedIdent(parts));
        ts
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = self.name_tokens();
        if let Some(alias) = &self.alias {
            push_alias(&mut ts, alias);
        }
        ts
    }
}

impl From<&str> for TableRef {
    fn from(table: &str) -> Self {
        TableRef::new(table)
    }
}

/// `SELECT <list> [FROM <table>] [WHERE <predicate>] [GROUP BY <exprs>]`
///
/// The list is laid out one item per line; the clauses follow on their own
/// lines.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until rendered"]
pub struct Query {
    pub select: Vec<SelectExpr>,
    pub from: Option<TableRef>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, exprs: Vec<impl Into<SelectExpr>>) -> Self {
        self.select = exprs.into_iter().map(Into::into).collect();
        self
    }

    pub fn from(mut self, table: impl Into<TableRef>) -> Self {
        self.from = Some(table.into());
        self
    }

    /// Add a WHERE condition, ANDed with any existing one.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = exprs;
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Select);

        for (i, item) in self.select.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            ts.newline().indent(1).append(&item.to_tokens());
        }

        if let Some(from) = &self.from {
            ts.newline().push(Token::From).space().append(&from.to_tokens());
        }

        if let Some(predicate) = &self.where_clause {
            ts.newline()
                .push(Token::Where)
                .space()
                .append(&predicate.to_tokens());
        }

        for (i, expr) in self.group_by.iter().enumerate() {
            if i == 0 {
                ts.newline().push(Token::GroupBy).space();
            } else {
                ts.comma().space();
            }
            ts.append(&expr.to_tokens());
        }

        ts
    }

    pub fn to_sql(&self, opts: RenderOptions) -> String {
        self.to_tokens().serialize(opts)
    }
}
