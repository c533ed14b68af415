//! The atomic units of rendered SQL.
//!
//! Builders emit a [`TokenStream`]; the stream serializes to Snowflake text
//! under a set of [`RenderOptions`]. Adding a variant forces every
//! serializer arm to handle it.

use super::identifier::{Ident, IdentifierPreparer};
use super::render::{format_bool, quote_string, RenderOptions};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Query clauses and predicates
    Select,
    From,
    Where,
    GroupBy,
    As,
    On,
    And,
    Or,
    Not,
    Null,
    IsNull,
    IsNotNull,

    // DML
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    Using,
    Merge,
    Matched,
    When,
    Then,

    // Table DDL
    Create,
    Alter,
    Drop,
    Replace,
    If,
    Exists,
    Table,
    Column,
    Add,
    Rename,
    To,
    Comment,
    Unset,
    Default,
    Cascade,
    Restrict,

    // Table kinds and lifetimes
    Temporary,
    Transient,
    Dynamic,
    Iceberg,
    Hybrid,
    ClusterBy,

    // Columns, keys and indexes
    Autoincrement,
    Identity,
    Order,
    NoOrder,
    Constraint,
    Primary,
    Foreign,
    Key,
    Unique,
    References,
    NoAction,
    SetNull,
    SetDefault,
    Index,
    Include,

    // Loading and unloading
    Copy,
    PartitionBy,
    Stage,
    FileFormat,
    Url,

    // Punctuation
    Comma,
    Dot,
    LParen,
    RParen,

    // Operators
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Plus,
    Minus,
    Mul,
    Div,
    /// `%`, doubled when percent escaping is on.
    Mod,

    // Layout
    Space,
    Newline,
    Indent(usize),

    /// Identifier, quoted when required
    Ident(Ident),
    /// Dotted identifier: database.schema.table or any suffix of it
    QualifiedIdent(Vec<Ident>),
    LitInt(i64),
    LitFloat(f64),
    LitString(String),
    LitBool(bool),
    LitNull,
    /// Function name, rendered uppercase
    FunctionName(String),

    /// Text passed to the output unchanged: fragments this crate already
    /// rendered (stage references, URIs, compiled types).
    ///
    /// **Never pass user input here.**
    Raw(String),
}

impl Token {
    /// The fixed text of a keyword, operator or punctuation token.
    fn fixed(&self) -> Option<&'static str> {
        let text = match self {
            Token::Select => "SELECT",
            Token::From => "FROM",
            Token::Where => "WHERE",
            Token::GroupBy => "GROUP BY",
            Token::As => "AS",
            Token::On => "ON",
            Token::And => "AND",
            Token::Or => "OR",
            Token::Not => "NOT",
            Token::Null => "NULL",
            Token::IsNull => "IS NULL",
            Token::IsNotNull => "IS NOT NULL",

            Token::Insert => "INSERT",
            Token::Into => "INTO",
            Token::Values => "VALUES",
            Token::Update => "UPDATE",
            Token::Set => "SET",
            Token::Delete => "DELETE",
            Token::Using => "USING",
            Token::Merge => "MERGE",
            Token::Matched => "MATCHED",
            Token::When => "WHEN",
            Token::Then => "THEN",

            Token::Create => "CREATE",
            Token::Alter => "ALTER",
            Token::Drop => "DROP",
            Token::Replace => "REPLACE",
            Token::If => "IF",
            Token::Exists => "EXISTS",
            Token::Table => "TABLE",
            Token::Column => "COLUMN",
            Token::Add => "ADD",
            Token::Rename => "RENAME",
            Token::To => "TO",
            Token::Comment => "COMMENT",
            Token::Unset => "UNSET",
            Token::Default => "DEFAULT",
            Token::Cascade => "CASCADE",
            Token::Restrict => "RESTRICT",

            Token::Temporary => "TEMPORARY",
            Token::Transient => "TRANSIENT",
            Token::Dynamic => "DYNAMIC",
            Token::Iceberg => "ICEBERG",
            Token::Hybrid => "HYBRID",
            Token::ClusterBy => "CLUSTER BY",

            Token::Autoincrement => "AUTOINCREMENT",
            Token::Identity => "IDENTITY",
            Token::Order => "ORDER",
            Token::NoOrder => "NOORDER",
            Token::Constraint => "CONSTRAINT",
            Token::Primary => "PRIMARY",
            Token::Foreign => "FOREIGN",
            Token::Key => "KEY",
            Token::Unique => "UNIQUE",
            Token::References => "REFERENCES",
            Token::NoAction => "NO ACTION",
            Token::SetNull => "SET NULL",
            Token::SetDefault => "SET DEFAULT",
            Token::Index => "INDEX",
            Token::Include => "INCLUDE",

            Token::Copy => "COPY",
            Token::PartitionBy => "PARTITION BY",
            Token::Stage => "STAGE",
            Token::FileFormat => "FILE FORMAT",
            Token::Url => "URL",

            Token::Comma => ",",
            Token::Dot => ".",
            Token::LParen => "(",
            Token::RParen => ")",

            Token::Eq => "=",
            Token::Ne => "<>",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Lte => "<=",
            Token::Gte => ">=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Mul => "*",
            Token::Div => "/",

            Token::Space => " ",
            Token::Newline => "\n",
            Token::LitNull => "NULL",

            Token::Mod
            | Token::Indent(_)
            | Token::Ident(_)
            | Token::QualifiedIdent(_)
            | Token::LitInt(_)
            | Token::LitFloat(_)
            | Token::LitString(_)
            | Token::LitBool(_)
            | Token::FunctionName(_)
            | Token::Raw(_) => return None,
        };
        Some(text)
    }

    pub fn serialize(&self, opts: RenderOptions) -> String {
        match self {
            Token::Mod if opts.escape_percent => "%%".into(),
            Token::Mod => "%".into(),
            Token::Indent(n) => "  ".repeat(*n),
            Token::Ident(ident) => IdentifierPreparer.quote(ident),
            Token::QualifiedIdent(parts) => parts
                .iter()
                .map(|p| IdentifierPreparer.quote(p))
                .collect::<Vec<_>>()
                .join("."),
            Token::LitInt(n) => n.to_string(),
            // Non-finite values only exist as casts from their string spelling
            Token::LitFloat(f) if f.is_nan() => "'NaN'::FLOAT".into(),
            Token::LitFloat(f) if f.is_infinite() => {
                if f.is_sign_positive() {
                    "'inf'::FLOAT".into()
                } else {
                    "'-inf'::FLOAT".into()
                }
            }
            Token::LitFloat(f) => {
                let mut buffer = ryu::Buffer::new();
                buffer.format_finite(*f).to_string()
            }
            Token::LitString(s) => quote_string(s, opts),
            Token::LitBool(b) => format_bool(*b).into(),
            Token::FunctionName(name) => name.to_uppercase(),
            Token::Raw(s) => s.clone(),
            _ => self.fixed().unwrap_or_default().to_string(),
        }
    }

    /// Identifier token, quoted on render when required.
    pub fn ident(name: impl Into<Ident>) -> Self {
        Token::Ident(name.into())
    }
}

/// An ordered run of tokens with chainable push helpers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn serialize(&self, opts: RenderOptions) -> String {
        self.tokens.iter().map(|t| t.serialize(opts)).collect()
    }

    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }

    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }

    pub fn indent(&mut self, n: usize) -> &mut Self {
        self.push(Token::Indent(n))
    }

    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }

    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }

    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }

    pub fn raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.push(Token::Raw(sql.into()))
    }
}
