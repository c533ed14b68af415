//! Scalar expressions used in predicates, assignments, defaults and select
//! lists.

use super::identifier::Ident;
use super::token::{Token, TokenStream};
use super::types::DataType;

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `[table.]column`
    Column {
        table: Option<Ident>,
        column: Ident,
    },

    Literal(Literal),

    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// `NAME(args...)`
    Function { name: String, args: Vec<Expr> },

    /// `CAST(expr AS type)`
    Cast {
        expr: Box<Expr>,
        data_type: DataType,
    },

    /// `IS NULL` / `IS NOT NULL`
    IsNull { expr: Box<Expr>, negated: bool },

    /// `REGEXP_LIKE(expr, pattern[, flags])`, optionally negated with `NOT`.
    RegexpMatch {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        flags: Option<String>,
        negated: bool,
    },

    /// `REGEXP_REPLACE(expr, pattern, replacement[, flags])`.
    RegexpReplace {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        replacement: Box<Expr>,
        flags: Option<String>,
    },

    /// `<sequence>.nextval`
    NextValue {
        schema: Option<Ident>,
        sequence: Ident,
    },

    /// Raw SQL passed to the output unchanged.
    ///
    /// **Never pass user input here.** The text is not escaped.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
    Plus,
    Minus,
    Mul,
    Div,
    /// Rendered `%`, or `%%` when percent escaping is on.
    Mod,
}

impl BinaryOperator {
    fn token(self) -> Token {
        match self {
            BinaryOperator::Eq => Token::Eq,
            BinaryOperator::Ne => Token::Ne,
            BinaryOperator::Lt => Token::Lt,
            BinaryOperator::Gt => Token::Gt,
            BinaryOperator::Lte => Token::Lte,
            BinaryOperator::Gte => Token::Gte,
            BinaryOperator::And => Token::And,
            BinaryOperator::Or => Token::Or,
            BinaryOperator::Plus => Token::Plus,
            BinaryOperator::Minus => Token::Minus,
            BinaryOperator::Mul => Token::Mul,
            BinaryOperator::Div => Token::Div,
            BinaryOperator::Mod => Token::Mod,
        }
    }
}

impl Literal {
    fn token(&self) -> Token {
        match self {
            Literal::Int(n) => Token::LitInt(*n),
            Literal::Float(f) => Token::LitFloat(*f),
            Literal::String(s) => Token::LitString(s.clone()),
            Literal::Bool(b) => Token::LitBool(*b),
            Literal::Null => Token::LitNull,
        }
    }
}

/// `NAME(arg, arg, ...)` with an optional trailing string flags argument.
fn push_call<'a>(
    ts: &mut TokenStream,
    name: &str,
    args: impl IntoIterator<Item = &'a Expr>,
    flags: Option<&String>,
) {
    ts.push(Token::FunctionName(name.to_string())).lparen();
    for (i, arg) in args.into_iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.append(&arg.to_tokens());
    }
    if let Some(flags) = flags {
        ts.comma().space().push(Token::LitString(flags.clone()));
    }
    ts.rparen();
}

impl Expr {
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { table, column } => {
                if let Some(table) = table {
                    ts.push(Token::Ident(table.clone())).push(Token::Dot);
                }
                ts.push(Token::Ident(column.clone()));
            }
            Expr::Literal(lit) => {
                ts.push(lit.token());
            }
            Expr::BinaryOp { left, op, right } => {
                ts.append(&left.to_tokens())
                    .space()
                    .push(op.token())
                    .space()
                    .append(&right.to_tokens());
            }
            Expr::Function { name, args } => push_call(&mut ts, name, args, None),
            Expr::Cast { expr, data_type } => {
                ts.push(Token::FunctionName("CAST".into()))
                    .lparen()
                    .append(&expr.to_tokens())
                    .space()
                    .push(Token::As)
                    .space()
                    .raw(data_type.compile())
                    .rparen();
            }
            Expr::IsNull { expr, negated } => {
                ts.append(&expr.to_tokens()).space().push(if *negated {
                    Token::IsNotNull
                } else {
                    Token::IsNull
                });
            }
            Expr::RegexpMatch {
                expr,
                pattern,
                flags,
                negated,
            } => {
                if *negated {
                    ts.push(Token::Not).space();
                }
                push_call(&mut ts, "REGEXP_LIKE", [&**expr, &**pattern], flags.as_ref());
            }
            Expr::RegexpReplace {
                expr,
                pattern,
                replacement,
                flags,
            } => push_call(
                &mut ts,
                "REGEXP_REPLACE",
                [&**expr, &**pattern, &**replacement],
                flags.as_ref(),
            ),
            Expr::NextValue { schema, sequence } => {
                if let Some(schema) = schema {
                    ts.push(Token::Ident(schema.clone())).push(Token::Dot);
                }
                ts.push(Token::Ident(sequence.clone())).raw(".nextval");
            }
            Expr::Raw(sql) => {
                ts.raw(sql.clone());
            }
        }

        ts
    }
}

pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.into(),
    }
}

/// `table.column`
pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: Some(table.into()),
        column: column.into(),
    }
}

pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

/// A float literal. NaN and the infinities render as `'NaN'::FLOAT` and
/// `'inf'::FLOAT` / `'-inf'::FLOAT`.
pub fn lit_float(f: f64) -> Expr {
    Expr::Literal(Literal::Float(f))
}

pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

pub fn lit_bool(b: bool) -> Expr {
    Expr::Literal(Literal::Bool(b))
}

pub fn lit_null() -> Expr {
    Expr::Literal(Literal::Null)
}

pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

pub fn cast(expr: Expr, data_type: DataType) -> Expr {
    Expr::Cast {
        expr: Box::new(expr),
        data_type,
    }
}

/// `[schema.]sequence.nextval`
pub fn next_value(schema: Option<&str>, sequence: &str) -> Expr {
    Expr::NextValue {
        schema: schema.map(Ident::from),
        sequence: sequence.into(),
    }
}

/// Raw SQL expression. **Never pass user input here.**
pub fn raw_sql(sql: &str) -> Expr {
    Expr::Raw(sql.into())
}

/// Fluent operators on anything that converts into an [`Expr`].
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    fn binary(self, op: BinaryOperator, other: impl Into<Expr>) -> Expr {
        Expr::BinaryOp {
            left: Box::new(self.into_expr()),
            op,
            right: Box::new(other.into()),
        }
    }

    fn eq(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Eq, other)
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Ne, other)
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gt, other)
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gte, other)
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lt, other)
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lte, other)
    }

    fn and(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::And, other)
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Or, other)
    }

    fn add(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Plus, other)
    }

    fn sub(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Minus, other)
    }

    fn modulo(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Mod, other)
    }

    fn regexp_match(self, pattern: impl Into<Expr>, flags: Option<&str>) -> Expr {
        Expr::RegexpMatch {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            flags: flags.map(str::to_string),
            negated: false,
        }
    }

    fn not_regexp_match(self, pattern: impl Into<Expr>, flags: Option<&str>) -> Expr {
        Expr::RegexpMatch {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            flags: flags.map(str::to_string),
            negated: true,
        }
    }

    fn regexp_replace(
        self,
        pattern: impl Into<Expr>,
        replacement: impl Into<Expr>,
        flags: Option<&str>,
    ) -> Expr {
        Expr::RegexpReplace {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            replacement: Box::new(replacement.into()),
            flags: flags.map(str::to_string),
        }
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: false,
        }
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: true,
        }
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        lit_int(n.into())
    }
}

impl From<f64> for Expr {
    fn from(f: f64) -> Self {
        lit_float(f)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(Literal::String(s))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        lit_bool(b)
    }
}
