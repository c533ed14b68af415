//! Recursive-descent parser for Snowflake type strings.
//!
//! ```text
//! TYPE   := SCALAR | MAP(TYPE, NTYPE) | OBJECT(FIELD, ...) | OBJECT
//!         | ARRAY(NTYPE) | ARRAY | VECTOR(INT|FLOAT, n)
//! NTYPE  := TYPE [NOT NULL]
//! FIELD  := name TYPE [NOT NULL]
//! ```
//!
//! Parsing never fails: an unrecognized keyword yields [`DataType::Null`],
//! and any unrecognized component makes its enclosing structured type
//! [`DataType::Null`] as well.

use super::types::{DataType, ObjectField, VectorElement};

const NOT_NULL_SUFFIX: &str = " NOT NULL";

/// Split `text` on `separator`, ignoring separators nested inside parentheses.
///
/// Tokens are trimmed and empty tokens are dropped.
pub fn tokenize_parameters(text: &str, separator: char) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for ch in text.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            c if c == separator && depth <= 0 => {
                push_token(&mut tokens, &current);
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    push_token(&mut tokens, &current);
    tokens
}

/// [`tokenize_parameters`] with `,` as the separator.
pub fn tokenize_parameters_default(text: &str) -> Vec<String> {
    tokenize_parameters(text, ',')
}

fn push_token(tokens: &mut Vec<String>, raw: &str) {
    let token = raw.trim();
    if !token.is_empty() {
        tokens.push(token.to_string());
    }
}

/// Parse a type string such as `MAP(NUMBER(10,0), VARCHAR NOT NULL)`.
pub fn parse_type(text: &str) -> DataType {
    let text = text.trim();
    let (keyword, params) = match text.find('(') {
        Some(open) => {
            let inner = text[open + 1..].trim_end();
            let inner = inner.strip_suffix(')').unwrap_or(inner);
            (text[..open].trim(), tokenize_parameters(inner, ','))
        }
        None => (text, Vec::new()),
    };

    match keyword {
        "NUMBER" => {
            let (precision, scale) = numeric_params(&params);
            DataType::Number { precision, scale }
        }
        "DEC" | "DECIMAL" | "FIXED" | "NUMERIC" => {
            let (precision, scale) = numeric_params(&params);
            DataType::Decimal { precision, scale }
        }
        "VARCHAR" | "STRING" | "TEXT" => DataType::Varchar(length_param(&params)),
        "CHAR" | "CHARACTER" => DataType::Char(length_param(&params)),
        "BINARY" | "VARBINARY" => DataType::Binary(length_param(&params)),
        "MAP" => parse_map(&params),
        "OBJECT" => parse_object(&params),
        "ARRAY" => parse_array(&params),
        "VECTOR" => parse_vector(&params),
        other => scalar_type(other).unwrap_or(DataType::Null),
    }
}

/// Look up a parameterless scalar keyword.
fn scalar_type(keyword: &str) -> Option<DataType> {
    let data_type = match keyword {
        "BIGINT" => DataType::BigInt,
        "INT" | "INTEGER" => DataType::Integer,
        "SMALLINT" => DataType::SmallInt,
        "TINYINT" => DataType::TinyInt,
        "BYTEINT" => DataType::ByteInt,
        "FLOAT" | "FLOAT4" => DataType::Float,
        "DOUBLE" | "DOUBLE PRECISION" | "FLOAT8" => DataType::Double,
        "REAL" => DataType::Real,
        "DECFLOAT" => DataType::DecFloat,
        "BOOLEAN" => DataType::Boolean,
        "DATE" => DataType::Date,
        "DATETIME" => DataType::DateTime,
        "TIME" => DataType::Time,
        "TIMESTAMP" => DataType::Timestamp,
        "TIMESTAMP_TZ" => DataType::TimestampTz,
        "TIMESTAMP_LTZ" => DataType::TimestampLtz,
        "TIMESTAMP_NTZ" => DataType::TimestampNtz,
        "VARIANT" => DataType::Variant,
        "GEOGRAPHY" => DataType::Geography,
        "GEOMETRY" => DataType::Geometry,
        _ => return None,
    };
    Some(data_type)
}

fn numeric_params(params: &[String]) -> (Option<u32>, Option<u32>) {
    let precision = params.first().and_then(|p| p.parse().ok());
    let scale = params.get(1).and_then(|s| s.parse().ok());
    (precision, scale)
}

fn length_param(params: &[String]) -> Option<u32> {
    match params {
        [length] => length.parse().ok(),
        _ => None,
    }
}

/// Parse a type that may carry a trailing `NOT NULL`.
fn parse_nullable(text: &str) -> (DataType, bool) {
    match text.strip_suffix(NOT_NULL_SUFFIX) {
        Some(inner) => (parse_type(inner), true),
        None => (parse_type(text), false),
    }
}

fn parse_map(params: &[String]) -> DataType {
    let [key, value] = params else {
        return DataType::Null;
    };
    let key = parse_type(key);
    let (value, not_null) = parse_nullable(value);
    if key.is_unknown() || value.is_unknown() {
        return DataType::Null;
    }
    DataType::Map {
        key: Box::new(key),
        value: Box::new(value),
        not_null,
    }
}

fn parse_object(params: &[String]) -> DataType {
    let mut fields = Vec::with_capacity(params.len());

    for param in params {
        let parts = tokenize_parameters(param, ' ');
        if parts.len() < 2 {
            continue;
        }
        let data_type = parse_type(&parts[1]);
        if data_type.is_unknown() {
            return DataType::Null;
        }
        let not_null = parts.len() == 4 && parts[2] == "NOT" && parts[3] == "NULL";
        fields.push(ObjectField {
            name: parts[0].clone(),
            data_type,
            not_null,
        });
    }

    DataType::Object(fields)
}

fn parse_array(params: &[String]) -> DataType {
    match params {
        [] => DataType::Array {
            element: None,
            not_null: false,
        },
        [element] => {
            let (element, not_null) = parse_nullable(element);
            if element.is_unknown() {
                return DataType::Null;
            }
            DataType::Array {
                element: Some(Box::new(element)),
                not_null,
            }
        }
        _ => DataType::Null,
    }
}

fn parse_vector(params: &[String]) -> DataType {
    let [element, dimension] = params else {
        return DataType::Null;
    };
    let element = match element.as_str() {
        "INT" => VectorElement::Int,
        "FLOAT" => VectorElement::Float,
        _ => return DataType::Null,
    };
    match dimension.parse() {
        Ok(dimension) => DataType::Vector { element, dimension },
        Err(_) => DataType::Null,
    }
}

/// Parse the bracketed column list reported by `SHOW INDEXES`, e.g.
/// `[NAME, CREATED_AT]`.
pub fn parse_index_columns(text: &str) -> Vec<String> {
    let text = text.trim();
    let inner = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(text);
    inner
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
