//! Rendering of [`DataType`] into Snowflake type keywords.

use std::fmt;

use super::types::{DataType, ObjectField, VectorElement};

impl DataType {
    /// Canonical Snowflake spelling of this type.
    pub fn compile(&self) -> String {
        self.to_string()
    }
}

fn write_precision(
    f: &mut fmt::Formatter<'_>,
    keyword: &str,
    precision: Option<u32>,
    scale: Option<u32>,
) -> fmt::Result {
    match (precision, scale) {
        (Some(p), Some(s)) => write!(f, "{}({},{})", keyword, p, s),
        (Some(p), None) => write!(f, "{}({})", keyword, p),
        _ => f.write_str(keyword),
    }
}

fn write_length(f: &mut fmt::Formatter<'_>, keyword: &str, length: Option<u32>) -> fmt::Result {
    match length {
        Some(n) => write!(f, "{}({})", keyword, n),
        None => f.write_str(keyword),
    }
}

fn not_null_suffix(not_null: bool) -> &'static str {
    if not_null {
        " NOT NULL"
    } else {
        ""
    }
}

impl fmt::Display for ObjectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}",
            self.name,
            self.data_type,
            not_null_suffix(self.not_null)
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Number { precision, scale } => write_precision(f, "NUMBER", *precision, *scale),
            DataType::Decimal { precision, scale } => {
                write_precision(f, "DECIMAL", *precision, *scale)
            }
            DataType::Integer => f.write_str("INTEGER"),
            DataType::BigInt => f.write_str("BIGINT"),
            DataType::SmallInt => f.write_str("SMALLINT"),
            DataType::TinyInt => f.write_str("TINYINT"),
            DataType::ByteInt => f.write_str("BYTEINT"),
            DataType::Float => f.write_str("FLOAT"),
            DataType::Double => f.write_str("DOUBLE"),
            DataType::Real => f.write_str("REAL"),
            DataType::DecFloat => f.write_str("DECFLOAT"),

            DataType::Varchar(len) => write_length(f, "VARCHAR", *len),
            DataType::Char(len) => write_length(f, "CHAR", *len),
            DataType::Binary(len) => write_length(f, "BINARY", *len),

            DataType::Boolean => f.write_str("BOOLEAN"),

            DataType::Date => f.write_str("DATE"),
            DataType::Time => f.write_str("TIME"),
            DataType::DateTime => f.write_str("DATETIME"),
            DataType::Timestamp => f.write_str("TIMESTAMP"),
            DataType::TimestampTz => f.write_str("TIMESTAMP_TZ"),
            DataType::TimestampLtz => f.write_str("TIMESTAMP_LTZ"),
            DataType::TimestampNtz => f.write_str("TIMESTAMP_NTZ"),

            DataType::Variant => f.write_str("VARIANT"),
            DataType::Object(fields) if fields.is_empty() => f.write_str("OBJECT"),
            DataType::Object(fields) => {
                f.write_str("OBJECT(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                f.write_str(")")
            }
            DataType::Array { element: None, .. } => f.write_str("ARRAY"),
            DataType::Array {
                element: Some(element),
                not_null,
            } => write!(f, "ARRAY({}{})", element, not_null_suffix(*not_null)),
            DataType::Map {
                key,
                value,
                not_null,
            } => write!(f, "MAP({}, {}{})", key, value, not_null_suffix(*not_null)),

            DataType::Geography => f.write_str("GEOGRAPHY"),
            DataType::Geometry => f.write_str("GEOMETRY"),
            DataType::Vector { element, dimension } => {
                let element = match element {
                    VectorElement::Int => "INT",
                    VectorElement::Float => "FLOAT",
                };
                write!(f, "VECTOR({}, {})", element, dimension)
            }

            DataType::Null => f.write_str("NULL"),
        }
    }
}
