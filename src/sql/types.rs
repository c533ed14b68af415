//! Snowflake column types.
//!
//! [`DataType`] is shared by DDL generation (rendered through the type
//! compiler) and by reflection (produced by the structured-type parser).
//! Structured types nest: `MAP(VARCHAR, ARRAY(NUMBER(10,0)))` is a tree of
//! `DataType` nodes.

use serde::{Deserialize, Serialize};

/// A Snowflake column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    // Numeric
    /// `NUMBER(p,s)`, the warehouse's native fixed-point type.
    Number {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    /// `DECIMAL(p,s)` and its synonyms DEC, NUMERIC and FIXED.
    Decimal {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Integer,
    BigInt,
    SmallInt,
    TinyInt,
    ByteInt,
    Float,
    Double,
    Real,
    DecFloat,

    // String & binary
    Varchar(Option<u32>),
    Char(Option<u32>),
    Binary(Option<u32>),

    Boolean,

    // Temporal
    Date,
    Time,
    DateTime,
    Timestamp,
    TimestampTz,
    TimestampLtz,
    TimestampNtz,

    // Semi-structured & structured
    Variant,
    /// `OBJECT` when empty, otherwise a structured `OBJECT(k T, ...)`.
    Object(Vec<ObjectField>),
    /// `ARRAY` when `element` is `None`.
    Array {
        element: Option<Box<DataType>>,
        not_null: bool,
    },
    Map {
        key: Box<DataType>,
        value: Box<DataType>,
        not_null: bool,
    },

    // Geospatial & vector
    Geography,
    Geometry,
    Vector {
        element: VectorElement,
        dimension: u32,
    },

    /// Placeholder for a type the parser did not recognize.
    Null,
}

/// A named field of a structured `OBJECT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectField {
    pub name: String,
    pub data_type: DataType,
    pub not_null: bool,
}

impl ObjectField {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            not_null: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }
}

/// Element type of a `VECTOR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VectorElement {
    Int,
    Float,
}

impl DataType {
    pub fn number(precision: u32, scale: u32) -> Self {
        DataType::Number {
            precision: Some(precision),
            scale: Some(scale),
        }
    }

    pub fn varchar(length: u32) -> Self {
        DataType::Varchar(Some(length))
    }

    pub fn array_of(element: DataType) -> Self {
        DataType::Array {
            element: Some(Box::new(element)),
            not_null: false,
        }
    }

    pub fn map_of(key: DataType, value: DataType) -> Self {
        DataType::Map {
            key: Box::new(key),
            value: Box::new(value),
            not_null: false,
        }
    }

    /// True for MAP, ARRAY and OBJECT, whether structured or semi-structured.
    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            DataType::Map { .. } | DataType::Array { .. } | DataType::Object(_)
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Number { .. }
                | DataType::Decimal { .. }
                | DataType::Integer
                | DataType::BigInt
                | DataType::SmallInt
                | DataType::TinyInt
                | DataType::ByteInt
                | DataType::Float
                | DataType::Double
                | DataType::Real
                | DataType::DecFloat
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            DataType::Date
                | DataType::Time
                | DataType::DateTime
                | DataType::Timestamp
                | DataType::TimestampTz
                | DataType::TimestampLtz
                | DataType::TimestampNtz
        )
    }

    /// True for the unrecognized-type placeholder.
    pub fn is_unknown(&self) -> bool {
        matches!(self, DataType::Null)
    }
}
