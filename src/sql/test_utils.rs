//! Test utilities for SQL emission validation.
//!
//! Provides helpers for validating that emitted SQL is syntactically correct
//! using sqlparser-rs for roundtrip validation.

use sqlparser::dialect::SnowflakeDialect;
use sqlparser::parser::Parser;

/// Validates that a SQL string parses under sqlparser's Snowflake dialect.
///
/// Only used for statement shapes sqlparser understands (SELECT, INSERT,
/// UPDATE, DELETE). Warehouse-specific DDL such as stages or dynamic tables
/// is checked against exact strings instead.
pub fn validate_sql(sql: &str) -> Result<(), String> {
    Parser::parse_sql(&SnowflakeDialect {}, sql)
        .map(|_| ())
        .map_err(|e| format!("Invalid Snowflake SQL: {}\nSQL: {}", e, sql))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_sql() {
        validate_sql("SELECT * FROM users").unwrap();
        validate_sql("SELECT a FROM db.public.users WHERE a = 'x'").unwrap();
    }

    #[test]
    fn test_validate_invalid_sql() {
        assert!(validate_sql("SELEC * FORM users").is_err());
    }
}
