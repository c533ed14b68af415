//! Loading `snowflake-dialect.toml` and wiring it into a dialect and renderer.

use std::fs;
use std::path::PathBuf;

use snowflake_dialect::config::{ParamValue, Settings, SettingsError};
use snowflake_dialect::metadata::{DialectConfig, SnowflakeDialect};
use snowflake_dialect::sql::{col, lit_int, ExprExt, Query, RenderOptions, Statement, TableRef};

const CONFIG: &str = r#"
[dialect]
application_name = "nightly-load"
default_schema = "RAW"

[render]
deterministic = true
escape_percent = true

[connections.default]
url = "snowflake://loader@myorg-prod/analytics/public?cache_column_metadata=true"

[connections.dev]
url = "snowflake://dev@myorg-dev/sandbox"
default_schema = "scratch"
"#;

/// Write `content` as `snowflake-dialect.toml` in a directory private to `test`.
fn write_config(test: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("snowflake-dialect-{}-{}", std::process::id(), test));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("snowflake-dialect.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_config_file_drives_dialect_and_rendering() {
    let path = write_config("drives", CONFIG);
    let settings = Settings::from_file(&path).unwrap();

    assert_eq!(
        settings.dialect.to_config(),
        DialectConfig {
            cache_column_metadata: false,
            application_name: Some("nightly-load".into()),
            default_schema: Some("RAW".into()),
        }
    );

    let opts = settings.render.to_options();
    assert_eq!(opts, RenderOptions::deterministic().with_escape_percent(true));

    let query: Statement = Query::new()
        .select(vec![col("id").modulo(lit_int(10))])
        .from(TableRef::new("orders"))
        .into();
    let compiled = query.compile(opts).unwrap();
    assert!(compiled.escape_percent);
    assert_eq!(compiled.sql, "SELECT\n  id %% 10\nFROM orders");
}

#[test]
fn test_connection_overrides_reach_the_dialect() {
    let path = write_config("overrides", CONFIG);
    let settings = Settings::from_file(&path).unwrap();

    let (name, conn) = settings.default_connection().unwrap();
    assert_eq!(name, "default");

    let config = settings.dialect_config_for(name).unwrap();
    assert!(config.cache_column_metadata);
    assert_eq!(config.default_schema.as_deref(), Some("RAW"));

    let dialect = SnowflakeDialect::new(config);
    let args = dialect.connect_args(&conn.resolved_url().unwrap()).unwrap();
    assert_eq!(args.account, "myorg-prod");
    assert_eq!(
        args.params.get("application"),
        Some(&ParamValue::Str("nightly-load".into()))
    );

    let dev = settings.dialect_config_for("dev").unwrap();
    assert!(!dev.cache_column_metadata);
    assert_eq!(dev.default_schema.as_deref(), Some("scratch"));
}

#[test]
fn test_missing_and_malformed_files() {
    let missing = std::env::temp_dir().join("snowflake-dialect-does-not-exist.toml");
    assert!(matches!(
        Settings::from_file(&missing),
        Err(SettingsError::FileNotFound(path)) if path == missing
    ));

    let path = write_config("malformed", "[render]\ndeterministic = \"yes\"\n");
    assert!(matches!(
        Settings::from_file(&path),
        Err(SettingsError::ParseError(_))
    ));
}

#[test]
fn test_empty_file_uses_defaults() {
    let path = write_config("empty", "");
    let settings = Settings::from_file(&path).unwrap();

    assert_eq!(settings.dialect.to_config(), DialectConfig::default());
    assert_eq!(settings.render.to_options(), RenderOptions::default());
    assert!(settings.default_connection().is_none());
}
