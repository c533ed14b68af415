//! Schema reflection against a scripted connection.

use std::sync::Mutex;

use async_trait::async_trait;

use snowflake_dialect::driver::{
    Connection, DriverError, DriverResult, ExecuteOptions, QueryResult, Value,
};
use snowflake_dialect::metadata::{
    ColumnInfo, DialectConfig, ForeignKey, IndexInfo, PrimaryKey, ReflectionError,
    SnowflakeDialect, UniqueConstraint,
};
use snowflake_dialect::sql::{DataType, Ident, Identity};

// =============================================================================
// Scripted connection
// =============================================================================

/// Answers statements by the first registered prefix they start with and
/// records every statement it sees.
#[derive(Default)]
struct ScriptedConnection {
    responses: Vec<(String, DriverResult<QueryResult>)>,
    executed: Mutex<Vec<String>>,
}

impl ScriptedConnection {
    fn on(mut self, prefix: &str, result: QueryResult) -> Self {
        self.responses.push((prefix.to_string(), Ok(result)));
        self
    }

    fn fail(mut self, prefix: &str, errno: i32) -> Self {
        self.responses
            .push((prefix.to_string(), Err(DriverError::programming(errno, "scripted failure"))));
        self
    }

    fn count(&self, prefix: &str) -> usize {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .filter(|sql| sql.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn execute(
        &self,
        sql: &str,
        _params: &[Value],
        _options: ExecuteOptions,
    ) -> DriverResult<QueryResult> {
        self.executed.lock().unwrap().push(sql.to_string());
        self.responses
            .iter()
            .find(|(prefix, _)| sql.starts_with(prefix.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| Err(DriverError::programming(0, format!("unscripted: {}", sql))))
    }

    async fn execute_many(
        &self,
        sql: &str,
        _rows: &[Vec<Value>],
        options: ExecuteOptions,
    ) -> DriverResult<QueryResult> {
        self.execute(sql, &[], options).await
    }

    async fn commit(&self) -> DriverResult<()> {
        Ok(())
    }

    async fn rollback(&self) -> DriverResult<()> {
        Ok(())
    }

    async fn set_autocommit(&self, _autocommit: bool) -> DriverResult<()> {
        Ok(())
    }
}

// =============================================================================
// Canned catalog
// =============================================================================

const SCHEMA: Option<&str> = Some("analytics.public");
const INFO_COLUMNS: &str = "SELECT ic.table_name";
const DESC_ORDERS: &str = "DESC TABLE ANALYTICS.PUBLIC.ORDERS TYPE = COLUMNS";

fn null() -> Value {
    Value::Null
}

fn desc_orders() -> QueryResult {
    QueryResult::new(
        &["name", "type", "kind", "null?", "default", "primary key", "unique key", "comment"],
        vec![
            vec![
                "ID".into(),
                "NUMBER(38,0)".into(),
                "COLUMN".into(),
                "N".into(),
                "IDENTITY START 1 INCREMENT 1 ORDER".into(),
                "Y".into(),
                "N".into(),
                null(),
            ],
            vec![
                "NAME".into(),
                "VARCHAR(16777216)".into(),
                "COLUMN".into(),
                "Y".into(),
                null(),
                "N".into(),
                "N".into(),
                "customer name".into(),
            ],
            vec![
                "TAGS".into(),
                "ARRAY(VARCHAR(16777216))".into(),
                "COLUMN".into(),
                "Y".into(),
                null(),
                "N".into(),
                "N".into(),
                null(),
            ],
            vec![
                "CREATED_AT".into(),
                "TIMESTAMP_NTZ(9)".into(),
                "COLUMN".into(),
                "N".into(),
                "CURRENT_TIMESTAMP()".into(),
                "N".into(),
                "N".into(),
                null(),
            ],
        ],
    )
}

#[allow(clippy::too_many_arguments)]
fn info_row(
    table: &str,
    column: &str,
    data_type: &str,
    char_len: Option<i64>,
    precision: Option<i64>,
    scale: Option<i64>,
    nullable: &str,
    default: Option<&str>,
    comment: Option<&str>,
) -> Vec<Value> {
    vec![
        table.into(),
        column.into(),
        data_type.into(),
        char_len.into(),
        precision.into(),
        scale.into(),
        nullable.into(),
        default.into(),
        "NO".into(),
        comment.into(),
        null(),
        null(),
        null(),
    ]
}

fn info_schema_columns() -> QueryResult {
    let mut id = info_row("ORDERS", "ID", "NUMBER", None, Some(38), Some(0), "NO", None, None);
    id[8] = "YES".into();
    id[10] = Value::Int(1);
    id[11] = Value::Int(1);
    id[12] = "YES".into();

    QueryResult::new(
        &[
            "table_name",
            "column_name",
            "data_type",
            "character_maximum_length",
            "numeric_precision",
            "numeric_scale",
            "is_nullable",
            "column_default",
            "is_identity",
            "comment",
            "identity_start",
            "identity_increment",
            "identity_ordered",
        ],
        vec![
            id,
            info_row("ORDERS", "NAME", "TEXT", Some(16777216), None, None, "YES", None, Some("customer name")),
            info_row("CUSTOMERS", "EMAIL", "TEXT", Some(320), None, None, "NO", None, None),
            info_row("ORDERS", "TAGS", "ARRAY", None, None, None, "YES", None, None),
            info_row("ORDERS", "CREATED_AT", "TIMESTAMP_NTZ", None, None, Some(9), "NO", Some("CURRENT_TIMESTAMP()"), None),
            info_row("ORDERS", "SYS_CLUSTERING_COLUMN_1", "NUMBER", None, Some(38), Some(0), "YES", None, None),
        ],
    )
}

fn primary_keys() -> QueryResult {
    QueryResult::new(
        &["table_name", "column_name", "key_sequence", "constraint_name"],
        vec![
            vec!["ORDERS".into(), "ID".into(), Value::Int(1), "SYS_CONSTRAINT_1".into()],
            vec!["LINES".into(), "LINE_NO".into(), Value::Int(2), "PK_LINES".into()],
            vec!["LINES".into(), "ORDER_ID".into(), Value::Int(1), "PK_LINES".into()],
        ],
    )
}

fn cached_dialect() -> SnowflakeDialect {
    SnowflakeDialect::new(DialectConfig {
        cache_column_metadata: true,
        ..DialectConfig::default()
    })
}

fn expected_orders_columns() -> Vec<ColumnInfo> {
    vec![
        ColumnInfo {
            name: Ident::new("id"),
            data_type: DataType::number(38, 0),
            nullable: false,
            default: None,
            autoincrement: true,
            identity: Some(Identity::new(1, 1).ordered(true)),
            comment: None,
            primary_key: true,
        },
        ColumnInfo {
            name: Ident::new("name"),
            data_type: DataType::varchar(16777216),
            nullable: true,
            default: None,
            autoincrement: false,
            identity: None,
            comment: Some("customer name".into()),
            primary_key: false,
        },
        ColumnInfo {
            name: Ident::new("tags"),
            data_type: DataType::array_of(DataType::varchar(16777216)),
            nullable: true,
            default: None,
            autoincrement: false,
            identity: None,
            comment: None,
            primary_key: false,
        },
        ColumnInfo {
            name: Ident::new("created_at"),
            data_type: DataType::TimestampNtz,
            nullable: false,
            default: Some("CURRENT_TIMESTAMP()".into()),
            autoincrement: false,
            identity: None,
            comment: None,
            primary_key: false,
        },
    ]
}

// =============================================================================
// Columns
// =============================================================================

#[tokio::test]
async fn test_describe_path_columns() {
    let conn = ScriptedConnection::default().on(DESC_ORDERS, desc_orders());
    let dialect = SnowflakeDialect::default();

    let columns = dialect.get_columns(&conn, "orders", SCHEMA).await.unwrap();
    assert_eq!(columns, expected_orders_columns());
    assert_eq!(conn.count(INFO_COLUMNS), 0);
}

#[tokio::test]
async fn test_schema_path_matches_describe_path() {
    let conn = ScriptedConnection::default()
        .on(INFO_COLUMNS, info_schema_columns())
        .on("SHOW PRIMARY KEYS IN SCHEMA ANALYTICS.PUBLIC", primary_keys())
        .on(DESC_ORDERS, desc_orders());
    let dialect = cached_dialect();

    let columns = dialect.get_columns(&conn, "orders", SCHEMA).await.unwrap();
    assert_eq!(columns, expected_orders_columns());

    let executed = conn.executed.lock().unwrap().clone();
    let info_query = executed
        .iter()
        .find(|sql| sql.starts_with(INFO_COLUMNS))
        .unwrap();
    assert!(info_query.contains("FROM ANALYTICS.information_schema.columns ic"));
    assert!(info_query.contains("WHERE ic.table_schema = 'PUBLIC'"));
}

#[tokio::test]
async fn test_schema_columns_are_cached() {
    let conn = ScriptedConnection::default()
        .on(INFO_COLUMNS, info_schema_columns())
        .on("SHOW PRIMARY KEYS IN SCHEMA", primary_keys())
        .on(DESC_ORDERS, desc_orders());
    let dialect = cached_dialect();

    dialect.get_columns(&conn, "orders", SCHEMA).await.unwrap();
    dialect.get_columns(&conn, "orders", SCHEMA).await.unwrap();
    let customers = dialect.get_columns(&conn, "customers", SCHEMA).await.unwrap();

    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].data_type, DataType::varchar(320));
    assert_eq!(conn.count(INFO_COLUMNS), 1);
    assert_eq!(conn.count(DESC_ORDERS), 1);

    dialect.clear_cache();
    dialect.get_columns(&conn, "orders", SCHEMA).await.unwrap();
    assert_eq!(conn.count(INFO_COLUMNS), 2);
}

#[tokio::test]
async fn test_too_much_data_falls_back_to_describe() {
    let conn = ScriptedConnection::default()
        .fail(INFO_COLUMNS, 90030)
        .on(DESC_ORDERS, desc_orders());
    let dialect = cached_dialect();

    let columns = dialect.get_columns(&conn, "orders", SCHEMA).await.unwrap();
    assert_eq!(columns, expected_orders_columns());
    assert_eq!(conn.count(DESC_ORDERS), 1);
}

#[tokio::test]
async fn test_too_much_data_is_remembered_per_schema() {
    let conn = ScriptedConnection::default()
        .fail(INFO_COLUMNS, 90030)
        .on(DESC_ORDERS, desc_orders());
    let dialect = cached_dialect();

    dialect.get_columns(&conn, "orders", SCHEMA).await.unwrap();
    let columns = dialect.get_columns(&conn, "orders", SCHEMA).await.unwrap();

    assert_eq!(columns, expected_orders_columns());
    assert_eq!(conn.count(INFO_COLUMNS), 1);
    assert_eq!(conn.count(DESC_ORDERS), 2);

    dialect.clear_cache();
    dialect.get_columns(&conn, "orders", SCHEMA).await.unwrap();
    assert_eq!(conn.count(INFO_COLUMNS), 2);
}

#[tokio::test]
async fn test_other_schema_query_errors_propagate() {
    let conn = ScriptedConnection::default().fail(INFO_COLUMNS, 3001);
    let dialect = cached_dialect();

    let err = dialect.get_columns(&conn, "orders", SCHEMA).await.unwrap_err();
    assert_eq!(err, ReflectionError::Driver(DriverError::programming(3001, "scripted failure")));
    assert_eq!(conn.count("DESC TABLE"), 0);
}

#[tokio::test]
async fn test_missing_table_reported_on_both_paths() {
    let conn = ScriptedConnection::default()
        .on(INFO_COLUMNS, info_schema_columns())
        .on("SHOW PRIMARY KEYS IN SCHEMA", primary_keys())
        .on(DESC_ORDERS, desc_orders())
        .fail("DESC TABLE ANALYTICS.PUBLIC.GHOST", 2003);

    let expected = ReflectionError::NoSuchTable {
        schema: "PUBLIC".into(),
        table: "GHOST".into(),
    };
    assert_eq!(
        cached_dialect().get_columns(&conn, "ghost", SCHEMA).await.unwrap_err(),
        expected
    );
    assert_eq!(
        SnowflakeDialect::default()
            .get_columns(&conn, "ghost", SCHEMA)
            .await
            .unwrap_err(),
        expected
    );
}

// =============================================================================
// Existence and listings
// =============================================================================

#[tokio::test]
async fn test_has_table() {
    let conn = ScriptedConnection::default()
        .on("DESC TABLE ANALYTICS.PUBLIC.ORDERS", desc_orders())
        .fail("DESC TABLE ANALYTICS.PUBLIC.GHOST", 2003)
        .fail("DESC TABLE ANALYTICS.PUBLIC.LOCKED", 390114)
        .fail("DESC SEQUENCE ANALYTICS.PUBLIC.SEQ_GONE", 2002);
    let dialect = SnowflakeDialect::default();

    assert!(dialect.has_table(&conn, "orders", SCHEMA).await.unwrap());
    assert!(!dialect.has_table(&conn, "ghost", SCHEMA).await.unwrap());
    assert!(dialect.has_table(&conn, "locked", SCHEMA).await.is_err());
    assert!(!dialect.has_sequence(&conn, "seq_gone", SCHEMA).await.unwrap());
}

fn show_tables() -> QueryResult {
    QueryResult::new(
        &["created_on", "name", "kind", "comment", "is_hybrid", "is_dynamic"],
        vec![
            vec![null(), "ORDERS".into(), "TABLE".into(), "".into(), "N".into(), "N".into()],
            vec![null(), "SCRATCH".into(), "TEMPORARY".into(), "".into(), "N".into(), "N".into()],
            vec![null(), "STAGING".into(), "TRANSIENT".into(), "".into(), "N".into(), "N".into()],
            vec![null(), "MixedCase".into(), "TABLE".into(), "".into(), "N".into(), "N".into()],
            vec![null(), "lower".into(), "LOCAL TEMPORARY".into(), "".into(), "N".into(), "N".into()],
        ],
    )
}

#[tokio::test]
async fn test_table_names_exclude_temporary_tables() {
    let conn = ScriptedConnection::default().on("SHOW TABLES IN SCHEMA ANALYTICS.PUBLIC", show_tables());
    let dialect = SnowflakeDialect::default();

    assert_eq!(
        dialect.get_table_names(&conn, SCHEMA).await.unwrap(),
        vec![Ident::new("orders"), Ident::new("staging"), Ident::new("MixedCase")]
    );
    assert_eq!(
        dialect.get_temp_table_names(&conn, SCHEMA).await.unwrap(),
        vec![Ident::new("scratch"), Ident::quoted("lower")]
    );
}

#[tokio::test]
async fn test_schema_defaults_to_session_schema() {
    let conn = ScriptedConnection::default()
        .on(
            "SELECT current_database(), current_schema()",
            QueryResult::new(&["db", "schema"], vec![vec!["ANALYTICS".into(), "PUBLIC".into()]]),
        )
        .on(
            "SHOW VIEWS IN SCHEMA PUBLIC",
            QueryResult::new(&["name"], vec![vec!["V_ORDERS".into()]]),
        );
    let dialect = SnowflakeDialect::default();

    assert_eq!(
        dialect.get_view_names(&conn, None).await.unwrap(),
        vec![Ident::new("v_orders")]
    );
    assert_eq!(
        dialect.current_database_schema(&conn).await.unwrap(),
        (Some(Ident::new("analytics")), Some(Ident::new("public")))
    );
}

#[tokio::test]
async fn test_configured_default_schema_skips_session_lookup() {
    let conn = ScriptedConnection::default().on(
        "SHOW SEQUENCES IN SCHEMA RAW",
        QueryResult::new(&["name"], vec![vec!["ORDER_SEQ".into()]]),
    );
    let dialect = SnowflakeDialect::new(DialectConfig {
        default_schema: Some("raw".into()),
        ..DialectConfig::default()
    });

    assert_eq!(
        dialect.get_sequence_names(&conn, None).await.unwrap(),
        vec![Ident::new("order_seq")]
    );
    assert_eq!(conn.count("SELECT current_database()"), 0);
}

#[tokio::test]
async fn test_view_definition_and_table_comment() {
    let conn = ScriptedConnection::default()
        .on(
            "SELECT GET_DDL('VIEW', 'ANALYTICS.PUBLIC.V_ORDERS')",
            QueryResult::new(
                &["ddl"],
                vec![vec!["create view V_ORDERS as select * from ORDERS;".into()]],
            ),
        )
        .on("SHOW TABLES LIKE 'ORDERS' IN SCHEMA ANALYTICS.PUBLIC", {
            QueryResult::new(
                &["name", "kind", "comment"],
                vec![vec!["ORDERS".into(), "TABLE".into(), "order headers".into()]],
            )
        });
    let dialect = SnowflakeDialect::default();

    assert_eq!(
        dialect.get_view_definition(&conn, "v_orders", SCHEMA).await.unwrap().as_deref(),
        Some("create view V_ORDERS as select * from ORDERS;")
    );
    assert_eq!(
        dialect.get_table_comment(&conn, "orders", SCHEMA).await.unwrap().as_deref(),
        Some("order headers")
    );
}

// =============================================================================
// Constraints and indexes
// =============================================================================

#[tokio::test]
async fn test_primary_key_columns_in_key_order() {
    let conn = ScriptedConnection::default().on("SHOW PRIMARY KEYS IN SCHEMA", primary_keys());
    let dialect = SnowflakeDialect::default();

    assert_eq!(
        dialect.get_pk_constraint(&conn, "lines", SCHEMA).await.unwrap(),
        PrimaryKey {
            name: Some(Ident::new("pk_lines")),
            columns: vec![Ident::new("order_id"), Ident::new("line_no")],
        }
    );
    assert_eq!(
        dialect.get_pk_constraint(&conn, "audit", SCHEMA).await.unwrap(),
        PrimaryKey::default()
    );
}

#[tokio::test]
async fn test_key_listings_are_cached_per_schema() {
    let conn = ScriptedConnection::default()
        .on(INFO_COLUMNS, info_schema_columns())
        .on("SHOW PRIMARY KEYS IN SCHEMA", primary_keys())
        .on(DESC_ORDERS, desc_orders());
    let dialect = cached_dialect();

    dialect.get_columns(&conn, "orders", SCHEMA).await.unwrap();
    dialect.get_pk_constraint(&conn, "lines", SCHEMA).await.unwrap();
    let orders = dialect.get_pk_constraint(&conn, "orders", SCHEMA).await.unwrap();

    assert_eq!(orders.columns, vec![Ident::new("id")]);
    assert_eq!(conn.count("SHOW PRIMARY KEYS"), 1);

    dialect
        .get_pk_constraint(&conn, "orders", Some("analytics.staging"))
        .await
        .unwrap();
    assert_eq!(conn.count("SHOW PRIMARY KEYS"), 2);

    dialect.clear_cache();
    dialect.get_pk_constraint(&conn, "orders", SCHEMA).await.unwrap();
    assert_eq!(conn.count("SHOW PRIMARY KEYS"), 3);
}

#[tokio::test]
async fn test_foreign_keys_grouped_by_constraint() {
    let columns = [
        "pk_schema_name",
        "pk_table_name",
        "pk_column_name",
        "fk_table_name",
        "fk_column_name",
        "key_sequence",
        "update_rule",
        "delete_rule",
        "fk_name",
    ];
    let row = |pk_schema: &str, pk_table: &str, pk_col: &str, fk_col: &str, seq: i64, delete: &str, name: &str| {
        vec![
            Value::from(pk_schema),
            pk_table.into(),
            pk_col.into(),
            "LINES".into(),
            fk_col.into(),
            Value::Int(seq),
            "NO ACTION".into(),
            delete.into(),
            name.into(),
        ]
    };
    let conn = ScriptedConnection::default().on(
        "SHOW IMPORTED KEYS IN SCHEMA ANALYTICS.PUBLIC",
        QueryResult::new(
            &columns,
            vec![
                row("PUBLIC", "ORDERS", "ID", "ORDER_ID", 1, "CASCADE", "FK_LINES_ORDER"),
                row("CATALOG", "PRODUCTS", "REGION", "PRODUCT_REGION", 2, "NO ACTION", "FK_LINES_PRODUCT"),
                row("CATALOG", "PRODUCTS", "SKU", "PRODUCT_SKU", 1, "NO ACTION", "FK_LINES_PRODUCT"),
            ],
        ),
    );
    let dialect = SnowflakeDialect::default();

    assert_eq!(
        dialect.get_foreign_keys(&conn, "lines", SCHEMA).await.unwrap(),
        vec![
            ForeignKey {
                name: Ident::new("fk_lines_order"),
                constrained_columns: vec![Ident::new("order_id")],
                referred_schema: None,
                referred_table: Ident::new("orders"),
                referred_columns: vec![Ident::new("id")],
                on_update: None,
                on_delete: Some("CASCADE".into()),
            },
            ForeignKey {
                name: Ident::new("fk_lines_product"),
                constrained_columns: vec![Ident::new("product_sku"), Ident::new("product_region")],
                referred_schema: Some(Ident::new("catalog")),
                referred_table: Ident::new("products"),
                referred_columns: vec![Ident::new("sku"), Ident::new("region")],
                on_update: None,
                on_delete: None,
            },
        ]
    );
}

#[tokio::test]
async fn test_unique_constraints() {
    let conn = ScriptedConnection::default().on(
        "SHOW UNIQUE KEYS IN SCHEMA",
        QueryResult::new(
            &["table_name", "column_name", "key_sequence", "constraint_name"],
            vec![
                vec!["CUSTOMERS".into(), "EMAIL".into(), Value::Int(1), "UQ_EMAIL".into()],
                vec!["ORDERS".into(), "REF".into(), Value::Int(1), "UQ_REF".into()],
            ],
        ),
    );

    assert_eq!(
        SnowflakeDialect::default()
            .get_unique_constraints(&conn, "customers", SCHEMA)
            .await
            .unwrap(),
        vec![UniqueConstraint {
            name: Ident::new("uq_email"),
            columns: vec![Ident::new("email")],
        }]
    );
}

#[tokio::test]
async fn test_indexes_only_on_hybrid_tables() {
    let show = |hybrid: &str| {
        QueryResult::new(
            &["name", "kind", "is_hybrid"],
            vec![vec!["CUSTOMERS".into(), "TABLE".into(), hybrid.into()]],
        )
    };
    let indexes = QueryResult::new(
        &["name", "table", "columns", "included_columns", "is_unique"],
        vec![
            vec![
                "SYS_INDEX_CUSTOMERS_PRIMARY".into(),
                "CUSTOMERS".into(),
                "[ID]".into(),
                "[]".into(),
                "Y".into(),
            ],
            vec![
                "IDX_EMAIL".into(),
                "CUSTOMERS".into(),
                "[EMAIL]".into(),
                "[NAME, CREATED_AT]".into(),
                "Y".into(),
            ],
            vec!["IDX_OTHER".into(), "ORDERS".into(), "[REF]".into(), "[]".into(), "N".into()],
        ],
    );

    let hybrid = ScriptedConnection::default()
        .on("SHOW TABLES LIKE 'CUSTOMERS'", show("Y"))
        .on("SHOW INDEXES IN SCHEMA ANALYTICS.PUBLIC", indexes.clone());
    assert_eq!(
        SnowflakeDialect::default()
            .get_indexes(&hybrid, "customers", SCHEMA)
            .await
            .unwrap(),
        vec![IndexInfo {
            name: Ident::new("idx_email"),
            columns: vec![Ident::new("email")],
            included_columns: vec![Ident::new("name"), Ident::new("created_at")],
            unique: true,
        }]
    );

    let standard = ScriptedConnection::default()
        .on("SHOW TABLES LIKE 'CUSTOMERS'", show("N"))
        .on("SHOW INDEXES IN SCHEMA", indexes);
    assert!(SnowflakeDialect::default()
        .get_indexes(&standard, "customers", SCHEMA)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(standard.count("SHOW INDEXES"), 0);
}
