//! CREATE TABLE for every table kind, plus the DDL around it.

use insta::assert_snapshot;
use sqlparser::dialect::SnowflakeDialect;
use sqlparser::parser::Parser;

use snowflake_dialect::sql::{
    col, func, lit_str, AlterTable, ColumnDef, CompileError, CreateIndex, CreateTable, DataType,
    DropIndex, DropTable, Identity, Query, ReferentialAction, RenderOptions, Statement,
    TableConstraint, TableKind, TableOption, TableRef, TimeUnit,
};

fn assert_parses(sql: &str) {
    Parser::parse_sql(&SnowflakeDialect {}, sql)
        .unwrap_or_else(|e| panic!("Invalid Snowflake SQL: {}\nSQL: {}", e, sql));
}

fn sales_query() -> Query {
    Query::new()
        .select(vec![col("region"), func("SUM", vec![col("amount")])])
        .from(TableRef::new("orders").with_schema("raw"))
        .group_by(vec![col("region")])
}

#[test]
fn test_dynamic_table_options_in_canonical_order() {
    let table = CreateTable::dynamic("sales_by_region")
        .or_replace()
        .option(TableOption::refresh_mode("incremental"))
        .option(TableOption::target_lag(20, TimeUnit::Minutes))
        .option(TableOption::warehouse("transform_wh"))
        .option(TableOption::comment("rolled up hourly"))
        .as_query(sales_query());

    let compiled = Statement::from(table)
        .compile(RenderOptions::default())
        .unwrap();

    assert_snapshot!(compiled.sql, @r"
    CREATE OR REPLACE DYNAMIC TABLE sales_by_region WAREHOUSE = transform_wh TARGET_LAG = '20 minutes' REFRESH_MODE = INCREMENTAL COMMENT = 'rolled up hourly' AS SELECT
      region,
      SUM(amount)
    FROM raw.orders
    GROUP BY region
    ");
    assert_eq!(compiled.autocommit, None);
}

#[test]
fn test_dynamic_table_downstream_lag() {
    let table = CreateTable::dynamic("rollup")
        .option(TableOption::warehouse("wh"))
        .option(TableOption::parse_target_lag("DOWNSTREAM"))
        .as_query(sales_query());

    let sql = table.to_sql(RenderOptions::default()).unwrap();
    assert!(sql.starts_with("CREATE DYNAMIC TABLE rollup WAREHOUSE = wh TARGET_LAG = DOWNSTREAM AS SELECT"));
}

#[test]
fn test_dynamic_table_reports_every_problem() {
    let table = CreateTable::dynamic("broken")
        .option(TableOption::warehouse(""))
        .option(TableOption::target_lag(0, TimeUnit::Hours));

    let Err(CompileError::InvalidTable(err)) = table.to_sql(RenderOptions::default()) else {
        panic!("expected validation failure");
    };
    assert_eq!(err.table, "broken");
    assert_eq!(err.problems.len(), 5);
    assert!(err.problems.iter().any(|p| p.contains("WAREHOUSE option: value must not be empty")));
    assert!(err.problems.iter().any(|p| p.contains("time must be greater than zero")));
    assert!(err.problems.contains(&"dynamic tables require an AS query".to_string()));
}

#[test]
fn test_iceberg_table() {
    let table = CreateTable::iceberg(TableRef::new("events").with_schema("lake"))
        .column(ColumnDef::new("id", DataType::number(38, 0)).not_null())
        .column(ColumnDef::new("payload", DataType::map_of(DataType::Varchar(None), DataType::Variant)))
        .option(TableOption::base_location("events/"))
        .option(TableOption::external_volume("lake_volume"))
        .option(TableOption::snowflake_catalog());

    assert_eq!(
        table.to_sql(RenderOptions::default()).unwrap(),
        "CREATE ICEBERG TABLE lake.events (id NUMBER(38,0) NOT NULL, payload MAP(VARCHAR, VARIANT)) \
         EXTERNAL_VOLUME = 'lake_volume' CATALOG = 'SNOWFLAKE' BASE_LOCATION = 'events/'"
    );

    let missing = CreateTable::iceberg("events").option(TableOption::snowflake_catalog());
    let Err(CompileError::InvalidTable(err)) = missing.to_sql(RenderOptions::default()) else {
        panic!("expected validation failure");
    };
    assert_eq!(
        err.problems,
        vec![
            "iceberg tables require a EXTERNAL_VOLUME option",
            "iceberg tables require a BASE_LOCATION option",
        ]
    );
}

#[test]
fn test_hybrid_table_with_keys_and_index() {
    let table = CreateTable::hybrid("customers")
        .column(
            ColumnDef::new("id", DataType::number(38, 0))
                .not_null()
                .identity(Identity::new(1, 1).ordered(true)),
        )
        .column(ColumnDef::new("email", DataType::varchar(320)).not_null())
        .column(ColumnDef::new("region_id", DataType::Integer))
        .constraint(TableConstraint::primary_key_named("pk_customers", ["id"]))
        .constraint(TableConstraint::unique(["email"]))
        .constraint(TableConstraint::ForeignKey {
            name: None,
            columns: vec!["region_id".into()],
            references_table: TableRef::new("regions"),
            references_columns: vec!["id".into()],
            on_delete: Some(ReferentialAction::SetNull),
            on_update: None,
        })
        .constraint(TableConstraint::index("idx_region", ["region_id"]));

    assert_snapshot!(
        table.to_sql(RenderOptions::default()).unwrap(),
        @"CREATE HYBRID TABLE customers (id NUMBER(38,0) NOT NULL IDENTITY(1, 1) ORDER, email VARCHAR(320) NOT NULL, region_id INTEGER, CONSTRAINT pk_customers PRIMARY KEY (id), UNIQUE (email), FOREIGN KEY (region_id) REFERENCES regions (id) ON DELETE SET NULL, INDEX idx_region (region_id))"
    );
}

#[test]
fn test_temporary_table_parses() {
    let table = CreateTable::new("scratch")
        .temporary()
        .column(ColumnDef::new("id", DataType::Integer).primary_key())
        .column(ColumnDef::new("note", DataType::Varchar(None)).default(lit_str("n/a")))
        .column(ColumnDef::new("CamelCase", DataType::Boolean).comment("kept as typed"));

    let sql = table.to_sql(RenderOptions::default()).unwrap();
    assert_eq!(
        sql,
        "CREATE TEMPORARY TABLE scratch (id INTEGER PRIMARY KEY, note VARCHAR DEFAULT 'n/a', \
         \"CamelCase\" BOOLEAN COMMENT 'kept as typed')"
    );
    assert_parses(&sql);
}

#[test]
fn test_clustered_table_parses() {
    let table = CreateTable::new(TableRef::new("facts").with_schema("mart"))
        .column(ColumnDef::new("sold_on", DataType::Date))
        .column(ColumnDef::new("store_id", DataType::Integer))
        .cluster_by(vec![col("sold_on"), col("store_id")]);

    let sql = table.to_sql(RenderOptions::default()).unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE mart.facts (sold_on DATE, store_id INTEGER) CLUSTER BY (sold_on, store_id)"
    );
    assert_parses(&sql);
}

#[test]
fn test_index_statements_check_table_kind() {
    let create: Statement = CreateIndex::new("idx_email", "customers", TableKind::Hybrid)
        .if_not_exists()
        .columns(["email"])
        .into();
    assert_eq!(
        create.render(RenderOptions::default()).unwrap(),
        "CREATE INDEX IF NOT EXISTS idx_email ON customers (email)"
    );

    let drop: Statement = DropIndex::new("idx_email", "customers", TableKind::Standard).into();
    assert_eq!(
        drop.compile(RenderOptions::default()),
        Err(CompileError::IndexesNotSupported {
            table: "customers".into()
        })
    );
}

#[test]
fn test_alter_and_drop_statements() {
    let statements: Vec<(Statement, &str)> = vec![
        (
            AlterTable::add_column(
                "customers",
                ColumnDef::new("tags", DataType::array_of(DataType::Varchar(None))),
            )
            .into(),
            "ALTER TABLE customers ADD COLUMN tags ARRAY(VARCHAR)",
        ),
        (
            AlterTable::comment("customers", Some("core entity")).into(),
            "ALTER TABLE customers SET COMMENT = 'core entity'",
        ),
        (
            DropTable::new("customers").if_exists().into(),
            "DROP TABLE IF EXISTS customers",
        ),
    ];

    for (statement, expected) in statements {
        let compiled = statement.compile(RenderOptions::default()).unwrap();
        assert_eq!(compiled.sql, expected);
        assert_eq!(compiled.autocommit, None);
    }
}
