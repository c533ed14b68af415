//! MERGE compilation through the statement entry point.

use insta::assert_snapshot;
use sqlparser::dialect::SnowflakeDialect;
use sqlparser::parser::Parser;

use snowflake_dialect::sql::{
    col, lit_str, table_col, CompileError, Expr, ExprExt, MergeClause, MergeInto, MergeSource,
    Query, RenderOptions, Statement, TableRef,
};

fn assert_parses(sql: &str) {
    Parser::parse_sql(&SnowflakeDialect {}, sql)
        .unwrap_or_else(|e| panic!("Invalid Snowflake SQL: {}\nSQL: {}", e, sql));
}

fn onboarding_merge() -> MergeInto {
    MergeInto::new(
        "users",
        "onboarding_users",
        table_col("users", "id").eq(table_col("onboarding_users", "id")),
    )
    .when_matched_then_update([
        ("name", table_col("onboarding_users", "name")),
        ("fullname", table_col("onboarding_users", "fullname")),
    ])
    .when(
        MergeClause::not_matched_insert([
            ("name", table_col("onboarding_users", "name")),
            ("id", table_col("onboarding_users", "id")),
            ("fullname", table_col("onboarding_users", "fullname")),
        ])
        .filter(table_col("onboarding_users", "fullname").is_not_null()),
    )
}

#[test]
fn test_onboarding_merge_deterministic() {
    let statement = Statement::from(onboarding_merge());
    let compiled = statement.compile(RenderOptions::deterministic()).unwrap();

    assert_snapshot!(
        compiled.sql,
        @"MERGE INTO users USING onboarding_users ON users.id = onboarding_users.id WHEN MATCHED THEN UPDATE SET fullname = onboarding_users.fullname, name = onboarding_users.name WHEN NOT MATCHED AND onboarding_users.fullname IS NOT NULL THEN INSERT (fullname, id, name) VALUES (onboarding_users.fullname, onboarding_users.id, onboarding_users.name)"
    );
    assert_eq!(compiled.autocommit, Some(true));
    assert!(!compiled.is_insert);
    assert_parses(&compiled.sql);
}

#[test]
fn test_merge_keeps_insertion_order_by_default() {
    let statement = Statement::from(onboarding_merge());
    let first = statement.render(RenderOptions::default()).unwrap();

    for _ in 0..10 {
        assert_eq!(statement.render(RenderOptions::default()).unwrap(), first);
    }
    assert!(first.contains(
        "WHEN MATCHED THEN UPDATE SET name = onboarding_users.name, fullname = onboarding_users.fullname"
    ));
    assert!(first.contains(
        "THEN INSERT (name, id, fullname) VALUES (onboarding_users.name, onboarding_users.id, onboarding_users.fullname)"
    ));
}

#[test]
fn test_merge_from_subquery_with_delete() {
    let source = Query::new()
        .select(vec![col("id"), col("status")])
        .from(TableRef::new("changes").with_schema("staging"));

    let merge = MergeInto::new(
        TableRef::new("accounts"),
        MergeSource::query(source, "c"),
        table_col("accounts", "id").eq(table_col("c", "id")),
    )
    .when(MergeClause::matched_delete().filter(table_col("c", "status").eq(lit_str("closed"))))
    .when_matched_then_update([("status", table_col("c", "status"))]);

    let sql = merge.to_sql(RenderOptions::default()).unwrap();
    assert_eq!(
        sql,
        "MERGE INTO accounts USING (SELECT\n  id,\n  status\nFROM staging.changes) AS c \
         ON accounts.id = c.id \
         WHEN MATCHED AND c.status = 'closed' THEN DELETE \
         WHEN MATCHED THEN UPDATE SET status = c.status"
    );
    assert_parses(&sql);
}

#[test]
fn test_merge_clause_value_replaces_in_place() {
    let clause = MergeClause::matched_update([("a", col("x")), ("b", col("y"))]).value("a", col("z"));
    let merge = MergeInto::new("t", "s", table_col("t", "id").eq(table_col("s", "id"))).when(clause);

    assert_eq!(
        merge.to_sql(RenderOptions::default()).unwrap(),
        "MERGE INTO t USING s ON t.id = s.id WHEN MATCHED THEN UPDATE SET a = z, b = y"
    );
}

#[test]
fn test_empty_update_clause_fails() {
    let merge = MergeInto::new("t", "s", table_col("t", "id").eq(table_col("s", "id")))
        .when_matched_then_update(Vec::<(&str, Expr)>::new());

    assert_eq!(
        Statement::from(merge).compile(RenderOptions::default()),
        Err(CompileError::EmptyMergeClause { kind: "UPDATE" })
    );
}

#[test]
fn test_merge_percent_escaping() {
    let merge = MergeInto::new("t", "s", table_col("t", "id").eq(table_col("s", "id")))
        .when_not_matched_then_insert([("pattern", lit_str("100%"))]);

    let compiled = Statement::from(merge)
        .compile(RenderOptions::default().with_escape_percent(true))
        .unwrap();
    assert!(compiled.escape_percent);
    assert!(compiled.sql.ends_with("INSERT (pattern) VALUES ('100%%')"));
}
