use sqlhelm::dialect::{Dialect, DialectKind, SqlServerDialect};
use sqlhelm::driver::{driver_for, Driver, DriverConfig, Extensions, SqlServerDriver};
use sqlhelm::expression::{
    Comparison, Expression, FunctionExpression, TupleComparison, TupleValue, ValueBinder,
};
use sqlhelm::query::SelectQuery;
use sqlhelm::value::{BindType, TypeMap, Value};
use std::io::Write;

#[test]
fn test_comparison_from_condition() {
    let comparison = Comparison::from_condition(("age", Value::from(30)), &TypeMap::new());
    assert_eq!(comparison.count(), 1);
    assert_eq!(comparison.operator(), "=");

    let bound = Expression::from(comparison.clone()).to_sql(&mut ValueBinder::new());
    assert_eq!(bound, "age = :c0");
    let inline = Expression::from(comparison).to_sql(&mut ValueBinder::inline());
    assert_eq!(inline, "age = 30");
}

#[test]
fn test_comparison_takes_bind_type_from_map() {
    let mut types = TypeMap::new();
    types.insert("born".to_string(), BindType::Date);
    let comparison = Comparison::from_condition(("born", Value::from("2000-01-01")), &types);
    let mut binder = ValueBinder::new();
    Expression::from(comparison).to_sql(&mut binder);
    assert_eq!(binder.get(":c0").unwrap().bind_type, Some(BindType::Date));
}

#[test]
fn test_sqlserver_paging_and_functions() {
    let dialect = "mssql".parse::<DialectKind>().unwrap().dialect();
    let query = SelectQuery::new()
        .select_as(
            Expression::function(
                "CONCAT",
                vec![Expression::identifier("first"), Expression::identifier("last")],
            ),
            "full_name",
        )
        .from("people")
        .and_where(Comparison::with_expression(
            Expression::identifier("created"),
            "<",
            Expression::Function(FunctionExpression::new("NOW")),
        ))
        .limit(3);
    let sql = dialect.compile(&query, &mut ValueBinder::new());
    assert_eq!(
        sql,
        "SELECT TOP 3 (first + last) AS full_name FROM people WHERE created < (GETUTCDATE())"
    );
    assert!(!sql.contains("CONCAT("));
    assert!(!sql.contains("LIMIT"));
}

#[test]
fn test_sqlserver_offset_needs_order() {
    let query = SelectQuery::new().from("people").offset(40).limit(20);
    let sql = SqlServerDialect.compile(&query, &mut ValueBinder::new());
    let order = sql.find("ORDER BY (SELECT NULL)").unwrap();
    assert!(order < sql.find("OFFSET 40 ROWS").unwrap());
}

#[test]
fn test_tuple_subquery_rewrite() {
    let inner = SelectQuery::new()
        .select_column("author_id")
        .select_column("year")
        .from("awards");
    let tuple = TupleComparison::in_query(vec!["id".to_string(), "year".to_string()], inner);
    let query = SelectQuery::new().from("authors").and_where(Expression::Tuple(tuple));

    let sqlserver = SqlServerDialect.compile(&query, &mut ValueBinder::new());
    assert!(sqlserver.starts_with("SELECT * FROM authors WHERE EXISTS (SELECT 1 FROM awards WHERE"));
    assert!(!sqlserver.contains("(id, year)"));

    let sqlite = DialectKind::Sqlite
        .dialect()
        .compile(&query, &mut ValueBinder::new());
    assert!(sqlite.contains("(id, year) IN (SELECT author_id, year FROM awards)"));
}

#[test]
fn test_empty_tuple_list_per_engine() {
    let fields = || vec!["a".to_string(), "b".to_string()];
    let within = SelectQuery::new()
        .from("t")
        .and_where(Expression::Tuple(TupleComparison::in_tuples(fields(), vec![])));
    let outside = SelectQuery::new().from("t").and_where(Expression::Tuple(
        TupleComparison::new(fields(), TupleValue::Tuples(vec![]), "NOT IN"),
    ));

    for kind in [DialectKind::SqlServer, DialectKind::Sqlite] {
        let dialect = kind.dialect();
        assert_eq!(
            dialect.compile(&within, &mut ValueBinder::new()),
            "SELECT * FROM t WHERE 1 = 0"
        );
        assert_eq!(
            dialect.compile(&outside, &mut ValueBinder::new()),
            "SELECT * FROM t WHERE 1 = 1"
        );
    }
}

#[test]
fn test_savepoints_per_engine() {
    let sqlserver = DialectKind::SqlServer.dialect();
    let sqlite = DialectKind::Sqlite.dialect();
    assert_eq!(sqlserver.save_point_sql("3"), "SAVE TRANSACTION t3");
    assert_eq!(sqlite.rollback_save_point_sql("3"), "ROLLBACK TO SAVEPOINT LEVEL3");
}

#[test]
fn test_driver_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "host = \"db.internal\"\ndatabase = \"blog\"\nquote_identifiers = true\n\n[flags]\nMultipleActiveResultSets = \"false\""
    )
    .unwrap();

    let settings = DriverConfig::load(file.path()).unwrap();
    let driver = SqlServerDriver::new(Extensions::parse("pdo_sqlsrv"));
    assert!(driver.enabled());

    let config = driver.config(&settings).unwrap();
    assert_eq!(config.host.as_deref(), Some("db.internal"));
    assert_eq!(config.port, Some(1433));
    assert_eq!(config.database.as_deref(), Some("blog"));
    assert_eq!(config.flags.len(), 1);

    let query = SelectQuery::new().select_column("posts.title").from("posts");
    let sql = driver.compile(&config, &query, &mut ValueBinder::new());
    assert_eq!(sql, "SELECT [posts].[title] FROM [posts]");
}

#[test]
fn test_disabled_driver_still_describes_itself() {
    let driver = driver_for(DialectKind::Sqlite, Extensions::default());
    assert!(!driver.enabled());
    let config = driver.config(&DriverConfig::new()).unwrap();
    assert_eq!(config.database.as_deref(), Some(":memory:"));
    assert_eq!(driver.dialect().name(), "sqlite");
}
