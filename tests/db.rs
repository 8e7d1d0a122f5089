use diesel::prelude::*;
use diesel::sql_types::Text;
use product_adder::db::{establish_connection_pool, run_migrations};

mod common;

#[derive(QueryableByName)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

#[test]
fn test_creates_and_removes_db_files() {
    let test_db = common::TestDb::new();
    let pool = test_db.pool();
    let conn = pool.get();
    assert!(conn.is_ok());
}

#[test]
fn migrations_create_documents_table_and_are_idempotent() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let pool = establish_connection_pool(file.path().to_str().unwrap()).unwrap();

    run_migrations(&pool).expect("first run applies migrations");
    run_migrations(&pool).expect("second run is a no-op");

    let mut conn = pool.get().unwrap();
    let tables = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'documents'",
    )
    .load::<TableName>(&mut conn)
    .unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].name, "documents");
}
