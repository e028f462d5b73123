use rusqlite::{Connection, ErrorCode};
use warehouse_core::db::migrations::{latest_version, WAREHOUSE_TABLES};
use warehouse_core::{
    open_session, open_session_in_memory, open_session_with, DbError, Product, ProductRepository,
    Session, SqliteProductRepository, StorageTarget,
};

#[test]
fn open_in_memory_creates_every_table() {
    let session = open_session_in_memory().unwrap();

    assert_eq!(schema_version(&session), latest_version());
    for table in WAREHOUSE_TABLES {
        assert_table_exists(&session, table);
    }
}

#[test]
fn association_tables_hold_only_two_foreign_keys() {
    let session = open_session_in_memory().unwrap();

    assert_eq!(columns(&session, "category_products"), ["category_id", "product_id"]);
    assert_eq!(columns(&session, "order_products"), ["order_id", "product_id"]);
    assert_eq!(columns(&session, "role_staff"), ["role_id", "staff_id"]);
    assert_eq!(columns(&session, "staff_customers"), ["staff_id", "customer_id"]);
}

#[test]
fn scalar_foreign_keys_live_on_owning_tables() {
    let session = open_session_in_memory().unwrap();

    assert!(columns(&session, "customers").contains(&"staff_id".to_string()));
    assert!(columns(&session, "staff").contains(&"role_id".to_string()));
    assert!(columns(&session, "products").contains(&"category".to_string()));
}

#[test]
fn foreign_keys_are_enforced_on_open() {
    let session = open_session_in_memory().unwrap();
    let enabled: i64 = session
        .read(|conn| conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0)))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn read_access_rejects_writes_and_restores_the_connection() {
    let session = open_session_in_memory().unwrap();

    let err = session
        .read(|conn| {
            conn.execute(
                "INSERT INTO products (name, quantity, price, category) VALUES ('x', 1, 1.0, 1);",
                [],
            )
        })
        .unwrap_err();
    assert_eq!(err.sqlite_error_code(), Some(ErrorCode::ReadOnly));
    assert!(!session.has_pending_writes());

    let count: i64 = session
        .read(|conn| conn.query_row("SELECT COUNT(*) FROM products;", [], |row| row.get(0)))
        .unwrap();
    assert_eq!(count, 0);

    let products = SqliteProductRepository::new(&session);
    assert!(products.add(&Product::new("after read", 1, 1.0, 1)).is_ok());
}

#[test]
fn reopening_same_file_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warehouse.db");

    let first = open_session(&path).unwrap();
    assert_eq!(schema_version(&first), latest_version());
    first.close().unwrap();

    let second = open_session_with(&StorageTarget::File(path)).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert_table_exists(&second, "products");
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_session(&path) {
        Err(DbError::SchemaTooNew { found, supported }) => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer schema must be rejected"),
    }
}

fn schema_version(session: &Session) -> u32 {
    session
        .read(|conn| conn.query_row("PRAGMA user_version;", [], |row| row.get(0)))
        .unwrap()
}

fn columns(session: &Session, table: &str) -> Vec<String> {
    session
        .read(|conn| {
            let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(1))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(names)
        })
        .unwrap()
}

fn assert_table_exists(session: &Session, table_name: &str) {
    let exists: i64 = session
        .read(|conn| {
            conn.query_row(
                "SELECT EXISTS(
                    SELECT 1
                    FROM sqlite_master
                    WHERE type = 'table' AND name = ?1
                );",
                [table_name],
                |row| row.get(0),
            )
        })
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
