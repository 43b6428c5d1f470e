use athenaeum_core::db::migrations::latest_version;
use athenaeum_core::db::{open_db, open_db_in_memory, DbError};
use athenaeum_core::{AthenaeumInput, ResourceService, SqliteRecordStore};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in [
        "goals",
        "courses",
        "course_goals",
        "athenaeums",
        "athenaeum_courses",
    ] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn reopening_file_database_keeps_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("athenaeum.db");

    let created = {
        let conn = open_db(&path).unwrap();
        let service = ResourceService::new(SqliteRecordStore::try_new(&conn).unwrap());
        service
            .create_athenaeum(&AthenaeumInput::new("Persistent", Vec::<String>::new()))
            .unwrap()
    };

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let service = ResourceService::new(SqliteRecordStore::try_new(&conn).unwrap());
    assert_eq!(service.get_athenaeum(created.id).unwrap(), Some(created));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
