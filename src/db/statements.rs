//! SQL text for the fixed `test_table` workload.
//!
//! Raw statements are built by plain string concatenation. Nothing is quoted
//! or escaped: untrusted input reaching the server unchanged is what the
//! downstream proxy under test is meant to see.

use super::DatabaseBackend;
use crate::fixtures::FixtureRow;

/// Name of the only table this tool manages.
pub const TABLE_NAME: &str = "test_table";

/// Sequence backing `test_table.id` on PostgreSQL.
pub const SEQUENCE_NAME: &str = "test_table_seq";

/// Username stored with every poison record.
pub const POISON_USERNAME: &str = "poison_record";

/// Statements that (re)create `test_table`, in execution order.
pub fn create_table(backend: DatabaseBackend) -> Vec<String> {
    let mut statements = vec![format!("DROP TABLE IF EXISTS {TABLE_NAME}")];
    match backend {
        DatabaseBackend::Mysql => statements.push(format!(
            "CREATE TABLE IF NOT EXISTS {TABLE_NAME}(id int NOT NULL AUTO_INCREMENT PRIMARY KEY, \
             username VARBINARY(2000), password VARBINARY(2000), email VARBINARY(2000))"
        )),
        DatabaseBackend::Postgres => {
            statements.push(format!("DROP SEQUENCE IF EXISTS {SEQUENCE_NAME}"));
            statements.push(format!("CREATE SEQUENCE {SEQUENCE_NAME} START 1"));
            statements.push(format!(
                "CREATE TABLE IF NOT EXISTS {TABLE_NAME}(id INTEGER PRIMARY KEY DEFAULT \
                 nextval('{SEQUENCE_NAME}'), username BYTEA, password BYTEA, email BYTEA)"
            ));
        }
    }
    statements
}

/// Statements that drop `test_table` and its sequence.
pub fn drop_table(backend: DatabaseBackend) -> Vec<String> {
    let mut statements = vec![format!("DROP TABLE IF EXISTS {TABLE_NAME}")];
    if backend == DatabaseBackend::Postgres {
        statements.push(format!("DROP SEQUENCE IF EXISTS {SEQUENCE_NAME}"));
    }
    statements
}

/// INSERT with the row values spliced in verbatim.
pub fn insert_raw(row: &FixtureRow) -> String {
    format!(
        "insert into {TABLE_NAME}(username, password, email) values ('{}', '{}', '{}')",
        row.username, row.password, row.email
    )
}

/// INSERT with positional placeholders in the backend's syntax.
pub fn insert_bound(backend: DatabaseBackend) -> String {
    let placeholders = match backend {
        DatabaseBackend::Mysql => "?,?,?",
        DatabaseBackend::Postgres => "$1, $2, $3",
    };
    format!("insert into {TABLE_NAME}(username, password, email) values ({placeholders})")
}

/// INSERT of a poison record: the payload goes into password and email as
/// `'\x<hex>'` literals.
pub fn insert_poison(payload: &[u8]) -> String {
    let hexed = hex::encode(payload);
    format!(
        "insert into {TABLE_NAME}(username, password, email) values \
         ('{POISON_USERNAME}', '\\x{hexed}', '\\x{hexed}')"
    )
}

/// SELECT over the whole table, optionally filtered by id and limited.
///
/// `id` is appended as given.
pub fn select(id: Option<&str>, limit: Option<usize>) -> String {
    let mut sql = format!("select * from {TABLE_NAME}");
    if let Some(id) = id {
        sql.push_str(" where id=");
        sql.push_str(id);
    }
    if let Some(limit) = limit {
        sql.push_str(&format!(" limit {limit}"));
    }
    sql
}

/// Returns true if an ad-hoc statement produces a result set to render.
pub fn returns_rows(sql: &str) -> bool {
    let upper = sql.trim_start().to_uppercase();
    ["SELECT", "WITH", "SHOW", "VALUES", "EXPLAIN"]
        .iter()
        .any(|keyword| upper.starts_with(keyword))
}
