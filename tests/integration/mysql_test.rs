//! End-to-end workload against MySQL.

use std::path::PathBuf;

use poison_demo::app::{self, WorkloadOptions};
use poison_demo::config::ConnectionConfig;
use poison_demo::db::{DatabaseBackend, DatabaseClient, MySqlClient};
use poison_demo::render::BinaryEncoding;

async fn get_test_client() -> Option<MySqlClient> {
    let url = std::env::var("MYSQL_DATABASE_URL").ok()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    MySqlClient::connect(&config).await.ok()
}

#[tokio::test]
async fn test_workload_mysql() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: MYSQL_DATABASE_URL not set");
        return;
    };
    assert_eq!(client.backend(), DatabaseBackend::Mysql);

    let testdata = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demo/testdata");
    let options = WorkloadOptions {
        create: true,
        insert: 4,
        insert_bind: true,
        seed: Some(3),
        testdata,
        ..Default::default()
    };
    app::run(&client, &options, &mut Vec::new()).await.unwrap();

    let options = WorkloadOptions {
        query: Some("SELECT id, X'FFFE' AS raw FROM test_table ORDER BY id LIMIT 1".to_string()),
        encoding: BinaryEncoding::Hex,
        ..Default::default()
    };
    let mut out = Vec::new();
    app::run(&client, &options, &mut out).await.unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "id\traw\n---\t---\n1\t0xfffe\n");

    let options = WorkloadOptions {
        select: 10,
        drop: true,
        ..Default::default()
    };
    // Select runs after drop, so the table is gone.
    let err = app::run(&client, &options, &mut Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.category(), "Query Error");

    client.close().await.unwrap();
}
