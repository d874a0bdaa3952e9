//! End-to-end workload against PostgreSQL.

use std::path::PathBuf;

use poison_demo::app::{self, WorkloadOptions};
use poison_demo::config::ConnectionConfig;
use poison_demo::db::{DatabaseClient, PostgresClient};
use poison_demo::render::BinaryEncoding;
use pretty_assertions::assert_eq;

/// Helper to get test database URL from environment.
fn get_test_database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

/// Helper to create a test client.
async fn get_test_client() -> Option<PostgresClient> {
    let url = get_test_database_url()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    PostgresClient::connect(&config).await.ok()
}

fn testdata() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demo/testdata")
}

// The table is shared, so the whole flow lives in one test.
#[tokio::test]
async fn test_poison_roundtrip_postgres() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let create = WorkloadOptions {
        create: true,
        insert_poison: Some("//4A".to_string()),
        testdata: testdata(),
        ..Default::default()
    };
    app::run(&client, &create, &mut Vec::new()).await.unwrap();

    let select = WorkloadOptions {
        id: Some("1".to_string()),
        encoding: BinaryEncoding::Hex,
        ..Default::default()
    };
    let mut out = Vec::new();
    app::run(&client, &select, &mut out).await.unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "id\tusername\tpassword\temail\n\
         ---\t---\t---\t---\n\
         1\tpoison_record\t0xfffe00\t0xfffe00\n"
    );

    let select = WorkloadOptions {
        id: Some("1".to_string()),
        ..Default::default()
    };
    let mut out = Vec::new();
    app::run(&client, &select, &mut out).await.unwrap();
    assert!(String::from_utf8(out).unwrap().ends_with("\t__4A\t__4A\n"));

    let insert = WorkloadOptions {
        insert: 5,
        insert_bind: true,
        seed: Some(7),
        testdata: testdata(),
        ..Default::default()
    };
    app::run(&client, &insert, &mut Vec::new()).await.unwrap();

    let insert = WorkloadOptions {
        insert: 3,
        seed: Some(8),
        testdata: testdata(),
        ..Default::default()
    };
    app::run(&client, &insert, &mut Vec::new()).await.unwrap();

    let select = WorkloadOptions {
        select: 25,
        ..Default::default()
    };
    let mut out = Vec::new();
    app::run(&client, &select, &mut out).await.unwrap();
    // header + separator + 1 poison row + 8 fixture rows
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 11);

    let drop = WorkloadOptions {
        drop: true,
        ..Default::default()
    };
    app::run(&client, &drop, &mut Vec::new()).await.unwrap();

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_empty_result_keeps_header() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let options = WorkloadOptions {
        query: Some("SELECT 1 AS a, 'x' AS b WHERE false".to_string()),
        ..Default::default()
    };
    let mut out = Vec::new();
    app::run(&client, &options, &mut out).await.unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "a\tb\n---\t---\n");

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_syntax_error_is_query_error() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let options = WorkloadOptions {
        query: Some("SELEC nothing".to_string()),
        ..Default::default()
    };
    let err = app::run(&client, &options, &mut Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.category(), "Query Error");

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_adhoc_query_prints_dates_and_numerics() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let options = WorkloadOptions {
        query: Some("SELECT 1 AS id, '2000-01-10'::date AS d, 2.5::numeric AS n".to_string()),
        ..Default::default()
    };
    let mut out = Vec::new();
    app::run(&client, &options, &mut out).await.unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "id\td\tn\n---\t---\t---\n1\t2000-01-10\t2.5\n"
    );

    client.close().await.unwrap();
}
