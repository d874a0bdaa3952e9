//! Workload driver tests against the mock client and the bundled corpora.

use std::path::PathBuf;

use poison_demo::app::{self, WorkloadOptions};
use poison_demo::db::{text_cell, DatabaseBackend, MockDatabaseClient};
use poison_demo::fixtures::{FixtureSet, POOL_SIZE};
use poison_demo::render::BinaryEncoding;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn testdata() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demo/testdata")
}

#[test]
fn test_bundled_corpora_cover_pool() {
    let fixtures = FixtureSet::load(&testdata()).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..100 {
        let row = fixtures.next_row(&mut rng).unwrap();
        assert!(!row.username.is_empty());
        assert!(row.email.contains('@'));
    }
}

#[tokio::test]
async fn test_full_run_order() {
    let client = MockDatabaseClient::for_backend(DatabaseBackend::Mysql)
        .with_result(&["id", "email"], vec![vec![text_cell("1"), Some(vec![0xde, 0xad])]]);
    let options = WorkloadOptions {
        create: true,
        insert: POOL_SIZE,
        insert_poison: Some("3q0=".to_string()),
        select: 1,
        query: Some("select count(*) from test_table".to_string()),
        encoding: BinaryEncoding::Hex,
        testdata: testdata(),
        seed: Some(2024),
        ..Default::default()
    };

    let mut out = Vec::new();
    app::run(&client, &options, &mut out).await.unwrap();

    let executed: Vec<String> = client.executed().into_iter().map(|s| s.sql).collect();
    // DROP + CREATE, 25 inserts, poison, select, ad-hoc query
    assert_eq!(executed.len(), 2 + POOL_SIZE + 1 + 1 + 1);
    assert!(executed[0].starts_with("DROP TABLE"));
    assert!(executed[1].starts_with("CREATE TABLE"));
    assert!(executed[2..2 + POOL_SIZE]
        .iter()
        .all(|sql| sql.starts_with("insert into test_table")));
    assert!(executed[2 + POOL_SIZE].contains("'\\xdead'"));
    assert_eq!(executed[3 + POOL_SIZE], "select * from test_table limit 1");
    assert_eq!(executed[4 + POOL_SIZE], "select count(*) from test_table");

    let table = "id\temail\n---\t---\n1\t0xdead\n";
    assert_eq!(String::from_utf8(out).unwrap(), format!("{table}{table}"));
}

#[tokio::test]
async fn test_insert_over_pool_size_rejected() {
    let client = MockDatabaseClient::new();
    let options = WorkloadOptions {
        insert: POOL_SIZE + 1,
        testdata: testdata(),
        ..Default::default()
    };

    let err = app::run(&client, &options, &mut Vec::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Too much to insert"));
    assert!(client.executed().is_empty());
}
