//! Integration tests for the Cassandra session wrapper
//!
//! These tests run a real Cassandra node via testcontainers and are ignored
//! by default (they need Docker). Run with `cargo test -p database -- --ignored`.

use std::io::Write;

use database::cassandra::{
    CasValue, CassandraConfig, CassandraError, connect_from_config, connect_from_yaml,
};
use test_utils::{TestCassandra, TestDataBuilder, assertions::assert_some};

async fn setup(test_name: &str) -> (TestCassandra, CassandraConfig) {
    let cassandra = TestCassandra::new().await;
    let keyspace = TestDataBuilder::from_test_name(test_name).keyspace("ks");
    cassandra.create_keyspace(&keyspace).await;

    let config = CassandraConfig::new(vec![cassandra.contact_point()]).with_keyspace(keyspace);
    (cassandra, config)
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_connect_without_credentials() {
    let (_cassandra, config) = setup("connect_without_credentials").await;

    let session = connect_from_config(&config).await.unwrap();
    assert!(!session.has_authenticator());
    assert_eq!(session.config(), &config);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_connect_partial_credentials_are_ignored() {
    let (_cassandra, mut config) = setup("partial_credentials").await;
    config.username = Some("cassandra".to_string());

    let session = connect_from_config(&config).await.unwrap();
    assert!(!session.has_authenticator());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_connect_unknown_keyspace_fails() {
    let cassandra = TestCassandra::new().await;
    let config =
        CassandraConfig::new(vec![cassandra.contact_point()]).with_keyspace("no_such_keyspace");

    let err = connect_from_config(&config).await.unwrap_err();
    assert!(err.is_connection(), "unexpected error: {err}");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_connect_mixed_case_keyspace_is_case_sensitive() {
    let cassandra = TestCassandra::new().await;
    cassandra
        .execute(
            "CREATE KEYSPACE \"MixedKs\" WITH replication = \
             {'class': 'SimpleStrategy', 'replication_factor': 1}",
        )
        .await;
    cassandra
        .execute("CREATE TABLE \"MixedKs\".items (id int PRIMARY KEY)")
        .await;
    cassandra
        .execute("INSERT INTO \"MixedKs\".items (id) VALUES (1)")
        .await;

    let config = CassandraConfig::new(vec![cassandra.contact_point()]).with_keyspace("MixedKs");
    let session = connect_from_config(&config).await.unwrap();

    let rows = session.query("SELECT id FROM items").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], CasValue::Int(1));

    // The unquoted form names a different, nonexistent keyspace
    let lowered = CassandraConfig::new(vec![cassandra.contact_point()]).with_keyspace("mixedks");
    let err = connect_from_config(&lowered).await.unwrap_err();
    assert!(err.is_connection(), "unexpected error: {err}");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_connect_from_yaml() {
    let (_cassandra, config) = setup("connect_from_yaml").await;

    let yaml = format!(
        "cassandra:\n  cluster: [\"{}\"]\n  keyspace: {}\n  numConns: 2\n",
        config.cluster[0], config.keyspace
    );
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let session = connect_from_yaml(file.path()).await.unwrap();
    assert_eq!(session.config().num_conns, 2);

    let rows = session.query("SELECT key FROM system.local").await.unwrap();
    assert_eq!(rows.len(), 1);
}

// ============================================================================
// Query
// ============================================================================

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_query_system_local_returns_one_row() {
    let (_cassandra, config) = setup("system_local").await;
    let session = connect_from_config(&config).await.unwrap();

    let rows = session
        .query("SELECT key, release_version FROM system.local")
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    let key = assert_some(rows[0].get("key"), "key column");
    assert_eq!(key, &CasValue::Text("local".to_string()));
    assert!(rows[0]["release_version"].as_text().is_some());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_query_empty_table_returns_no_rows() {
    let (_cassandra, config) = setup("empty_table").await;
    let session = connect_from_config(&config).await.unwrap();

    session
        .query("CREATE TABLE empty_table (id int PRIMARY KEY, name text)")
        .await
        .unwrap();

    let rows = session.query("SELECT * FROM empty_table").await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_query_invalid_statement_is_execution_error() {
    let (_cassandra, config) = setup("invalid_statement").await;
    let session = connect_from_config(&config).await.unwrap();

    let err = session.query("SELEKT nonsense").await.unwrap_err();
    assert!(
        matches!(err, CassandraError::Execution(_)),
        "unexpected error: {err}"
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_query_decodes_scalar_kinds() {
    let (cassandra, config) = setup("scalar_kinds").await;
    let session = connect_from_config(&config).await.unwrap();
    let id = TestDataBuilder::from_test_name("scalar_kinds").id();

    cassandra
        .execute(&format!(
            "CREATE TABLE {}.scalars (id uuid PRIMARY KEY, name text, n bigint, small int, \
             ratio double, flag boolean, at timestamp, payload blob, missing text)",
            config.keyspace
        ))
        .await;
    cassandra
        .execute(&format!(
            "INSERT INTO {}.scalars (id, name, n, small, ratio, flag, at, payload) \
             VALUES ({id}, 'ada', 9000000000, 42, 0.5, true, 1700000000000, 0xcafe)",
            config.keyspace
        ))
        .await;

    let rows = session.query("SELECT * FROM scalars").await.unwrap();
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row.len(), 9);
    assert_eq!(row["id"], CasValue::Text(id.to_string()));
    assert_eq!(row["name"], CasValue::Text("ada".to_string()));
    assert_eq!(row["n"], CasValue::Int(9_000_000_000));
    assert_eq!(row["small"], CasValue::Int(42));
    assert_eq!(row["ratio"], CasValue::Float(0.5));
    assert_eq!(row["flag"], CasValue::Boolean(true));
    assert_eq!(row["at"], CasValue::Timestamp(1_700_000_000_000));
    assert_eq!(row["payload"], CasValue::Blob(vec![0xca, 0xfe]));
    assert!(row["missing"].is_null());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_query_collection_column_is_cursor_error() {
    let (cassandra, config) = setup("collection_column").await;
    let session = connect_from_config(&config).await.unwrap();

    cassandra
        .execute(&format!(
            "CREATE TABLE {}.tagged (id int PRIMARY KEY, tags list<text>)",
            config.keyspace
        ))
        .await;
    cassandra
        .execute(&format!(
            "INSERT INTO {}.tagged (id, tags) VALUES (1, ['a', 'b'])",
            config.keyspace
        ))
        .await;

    let err = session.query("SELECT * FROM tagged").await.unwrap_err();
    assert!(err.is_cursor(), "unexpected error: {err}");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_query_reads_every_page_in_order() {
    let (cassandra, config) = setup("many_pages").await;
    let session = connect_from_config(&config).await.unwrap();

    cassandra
        .execute(&format!(
            "CREATE TABLE {}.events (bucket int, seq int, PRIMARY KEY (bucket, seq))",
            config.keyspace
        ))
        .await;
    // More rows than the driver's default page size
    for seq in 0..6000 {
        cassandra
            .execute(&format!(
                "INSERT INTO {}.events (bucket, seq) VALUES (0, {seq})",
                config.keyspace
            ))
            .await;
    }

    let rows = session
        .query("SELECT seq FROM events WHERE bucket = 0")
        .await
        .unwrap();

    assert_eq!(rows.len(), 6000);
    let seqs: Vec<i64> = rows.iter().filter_map(|r| r["seq"].as_int()).collect();
    assert!(seqs.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_query_is_repeatable() {
    let (cassandra, config) = setup("repeatable").await;
    let session = connect_from_config(&config).await.unwrap();

    cassandra
        .execute(&format!(
            "CREATE TABLE {}.kv (k int PRIMARY KEY, v text)",
            config.keyspace
        ))
        .await;
    for k in 0..10 {
        cassandra
            .execute(&format!(
                "INSERT INTO {}.kv (k, v) VALUES ({k}, 'v{k}')",
                config.keyspace
            ))
            .await;
    }

    let first = session.query("SELECT k, v FROM kv").await.unwrap();
    let second = session.clone().query("SELECT k, v FROM kv").await.unwrap();
    assert_eq!(first, second);
}
