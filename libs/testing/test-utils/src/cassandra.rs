//! Cassandra test infrastructure
//!
//! Provides a `TestCassandra` helper that runs a single-node Cassandra
//! container for testing.

use std::time::Duration;

use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

const CQL_PORT: u16 = 9042;
const READY_MESSAGE: &str = "Starting listening for CQL clients";
const CONNECT_ATTEMPTS: u32 = 30;

/// Test Cassandra wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestCassandra;
///
/// # async fn example() {
/// let cassandra = TestCassandra::new().await;
/// cassandra.create_keyspace("test_ks").await;
/// let node = cassandra.contact_point();
/// # }
/// ```
pub struct TestCassandra {
    #[allow(dead_code)]
    container: ContainerAsync<GenericImage>,
    session: Session,
    pub port: u16,
}

impl TestCassandra {
    /// Start a Cassandra 4.1 container and wait until it accepts CQL sessions
    pub async fn new() -> Self {
        let container = GenericImage::new("cassandra", "4.1")
            .with_exposed_port(CQL_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout(READY_MESSAGE))
            .with_env_var("MAX_HEAP_SIZE", "512M")
            .with_env_var("HEAP_NEWSIZE", "128M")
            .with_startup_timeout(Duration::from_secs(180))
            .start()
            .await
            .expect("Failed to start Cassandra container");

        let port = container
            .get_host_port_ipv4(CQL_PORT)
            .await
            .expect("Failed to get Cassandra port");

        let session = Self::connect(port).await;

        tracing::info!(port, "Test Cassandra ready (cassandra:4.1)");

        Self {
            container,
            session,
            port,
        }
    }

    /// The log line can precede the native transport accepting sessions by a
    /// few seconds, so connection is retried.
    async fn connect(port: u16) -> Session {
        let node = format!("127.0.0.1:{port}");
        let mut attempt = 0;

        loop {
            attempt += 1;
            match SessionBuilder::new().known_node(&node).build().await {
                Ok(session) => return session,
                Err(e) if attempt < CONNECT_ATTEMPTS => {
                    tracing::debug!(attempt, error = %e, "Cassandra not ready yet");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
                Err(e) => panic!("Failed to connect to test Cassandra: {e}"),
            }
        }
    }

    /// `127.0.0.1:<mapped port>`, usable as a cluster entry
    pub fn contact_point(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Administrative session (no keyspace, no authentication)
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Create a SimpleStrategy keyspace with replication factor 1
    pub async fn create_keyspace(&self, keyspace: &str) {
        let cql = format!(
            "CREATE KEYSPACE IF NOT EXISTS {keyspace} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': 1}}"
        );
        self.execute(&cql).await;
    }

    /// Run a statement that must succeed (DDL, fixture inserts)
    pub async fn execute(&self, cql: &str) {
        self.session
            .query_unpaged(cql, ())
            .await
            .unwrap_or_else(|e| panic!("Fixture statement failed: {cql}: {e}"));
    }
}

// Container is automatically cleaned up when TestCassandra is dropped
impl Drop for TestCassandra {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test Cassandra container");
    }
}
