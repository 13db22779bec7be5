use std::fmt;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use futures::TryStreamExt;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::client::{Compression, PoolSize};
use scylla::policies::host_filter::AllowListHostFilter;
use scylla::value::Row;
use tracing::{debug, info, instrument, warn};

use super::error::{ConnectionError, CursorError};
use super::policy::{execution_profile, with_default_port};
use super::value::{CasRows, decode_row};
use super::{CassandraConfig, CassandraError};

/// A connected session plus the configuration it was opened with.
///
/// Cloning is cheap; clones share the underlying driver session and may be
/// used concurrently.
#[derive(Clone)]
pub struct CassandraSession {
    session: Arc<Session>,
    config: CassandraConfig,
    authenticated: bool,
}

impl CassandraSession {
    /// The configuration used to open this session
    pub fn config(&self) -> &CassandraConfig {
        &self.config
    }

    /// Whether a password authenticator was attached
    pub fn has_authenticator(&self) -> bool {
        self.authenticated
    }

    /// The underlying driver session
    pub fn inner(&self) -> &Arc<Session> {
        &self.session
    }

    /// Execute `cql` and collect every resulting row.
    ///
    /// Pages are fetched transparently until the cursor is exhausted. Rows
    /// keep cursor order. Statements that return no rows yield an empty vec.
    /// Any failure after execution discards the rows gathered so far.
    ///
    /// # Example
    /// ```ignore
    /// let rows = session.query("SELECT key, release_version FROM system.local").await?;
    /// println!("{:?}", rows[0].get("release_version"));
    /// ```
    #[instrument(skip(self), err)]
    pub async fn query(&self, cql: &str) -> Result<CasRows, CassandraError> {
        let pager = self.session.query_iter(cql, ()).await?;

        let mut stream = pager.rows_stream::<Row>().map_err(CursorError::from)?;
        let columns: Vec<String> = stream
            .column_specs()
            .iter()
            .map(|spec| spec.name().to_string())
            .collect();

        let mut rows = CasRows::new();
        while let Some(row) = stream.try_next().await.map_err(CursorError::from)? {
            rows.push(decode_row(&columns, row)?);
        }

        debug!(rows = rows.len(), "Query complete");
        Ok(rows)
    }
}

impl fmt::Debug for CassandraSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CassandraSession")
            .field("config", &self.config)
            .field("authenticated", &self.authenticated)
            .finish_non_exhaustive()
    }
}

/// Read a YAML config file and connect with it
///
/// Config errors are returned before any connection is attempted.
///
/// # Example
/// ```ignore
/// use database::cassandra::connect_from_yaml;
///
/// let session = connect_from_yaml("config/cassandra.yml").await?;
/// let rows = session.query("SELECT * FROM users").await?;
/// ```
pub async fn connect_from_yaml(path: impl AsRef<Path>) -> Result<CassandraSession, CassandraError> {
    let config = CassandraConfig::from_yaml_file(path)?;
    connect_from_config(&config).await
}

/// Connect using a CassandraConfig
///
/// Every session gets the same policies: only the configured nodes are used
/// (peer discovery is filtered out), token-aware round-robin routing, snappy
/// compression, `LOCAL_QUORUM`, a 10 second request timeout and at most three
/// retries per request. Credentials are attached only when both username and
/// password are non-empty.
///
/// # Example
/// ```ignore
/// use database::cassandra::{CassandraConfig, connect_from_config};
///
/// let config = CassandraConfig::new(vec!["127.0.0.1"]).with_keyspace("mykeyspace");
/// let session = connect_from_config(&config).await?;
/// ```
#[instrument(skip(config), fields(cluster = ?config.cluster, keyspace = %config.keyspace), err)]
pub async fn connect_from_config(
    config: &CassandraConfig,
) -> Result<CassandraSession, CassandraError> {
    info!("Attempting to connect to Cassandra");

    let nodes: Vec<String> = config
        .cluster
        .iter()
        .map(|node| with_default_port(node))
        .collect();

    let host_filter = allow_list(&nodes).await?;

    let mut builder = SessionBuilder::new()
        .known_nodes(&nodes)
        .host_filter(Arc::new(host_filter))
        .compression(Some(Compression::Snappy))
        .default_execution_profile_handle(execution_profile().into_handle());

    if let Some(pool) = NonZeroUsize::new(config.num_conns) {
        builder = builder.pool_size(PoolSize::PerHost(pool));
    }

    if let Some(keyspace) = config.keyspace() {
        builder = builder
            .use_keyspace(keyspace, true)
            .keyspaces_to_fetch([keyspace]);
    }

    let authenticated = match config.credentials() {
        Some((username, password)) => {
            builder = builder.user(username, password);
            true
        }
        None => {
            if config.has_partial_credentials() {
                warn!("Only one of username/password is set; connecting without authentication");
            }
            false
        }
    };

    let session: Session = builder.build().await?;

    info!(authenticated, "Successfully connected to Cassandra");
    Ok(CassandraSession {
        session: Arc::new(session),
        config: config.clone(),
        authenticated,
    })
}

async fn allow_list(nodes: &[String]) -> Result<AllowListHostFilter, ConnectionError> {
    let mut addrs: Vec<SocketAddr> = Vec::with_capacity(nodes.len());
    for node in nodes {
        let resolved = tokio::net::lookup_host(node.as_str())
            .await
            .map_err(|source| ConnectionError::Resolve {
                node: node.clone(),
                source,
            })?;
        addrs.extend(resolved);
    }

    // Resolved addresses never fail a second lookup.
    AllowListHostFilter::new(addrs).map_err(|source| ConnectionError::Resolve {
        node: nodes.join(","),
        source,
    })
}
