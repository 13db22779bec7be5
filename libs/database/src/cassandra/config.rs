use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_list, env_parse_or};

use super::CassandraError;

/// Cassandra/ScyllaDB connection settings
///
/// Usually decoded from a YAML file whose top-level `cassandra` key wraps
/// these fields:
///
/// ```yaml
/// cassandra:
///   cluster: ["10.0.0.1", "10.0.0.2:9042"]
///   keyspace: app
///   username: cassandra
///   password: secret
///   numConns: 2
/// ```
///
/// # Example
///
/// ```ignore
/// use database::cassandra::CassandraConfig;
///
/// let config = CassandraConfig::from_yaml_file("cassandra.yml")?;
///
/// // Manual construction
/// let config = CassandraConfig::new(vec!["127.0.0.1"])
///     .with_keyspace("app")
///     .with_credentials("user", "pass");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CassandraConfig {
    /// Cluster nodes, `host` or `host:port` (port defaults to 9042)
    pub cluster: Vec<String>,

    /// Keyspace to use; empty means none
    #[serde(default)]
    pub keyspace: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Connections per host; 0 leaves the driver default
    #[serde(default)]
    pub num_conns: usize,
}

/// YAML envelope around [`CassandraConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CassandraConfigFile {
    pub cassandra: CassandraConfig,
}

impl CassandraConfig {
    /// Create a config with the given nodes and no keyspace or credentials
    pub fn new<S: Into<String>>(cluster: Vec<S>) -> Self {
        Self {
            cluster: cluster.into_iter().map(|s| s.into()).collect(),
            keyspace: String::new(),
            username: None,
            password: None,
            num_conns: 0,
        }
    }

    pub fn with_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = keyspace.into();
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_num_conns(mut self, num_conns: usize) -> Self {
        self.num_conns = num_conns;
        self
    }

    pub fn cluster(&self) -> &[String] {
        &self.cluster
    }

    /// The keyspace, if one is configured
    pub fn keyspace(&self) -> Option<&str> {
        (!self.keyspace.is_empty()).then_some(self.keyspace.as_str())
    }

    /// Username and password, only when both are non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    /// True when exactly one of username/password is set to something
    pub fn has_partial_credentials(&self) -> bool {
        let user = self.username.as_deref().is_some_and(|u| !u.is_empty());
        let pass = self.password.as_deref().is_some_and(|p| !p.is_empty());
        user != pass
    }

    /// Decode a YAML document with a top-level `cassandra` key
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CassandraError> {
        let file: CassandraConfigFile = serde_yaml::from_str(yaml)?;
        Ok(file.cassandra)
    }

    /// Read and decode a YAML config file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CassandraError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| CassandraError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml_str(&yaml)
    }
}

impl Default for CassandraConfig {
    fn default() -> Self {
        Self::new(vec!["127.0.0.1:9042"])
    }
}

impl fmt::Debug for CassandraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CassandraConfig")
            .field("cluster", &self.cluster)
            .field("keyspace", &self.keyspace)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("num_conns", &self.num_conns)
            .finish()
    }
}

/// Load CassandraConfig from environment variables
///
/// Environment variables:
/// - `CASSANDRA_CLUSTER` (required) - Comma-separated list of nodes
///   Example: "10.0.0.1,10.0.0.2:9042"
/// - `CASSANDRA_KEYSPACE` (optional) - Keyspace name
/// - `CASSANDRA_USERNAME` (optional) - Authentication username
/// - `CASSANDRA_PASSWORD` (optional) - Authentication password
/// - `CASSANDRA_NUM_CONNS` (optional, default: 0 = driver default)
#[cfg(feature = "config")]
impl FromEnv for CassandraConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            cluster: env_list("CASSANDRA_CLUSTER")?,
            keyspace: std::env::var("CASSANDRA_KEYSPACE").unwrap_or_default(),
            username: std::env::var("CASSANDRA_USERNAME").ok(),
            password: std::env::var("CASSANDRA_PASSWORD").ok(),
            num_conns: env_parse_or("CASSANDRA_NUM_CONNS", 0)?,
        })
    }
}
