//! Cassandra/ScyllaDB session wrapper
//!
//! Loads connection settings from YAML (or the environment), opens a session
//! with a fixed set of driver policies and runs ad-hoc CQL, returning every
//! row as a column-name → [`CasValue`] map.
//! Uses the `scylla` driver which is compatible with both Apache Cassandra
//! and ScyllaDB.
//!
//! # Example
//!
//! ```ignore
//! use database::cassandra::{connect_from_config, connect_from_yaml, CassandraConfig};
//!
//! // From a YAML file with a top-level `cassandra` key
//! let session = connect_from_yaml("cassandra.yml").await?;
//!
//! // From a config built in code
//! let config = CassandraConfig::new(vec!["127.0.0.1"])
//!     .with_keyspace("mykeyspace")
//!     .with_credentials("user", "password");
//! let session = connect_from_config(&config).await?;
//!
//! for row in session.query("SELECT * FROM users").await? {
//!     println!("{:?}", row.get("name"));
//! }
//! ```

mod config;
mod connector;
mod error;
pub mod policy;
mod value;

pub use config::{CassandraConfig, CassandraConfigFile};
pub use connector::{CassandraSession, connect_from_config, connect_from_yaml};
pub use error::{CassandraError, ConnectionError, CursorError};
pub use value::{CasRow, CasRows, CasValue};

// Re-export scylla types for convenience
pub use scylla::client::session::Session;
pub use scylla::value::CqlValue;
