//! Database library providing a configuration-driven Cassandra/ScyllaDB client
//!
//! A session is opened from a YAML file (or a config built in code or read
//! from the environment) and exposes a single generic query method returning
//! untyped rows.
//!
//! # Features
//!
//! - `config` (default) - `CassandraConfig::from_env` via `core_config::FromEnv`
//!
//! # Examples
//!
//! ```ignore
//! use database::cassandra;
//!
//! let session = cassandra::connect_from_yaml("cassandra.yml").await?;
//! let rows = session.query("SELECT release_version FROM system.local").await?;
//! assert_eq!(rows.len(), 1);
//! ```

pub mod cassandra;

pub use cassandra::{CassandraError, CassandraSession};
