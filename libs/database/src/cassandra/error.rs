use std::path::PathBuf;

use scylla::deserialize::TypeCheckError;
use scylla::errors::{NewSessionError, NextRowError, PagerExecutionError};

/// Error type for Cassandra operations
///
/// One variant per stage: loading configuration (`Io`, `Decode`), opening the
/// session (`Connection`), running a statement (`Execution`) and draining its
/// result cursor (`Cursor`).
#[derive(Debug, thiserror::Error)]
pub enum CassandraError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode config: {0}")]
    Decode(#[from] serde_yaml::Error),

    #[error("Connection failed: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Execution error: {0}")]
    Execution(#[from] PagerExecutionError),

    #[error("Cursor error: {0}")]
    Cursor(#[from] CursorError),
}

/// Why a session could not be established
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("could not resolve cluster node '{node}': {source}")]
    Resolve {
        node: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Session(#[from] NewSessionError),
}

/// Failure while iterating over the rows of a result
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    #[error("result metadata rejected: {0}")]
    TypeCheck(#[from] TypeCheckError),

    #[error(transparent)]
    NextRow(#[from] NextRowError),

    #[error("column '{column}' has unsupported type {kind}")]
    UnsupportedType { column: String, kind: &'static str },

    #[error("column '{column}' holds a {kind} outside the representable range")]
    OutOfRange { column: String, kind: &'static str },

    #[error("row has {actual} cells but the result declares {expected} columns")]
    ColumnCount { expected: usize, actual: usize },
}

impl From<NewSessionError> for CassandraError {
    fn from(err: NewSessionError) -> Self {
        CassandraError::Connection(ConnectionError::Session(err))
    }
}

impl CassandraError {
    pub fn is_connection(&self) -> bool {
        matches!(self, CassandraError::Connection(_))
    }

    pub fn is_execution(&self) -> bool {
        matches!(self, CassandraError::Execution(_))
    }

    pub fn is_cursor(&self) -> bool {
        matches!(self, CassandraError::Cursor(_))
    }
}
