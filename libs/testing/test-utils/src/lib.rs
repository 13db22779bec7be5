//! Shared test utilities
//!
//! - `TestCassandra`: Cassandra container with automatic cleanup
//! - `TestDataBuilder`: Deterministic test data generation
//! - `assertions`: Custom assertion helpers
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{TestCassandra, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_cassandra_test() {
//!     let cassandra = TestCassandra::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let keyspace = builder.keyspace("orders");
//!     cassandra.create_keyspace(&keyspace).await;
//! }
//! ```

use uuid::Uuid;

mod cassandra;

pub use cassandra::TestCassandra;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_query_rows");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic UUID for row keys
    pub fn id(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// A keyspace or table name that is a valid unquoted CQL identifier
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.keyspace("orders"), "test_orders_7");
    /// ```
    pub fn keyspace(&self, prefix: &str) -> String {
        // CQL identifiers are limited to 48 characters
        let mut name = format!("test_{}_{}", prefix, self.seed);
        name.truncate(48);
        name
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
