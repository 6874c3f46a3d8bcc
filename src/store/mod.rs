//! Record store implementations
//!
//! The store owns the record collection. Creation goes through
//! [`AnimalStore::insert_unique`], an atomic insert-if-absent keyed by the
//! lowercase record name, so concurrent creations of the same name cannot
//! both succeed. Readers always receive copies.

mod memory;
mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::animals::model::AnimalRecord;

/// Record store error type
#[derive(Debug, Error)]
pub enum StoreError {
    /// Redis command failure
    #[error("redis command failed: {0}")]
    Redis(#[from] ::redis::RedisError),

    /// Redis pool could not be created at startup
    #[error("failed to create redis pool: {0}")]
    PoolSetup(#[from] deadpool_redis::CreatePoolError),

    /// Redis pool could not hand out a connection
    #[error("redis pool unavailable: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    /// A stored record is missing required fields
    #[error("stored record is malformed: {0}")]
    Corrupt(String),
}

/// Storage abstraction over the record collection.
///
/// Only create and list are exposed; records are never updated or deleted.
#[async_trait]
pub trait AnimalStore: Send + Sync {
    /// Stores `record` unless another record already claims its name
    /// (case-insensitively). Returns `false` without writing when the name
    /// is taken.
    async fn insert_unique(&self, record: &AnimalRecord) -> Result<bool, StoreError>;

    /// Returns a snapshot of all records, newest-first by timestamp.
    async fn list(&self) -> Result<Vec<AnimalRecord>, StoreError>;
}
