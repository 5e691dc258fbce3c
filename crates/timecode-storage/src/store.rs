//! Object store abstraction.

use async_trait::async_trait;

use crate::error::StorageResult;

/// Destination for the published dataset.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Human-readable location used in logs, e.g. `gs://bucket`.
    fn location(&self) -> String;

    /// Write `data` at `key`, replacing any existing object.
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()>;

    /// Check that the destination is reachable.
    async fn check_connectivity(&self) -> StorageResult<()>;
}
