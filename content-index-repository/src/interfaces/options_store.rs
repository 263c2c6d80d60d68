//! Options store trait definition.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::OptionsStoreError;

/// Process-wide key/value store for configuration and bulk-indexing progress.
///
/// This trait provides a clean abstraction over the underlying store. It is
/// read for static configuration (server URL, index names, timeouts) and read
/// and written for the mutable indexing progress state. Implementations must
/// not cache: every `get` observes the latest `set`.
#[async_trait]
pub trait OptionsStore: Send + Sync {
    /// Read the value stored under `key`, or `None` when it was never set.
    async fn get(&self, key: &str) -> Result<Option<Value>, OptionsStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<(), OptionsStoreError>;
}
