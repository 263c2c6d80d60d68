use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::errors::OptionsStoreError;
use crate::interfaces::OptionsStore;

/// In-process options store.
#[derive(Debug, Default)]
pub struct MemoryOptionsStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryOptionsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given options.
    pub fn with_values<K: Into<String>>(values: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self {
            values: RwLock::new(values.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }
}

#[async_trait]
impl OptionsStore for MemoryOptionsStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, OptionsStoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), OptionsStoreError> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryOptionsStore::new();
        assert!(store.get("index_status").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryOptionsStore::with_values([("server", json!("http://a:9200"))]);
        store.set("server", json!("http://b:9200")).await.unwrap();

        assert_eq!(
            store.get("server").await.unwrap(),
            Some(json!("http://b:9200"))
        );
    }
}
