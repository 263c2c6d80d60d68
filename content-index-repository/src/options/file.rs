use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::debug;

use crate::errors::OptionsStoreError;
use crate::interfaces::OptionsStore;

/// Options store persisted as one JSON object in a file.
///
/// Every operation reads the file afresh. Writes go to a sibling temporary
/// file that is then renamed over the original, so a crash never leaves a
/// half-written options file behind. Concurrent writers are not coordinated.
#[derive(Debug, Clone)]
pub struct FileOptionsStore {
    path: PathBuf,
}

impl FileOptionsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Map<String, Value>, OptionsStoreError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        match serde_json::from_slice::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            other => Err(OptionsStoreError::Malformed(other.to_string())),
        }
    }

    async fn write_all(&self, values: &Map<String, Value>) -> Result<(), OptionsStoreError> {
        let tmp = self.path.with_extension("tmp");
        let raw = serde_json::to_vec_pretty(values)?;

        fs::write(&tmp, raw).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl OptionsStore for FileOptionsStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, OptionsStoreError> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), OptionsStoreError> {
        let mut values = self.read_all().await?;
        values.insert(key.to_string(), value);
        self.write_all(&values).await?;

        debug!(path = %self.path.display(), key = %key, "Option stored");
        Ok(())
    }
}
