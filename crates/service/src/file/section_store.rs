use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::ServiceError;
use crate::storage::json_file::{ensure_dir, read_json, write_json_pretty};
use crate::storage::SectionBackend;

use super::audit_log::AUDIT_FILE;

/// File storage: one pretty-printed JSON document per section key.
#[derive(Clone, Debug)]
pub struct FileSectionStore {
    dir: PathBuf,
}

impl FileSectionStore {
    /// The directory is created lazily on first access.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path { &self.dir }

    /// `<dir>/<key>.json`, refusing keys that would leave the data directory
    /// or collide with the audit file.
    fn path_for(&self, key: &str) -> Result<PathBuf, ServiceError> {
        let file_name = format!("{key}.json");
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") || file_name == AUDIT_FILE {
            return Err(ServiceError::invalid_key(key));
        }
        Ok(self.dir.join(file_name))
    }
}

#[async_trait]
impl SectionBackend for FileSectionStore {
    fn name(&self) -> &'static str { "file" }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn read(&self, key: &str) -> Result<Option<Value>, ServiceError> {
        let path = self.path_for(key)?;
        ensure_dir(&self.dir).await?;
        let value = read_json::<Value>(&path).await?;
        debug!(found = value.is_some(), "section file read");
        Ok(value)
    }

    #[instrument(skip(self, value), fields(dir = %self.dir.display()))]
    async fn write(&self, key: &str, value: &Value) -> Result<(), ServiceError> {
        let path = self.path_for(key)?;
        ensure_dir(&self.dir).await?;
        write_json_pretty(&path, value).await?;
        debug!(path = %path.display(), "section file written");
        Ok(())
    }
}
