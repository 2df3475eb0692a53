//! Helpers for small JSON documents kept on local disk.

use std::io::ErrorKind;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;

use crate::errors::ServiceError;

/// Create `dir` (and parents) if missing.
pub async fn ensure_dir(dir: &Path) -> Result<(), ServiceError> {
    if fs::metadata(dir).await.is_err() {
        fs::create_dir_all(dir).await?;
    }
    Ok(())
}

/// Read and parse a JSON file. A missing file is `Ok(None)`; unreadable or invalid
/// content is an error.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ServiceError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Serialize with two-space indentation and replace the file contents.
pub async fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(value)?;
    fs::write(path, data).await?;
    Ok(())
}
