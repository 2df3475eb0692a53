//! Environment/runtime helpers
//!
//! Sanity checks to ensure the local data directory is usable at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the data directory exists and is writable.
///
/// Only the local file backend needs this; the remote backend never touches disk,
/// so callers run it when the development mode is selected.
pub async fn ensure_data_dir(data_dir: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;

    let probe = data_dir.join(".write_test");
    match tokio::fs::write(&probe, b"ok").await {
        Ok(()) => {
            let _ = tokio::fs::remove_file(&probe).await;
            info!(data_dir = %data_dir.display(), "data directory is writable");
            Ok(())
        }
        Err(e) => {
            warn!(data_dir = %data_dir.display(), error = %e, "data directory is not writable");
            Err(anyhow::anyhow!("data directory {} is not writable: {e}", data_dir.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_data_dir_creates_nested_directories() -> Result<(), anyhow::Error> {
        let root = std::env::temp_dir().join(format!("common_env_{}", uuid::Uuid::new_v4()));
        let nested = root.join("a").join("b");

        ensure_data_dir(&nested).await?;
        assert!(tokio::fs::metadata(&nested).await?.is_dir());
        // probe file is cleaned up
        assert!(tokio::fs::metadata(nested.join(".write_test")).await.is_err());

        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}
