use std::path::PathBuf;

use async_trait::async_trait;
use models::AuditEntry;
use tracing::{instrument, warn};

use crate::errors::ServiceError;
use crate::storage::json_file::{ensure_dir, read_json, write_json_pretty};
use crate::storage::AuditBackend;

pub const AUDIT_FILE: &str = "audit.json";

/// Whole audit list kept in a single JSON array file, newest first.
///
/// Appends are load-modify-save without locking: concurrent appenders can
/// overwrite each other's entry.
#[derive(Clone, Debug)]
pub struct FileAuditLog {
    dir: PathBuf,
    file_path: PathBuf,
}

impl FileAuditLog {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        let dir = dir.into();
        let file_path = dir.join(AUDIT_FILE);
        Self { dir, file_path }
    }

    pub fn file_path(&self) -> &std::path::Path { &self.file_path }

    /// A missing file and a literal `null` both load as an empty list.
    async fn load(&self) -> Result<Vec<AuditEntry>, ServiceError> {
        ensure_dir(&self.dir).await?;
        let entries = read_json::<Option<Vec<AuditEntry>>>(&self.file_path).await?;
        Ok(entries.flatten().unwrap_or_default())
    }

    async fn save(&self, entries: &[AuditEntry]) -> Result<(), ServiceError> {
        ensure_dir(&self.dir).await?;
        write_json_pretty(&self.file_path, entries).await
    }
}

#[async_trait]
impl AuditBackend for FileAuditLog {
    fn name(&self) -> &'static str { "file" }

    #[instrument(skip(self, entry), fields(action = %entry.action))]
    async fn append(&self, entry: &AuditEntry, max_entries: usize) -> Result<(), ServiceError> {
        let mut entries = match self.load().await {
            Ok(entries) => entries,
            Err(e) => {
                // an unreadable list is replaced rather than blocking new entries
                warn!(path = %self.file_path.display(), error = %e, "audit file unreadable; starting a new list");
                Vec::new()
            }
        };
        entries.insert(0, entry.clone());
        entries.truncate(max_entries);
        self.save(&entries).await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, ServiceError> {
        let mut entries = self.load().await?;
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log() -> FileAuditLog {
        FileAuditLog::new(std::env::temp_dir().join(format!("file_audit_{}", uuid::Uuid::new_v4())))
    }

    async fn cleanup(log: &FileAuditLog) {
        if let Some(dir) = log.file_path().parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }

    #[tokio::test]
    async fn append_inserts_at_head_and_truncates() -> Result<(), anyhow::Error> {
        let log = temp_log();
        for i in 0..5 {
            log.append(&AuditEntry::new(format!("a{i}"), None), 3).await?;
        }
        let entries = log.recent(10).await?;
        let actions: Vec<_> = entries.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["a4", "a3", "a2"]);
        cleanup(&log).await;
        Ok(())
    }

    #[tokio::test]
    async fn null_and_missing_files_are_empty() -> Result<(), anyhow::Error> {
        let log = temp_log();
        assert!(log.recent(5).await?.is_empty());

        tokio::fs::write(log.file_path(), b"null").await?;
        assert!(log.recent(5).await?.is_empty());
        cleanup(&log).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_errors_on_read_but_is_replaced_on_append() -> Result<(), anyhow::Error> {
        let log = temp_log();
        log.load().await?;
        tokio::fs::write(log.file_path(), b"[{\"id\": ").await?;
        assert!(log.recent(5).await.is_err());

        log.append(&AuditEntry::new("recover", None), 500).await?;
        let entries = log.recent(5).await?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "recover");
        cleanup(&log).await;
        Ok(())
    }
}
