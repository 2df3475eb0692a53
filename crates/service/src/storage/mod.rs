//! Storage abstractions for the service layer
//!
//! Backends implement the two contracts below; `SectionStore` and `AuditLog`
//! hold them as trait objects chosen once at startup.

pub mod json_file;
pub mod mock;

use async_trait::async_trait;
use models::AuditEntry;
use serde_json::Value;

use crate::errors::ServiceError;

/// Named JSON documents, overwritten wholesale on every write.
/// Implementations can be file-backed or remote KV.
#[async_trait]
pub trait SectionBackend: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    /// `Ok(None)` when nothing is stored under `key`.
    async fn read(&self, key: &str) -> Result<Option<Value>, ServiceError>;

    async fn write(&self, key: &str, value: &Value) -> Result<(), ServiceError>;
}

/// Newest-first list of audit entries bounded to a maximum length.
#[async_trait]
pub trait AuditBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Insert `entry` at the head, then drop everything past `max_entries`.
    async fn append(&self, entry: &AuditEntry, max_entries: usize) -> Result<(), ServiceError>;

    /// At most `limit` entries, head first.
    async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, ServiceError>;
}
