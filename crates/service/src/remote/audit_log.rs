use std::sync::Arc;

use async_trait::async_trait;
use models::AuditEntry;
use serde_json::Value;
use tracing::{instrument, warn};

use crate::errors::ServiceError;
use crate::storage::AuditBackend;

use super::client::RestClient;

/// Audit list stored as a remote list of JSON strings, newest at index 0.
///
/// Append is `LPUSH` followed by `LTRIM`: two round trips that another writer
/// can interleave with, though each is atomic on the store.
#[derive(Clone, Debug)]
pub struct RemoteAuditLog {
    client: Arc<RestClient>,
    key: String,
}

impl RemoteAuditLog {
    pub fn new(client: Arc<RestClient>, key: impl Into<String>) -> Self {
        Self { client, key: key.into() }
    }

    fn parse(&self, raw: Value) -> Option<AuditEntry> {
        let parsed = match &raw {
            Value::String(s) => serde_json::from_str(s),
            _ => serde_json::from_value(raw.clone()),
        };
        match parsed {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(key = %self.key, raw = %raw, error = %e, "dropping unreadable audit entry");
                None
            }
        }
    }
}

#[async_trait]
impl AuditBackend for RemoteAuditLog {
    fn name(&self) -> &'static str { "remote" }

    #[instrument(skip(self, entry), fields(key = %self.key, action = %entry.action))]
    async fn append(&self, entry: &AuditEntry, max_entries: usize) -> Result<(), ServiceError> {
        let text = serde_json::to_string(entry)?;
        self.client.lpush(&self.key, &text).await?;
        let stop = i64::try_from(max_entries).unwrap_or(i64::MAX) - 1;
        self.client.ltrim(&self.key, 0, stop).await
    }

    #[instrument(skip(self), fields(key = %self.key))]
    async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, ServiceError> {
        // LRANGE 0 -1 would mean "everything"
        if limit == 0 {
            return Ok(Vec::new());
        }
        let stop = i64::try_from(limit).unwrap_or(i64::MAX) - 1;
        let raw = self.client.lrange(&self.key, 0, stop).await?;
        Ok(raw.into_iter().filter_map(|v| self.parse(v)).collect())
    }
}
