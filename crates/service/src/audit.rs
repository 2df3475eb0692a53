use std::sync::Arc;

use models::{AuditEntry, AuditMeta};
use tracing::{error, info, instrument, warn};

use crate::sections::Fetched;
use crate::storage::AuditBackend;

/// Retained entries unless configured otherwise.
pub const MAX_ENTRIES: usize = 500;
/// Page size used when a caller does not ask for a specific limit.
pub const DEFAULT_AUDIT_LIMIT: usize = 100;

/// What happened to an audit write. Audit logging never fails the caller's operation.
#[derive(Clone, Debug, PartialEq)]
pub enum AuditOutcome {
    Recorded(AuditEntry),
    Dropped { entry: AuditEntry, reason: String },
}

impl AuditOutcome {
    pub fn entry(&self) -> &AuditEntry {
        match self {
            Self::Recorded(entry) | Self::Dropped { entry, .. } => entry,
        }
    }

    pub fn is_recorded(&self) -> bool { matches!(self, Self::Recorded(_)) }
}

/// Bounded, newest-first log of administrative actions.
#[derive(Clone)]
pub struct AuditLog {
    backend: Arc<dyn AuditBackend>,
    max_entries: usize,
}

impl AuditLog {
    pub fn new(backend: Arc<dyn AuditBackend>) -> Self {
        Self { backend, max_entries: MAX_ENTRIES }
    }

    /// Cap on retained entries; values below 1 are raised to 1.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn max_entries(&self) -> usize { self.max_entries }

    pub fn backend_name(&self) -> &'static str { self.backend.name() }

    /// Record `action` at the head of the log and trim the tail.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::{AuditLog, storage::mock::MemoryBackend};
    /// let log = AuditLog::new(Arc::new(MemoryBackend::new()));
    /// tokio_test::block_on(log.log("login", None));
    /// tokio_test::block_on(log.log("logout", None));
    /// let recent = tokio_test::block_on(log.recent(2)).into_inner();
    /// assert_eq!(recent[0].action, "logout");
    /// assert_eq!(recent[1].action, "login");
    /// ```
    #[instrument(skip(self, meta), fields(backend = self.backend.name()))]
    pub async fn log(&self, action: &str, meta: Option<AuditMeta>) -> AuditOutcome {
        let entry = AuditEntry::new(action, meta);
        match self.backend.append(&entry, self.max_entries).await {
            Ok(()) => {
                info!(id = %entry.id, "audit entry recorded");
                AuditOutcome::Recorded(entry)
            }
            Err(e) => {
                error!(id = %entry.id, error = %e, "audit log write failed");
                AuditOutcome::Dropped { entry, reason: e.to_string() }
            }
        }
    }

    /// Up to `limit` entries, newest first. Read failures yield an empty fallback list.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn recent(&self, limit: usize) -> Fetched<Vec<AuditEntry>> {
        match self.backend.recent(limit).await {
            Ok(mut entries) => {
                entries.truncate(limit);
                Fetched::Stored(entries)
            }
            Err(e) => {
                warn!(error = %e, "audit log read failed; returning empty list");
                Fetched::Fallback(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::MemoryBackend;
    use serde_json::json;

    fn meta(user: &str) -> Option<AuditMeta> {
        json!({ "user": user }).as_object().cloned()
    }

    #[tokio::test]
    async fn login_logout_scenario() {
        let log = AuditLog::new(Arc::new(MemoryBackend::new()));
        assert!(log.log("login", meta("a")).await.is_recorded());
        assert!(log.log("logout", meta("a")).await.is_recorded());

        let recent = log.recent(2).await;
        assert!(recent.is_stored());
        let entries = recent.into_inner();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "logout");
        assert_eq!(entries[1].action, "login");
        assert_eq!(entries[1].meta, meta("a"));
    }

    #[tokio::test]
    async fn list_is_bounded_to_max_entries() {
        let backend = Arc::new(MemoryBackend::new());
        let log = AuditLog::new(backend.clone());
        let mut first_id = None;
        for i in 0..=MAX_ENTRIES {
            let outcome = log.log(&format!("action-{i}"), None).await;
            if i == 0 {
                first_id = Some(outcome.entry().id.clone());
            }
        }
        assert_eq!(backend.audit_len(), MAX_ENTRIES);

        let all = log.recent(MAX_ENTRIES + 10).await.into_inner();
        assert_eq!(all.len(), MAX_ENTRIES);
        assert_eq!(all[0].action, format!("action-{MAX_ENTRIES}"));
        assert!(all.iter().all(|e| Some(&e.id) != first_id.as_ref()));
    }

    #[tokio::test]
    async fn limit_is_respected() {
        let log = AuditLog::new(Arc::new(MemoryBackend::new()));
        for i in 0..5 {
            log.log(&format!("a{i}"), None).await;
        }
        assert!(log.recent(0).await.into_inner().is_empty());
        assert_eq!(log.recent(3).await.into_inner().len(), 3);
        assert_eq!(log.recent(50).await.into_inner().len(), 5);
    }

    #[tokio::test]
    async fn write_failures_are_dropped_not_raised() {
        let log = AuditLog::new(Arc::new(MemoryBackend::failing_writes()));
        match log.log("login", None).await {
            AuditOutcome::Dropped { entry, reason } => {
                assert_eq!(entry.action, "login");
                assert!(reason.contains("simulated"));
            }
            other => panic!("expected Dropped, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn read_failures_fall_back_to_empty() {
        let log = AuditLog::new(Arc::new(MemoryBackend::failing_reads()));
        assert_eq!(log.recent(10).await, Fetched::Fallback(Vec::new()));
    }

    #[tokio::test]
    async fn custom_cap_is_applied() {
        let backend = Arc::new(MemoryBackend::new());
        let log = AuditLog::new(backend.clone()).with_max_entries(2);
        for i in 0..4 {
            log.log(&format!("a{i}"), None).await;
        }
        assert_eq!(backend.audit_len(), 2);
        assert_eq!(AuditLog::new(backend).with_max_entries(0).max_entries(), 1);
    }
}
