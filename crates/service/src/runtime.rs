//! Backend selection
//!
//! The runtime mode is read once at startup and decides which backend family
//! serves both sections and the audit log for the life of the process.

use std::path::PathBuf;
use std::sync::Arc;

use configs::{AppConfig, RuntimeMode};
use tracing::info;

use crate::audit::AuditLog;
use crate::file::{FileAuditLog, FileSectionStore};
use crate::remote::{RemoteAuditLog, RemoteSectionStore, RestClient};
use crate::sections::SectionStore;

/// Section store and audit log wired to the same backend family.
#[derive(Clone)]
pub struct SiteStore {
    mode: RuntimeMode,
    sections: SectionStore,
    audit: AuditLog,
    remote: Option<Arc<RestClient>>,
}

impl SiteStore {
    pub fn from_config(cfg: &AppConfig) -> Self {
        let store = match cfg.storage.mode {
            RuntimeMode::Development => Self::local(cfg.storage.data_dir.clone(), cfg.audit.max_entries),
            RuntimeMode::Production => {
                let client = Arc::new(RestClient::from_settings(&cfg.remote));
                Self::remote(client, cfg.audit.key.clone(), cfg.audit.max_entries)
            }
        };
        info!(mode = store.mode.as_str(), backend = store.sections.backend_name(), "storage backend selected");
        store
    }

    /// JSON files under `data_dir`.
    pub fn local(data_dir: impl Into<PathBuf>, max_entries: usize) -> Self {
        let data_dir = data_dir.into();
        Self {
            mode: RuntimeMode::Development,
            sections: SectionStore::new(Arc::new(FileSectionStore::new(data_dir.clone()))),
            audit: AuditLog::new(Arc::new(FileAuditLog::new(data_dir))).with_max_entries(max_entries),
            remote: None,
        }
    }

    /// Hosted key-value store; the audit list lives under `audit_key`.
    pub fn remote(client: Arc<RestClient>, audit_key: impl Into<String>, max_entries: usize) -> Self {
        Self {
            mode: RuntimeMode::Production,
            sections: SectionStore::new(Arc::new(RemoteSectionStore::new(client.clone()))),
            audit: AuditLog::new(Arc::new(RemoteAuditLog::new(client.clone(), audit_key)))
                .with_max_entries(max_entries),
            remote: Some(client),
        }
    }

    pub fn mode(&self) -> RuntimeMode { self.mode }

    pub fn sections(&self) -> &SectionStore { &self.sections }

    pub fn audit(&self) -> &AuditLog { &self.audit }

    /// The REST client, when the remote backend is active.
    pub fn remote_client(&self) -> Option<&Arc<RestClient>> { self.remote.as_ref() }
}

/// Prepare the environment the selected backend needs.
///
/// Development mode checks that the data directory is writable; production has nothing to prepare.
pub async fn ensure_env(cfg: &AppConfig) -> anyhow::Result<()> {
    match cfg.storage.mode {
        RuntimeMode::Development => common::env::ensure_data_dir(&cfg.storage.data_dir).await,
        RuntimeMode::Production => Ok(()),
    }
}
