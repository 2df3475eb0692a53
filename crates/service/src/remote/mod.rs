//! Remote key-value store reached over its REST API (production mode).

pub mod audit_log;
pub mod client;
pub mod section_store;

pub use audit_log::RemoteAuditLog;
pub use client::RestClient;
pub use section_store::RemoteSectionStore;
