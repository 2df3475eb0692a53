//! Service layer for site content sections and the admin audit log.
//! - Backends sit behind `storage::{SectionBackend, AuditBackend}`; callers never pick one per call.
//! - `file` keeps JSON documents under a data directory for local development.
//! - `remote` talks to the hosted key-value store over its REST API.
//! - `sections::SectionStore` and `audit::AuditLog` are the entry points used by handlers.

pub mod errors;
pub mod storage;
pub mod file;
pub mod remote;
pub mod sections;
pub mod audit;
pub mod runtime;

pub use audit::{AuditLog, AuditOutcome, DEFAULT_AUDIT_LIMIT, MAX_ENTRIES};
pub use errors::ServiceError;
pub use runtime::SiteStore;
pub use sections::{Fetched, SectionStore};
