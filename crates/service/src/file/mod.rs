//! Local JSON file backends used in development mode.
//!
//! Layout under the data directory: one `<key>.json` per section plus
//! `audit.json` holding the whole audit list, newest first.

pub mod audit_log;
pub mod section_store;

pub use audit_log::{FileAuditLog, AUDIT_FILE};
pub use section_store::FileSectionStore;
