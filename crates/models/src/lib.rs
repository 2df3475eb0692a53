//! Data records persisted by the site store.
//!
//! - `audit`: the audit log entry and its wire shape.
//! - `sections`: well-known section keys and their payload records.

pub mod audit;
pub mod sections;

pub use audit::{AuditEntry, AuditMeta};
pub use sections::{AboutSection, FeaturedData, ProfileData, Project, ProjectTag, SiteSection};
