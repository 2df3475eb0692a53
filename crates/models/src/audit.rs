use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-form metadata attached to an audit entry.
pub type AuditMeta = serde_json::Map<String, serde_json::Value>;

/// One recorded administrative action.
///
/// Wire shape: `{ "id": string, "ts": number, "action": string, "meta"?: object }`.
/// `meta` is omitted entirely when absent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<AuditMeta>,
}

impl AuditEntry {
    /// Fresh entry with a random v4 id stamped with the current time.
    pub fn new(action: impl Into<String>, meta: Option<AuditMeta>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ts: Utc::now().timestamp_millis(),
            action: action.into(),
            meta,
        }
    }
}
