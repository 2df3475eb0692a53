use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use crate::errors::ServiceError;
use crate::storage::SectionBackend;

use super::client::RestClient;

/// Sections stored as JSON text, one remote key per section.
#[derive(Clone, Debug)]
pub struct RemoteSectionStore {
    client: Arc<RestClient>,
}

impl RemoteSectionStore {
    pub fn new(client: Arc<RestClient>) -> Self { Self { client } }
}

#[async_trait]
impl SectionBackend for RemoteSectionStore {
    fn name(&self) -> &'static str { "remote" }

    /// Strings are parsed as JSON; structured results (some proxies decode for us)
    /// pass through. Null or an empty string means nothing is stored.
    #[instrument(skip(self))]
    async fn read(&self, key: &str) -> Result<Option<Value>, ServiceError> {
        match self.client.get(key).await? {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => serde_json::from_str(&s).map(Some).map_err(|_| ServiceError::unexpected(key, s)),
            v @ (Value::Object(_) | Value::Array(_)) => Ok(Some(v)),
            other => Err(ServiceError::unexpected(key, other.to_string())),
        }
    }

    #[instrument(skip(self, value))]
    async fn write(&self, key: &str, value: &Value) -> Result<(), ServiceError> {
        let text = serde_json::to_string(value)?;
        self.client.set(key, &text).await
    }
}
