//! Minimal REST client for a Redis-compatible key-value store.
//!
//! Every command is a `POST` of a JSON array (`["SET", "profile", "{..}"]`) to the
//! base URL with a bearer token. The store answers `{"result": ...}` on success
//! and `{"error": "..."}` when it rejects the command.

use std::time::Duration;

use configs::remote::mask;
use configs::RemoteSettings;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::errors::ServiceError;

#[derive(Clone)]
struct Endpoint {
    url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Shared handle to the remote store. Cheap to clone; immutable after construction.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    endpoint: Option<Endpoint>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient").field("endpoint", &self.endpoint_hint()).finish()
    }
}

impl RestClient {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        let url = url.into().trim_end_matches('/').to_string();
        Self { http: reqwest::Client::new(), endpoint: Some(Endpoint { url, token: token.into() }) }
    }

    /// A client without credentials; every command fails with [`ServiceError::Config`].
    pub fn unconfigured() -> Self {
        Self { http: reqwest::Client::new(), endpoint: None }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        match reqwest::Client::builder().timeout(timeout).build() {
            Ok(http) => self.http = http,
            Err(e) => warn!(error = %e, "cannot build http client with timeout; using defaults"),
        }
        self
    }

    /// Build from resolved settings, logging which construction path was taken.
    ///
    /// Preference: resolved credentials with an `https://` URL, then the
    /// `UPSTASH_REDIS_REST_*` pair read verbatim, then an unconfigured client
    /// whose failure surfaces on first use.
    pub fn from_settings(settings: &RemoteSettings) -> Self {
        let timeout = Duration::from_secs(settings.request_timeout_secs);
        let resolved = &settings.resolved;

        let client = match (&resolved.url, &resolved.token) {
            (Some(url), Some(token)) if resolved.is_rest() => {
                info!(url = %resolved.masked_url(), "using remote store with REST URL");
                Self::new(url.clone(), token.clone())
            }
            (Some(url), Some(_)) => {
                error!(url = %mask(url, 20), "invalid remote store URL format; expected https://");
                Self::from_env_default(settings)
            }
            _ => {
                info!("no resolved remote credentials; using UPSTASH_REDIS_REST_* fallback");
                Self::from_env_default(settings)
            }
        };
        client.with_timeout(timeout)
    }

    fn from_env_default(settings: &RemoteSettings) -> Self {
        match (&settings.env_default.url, &settings.env_default.token) {
            (Some(url), Some(token)) => Self::new(url.clone(), token.clone()),
            _ => {
                warn!("remote store credentials missing; commands will fail until configured");
                Self::unconfigured()
            }
        }
    }

    pub fn is_configured(&self) -> bool { self.endpoint.is_some() }

    /// URL prefix safe for logs and diagnostics.
    pub fn endpoint_hint(&self) -> String {
        self.endpoint.as_ref().map(|e| mask(&e.url, 30)).unwrap_or_else(|| "<unconfigured>".to_string())
    }

    /// Send one command and return its `result`.
    pub async fn command(&self, args: &[&str]) -> Result<Value, ServiceError> {
        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or_else(|| ServiceError::Config("set UPSTASH_REDIS_REST_URL and UPSTASH_REDIS_REST_TOKEN".into()))?;
        let name = args.first().copied().unwrap_or_default();
        debug!(command = name, "remote command");

        let resp = self.http.post(&endpoint.url).bearer_auth(&endpoint.token).json(args).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        let parsed: CommandResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::Remote(format!("{name}: unreadable response (status {status}): {e}")))?;

        if let Some(err) = parsed.error {
            return Err(ServiceError::Command(format!("{name}: {err}")));
        }
        if !status.is_success() {
            return Err(ServiceError::Remote(format!("{name}: http status {status}")));
        }
        Ok(parsed.result.unwrap_or(Value::Null))
    }

    pub async fn get(&self, key: &str) -> Result<Value, ServiceError> {
        self.command(&["GET", key]).await
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        self.command(&["SET", key, value]).await.map(|_| ())
    }

    /// Returns the list length after the push.
    pub async fn lpush(&self, key: &str, value: &str) -> Result<i64, ServiceError> {
        let res = self.command(&["LPUSH", key, value]).await?;
        res.as_i64().ok_or_else(|| ServiceError::unexpected(key, res.to_string()))
    }

    pub async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<(), ServiceError> {
        let (start, stop) = (start.to_string(), stop.to_string());
        self.command(&["LTRIM", key, &start, &stop]).await.map(|_| ())
    }

    pub async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Value>, ServiceError> {
        let (start_s, stop_s) = (start.to_string(), stop.to_string());
        match self.command(&["LRANGE", key, &start_s, &stop_s]).await? {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => Err(ServiceError::unexpected(key, other.to_string())),
        }
    }

    pub async fn ping(&self) -> Result<(), ServiceError> {
        match self.command(&["PING"]).await? {
            Value::String(s) if s == "PONG" => Ok(()),
            other => Err(ServiceError::unexpected("PING", other.to_string())),
        }
    }
}
