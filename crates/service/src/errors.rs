use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("remote store request failed: {0}")]
    Remote(String),
    #[error("remote store rejected command: {0}")]
    Command(String),
    #[error("remote store not configured: {0}")]
    Config(String),
    #[error("unexpected value under {key}: {raw}")]
    UnexpectedValue { key: String, raw: String },
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        Self::Remote(e.to_string())
    }
}

impl ServiceError {
    pub fn invalid_key(key: &str) -> Self {
        Self::Validation(format!("invalid section key {key:?}"))
    }

    pub fn unexpected(key: &str, raw: impl Into<String>) -> Self {
        Self::UnexpectedValue { key: key.to_string(), raw: raw.into() }
    }
}
