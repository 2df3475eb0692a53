use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use serde::{Deserialize, Deserializer};

pub mod remote;

pub use remote::{RemoteCredentials, RemoteSettings};

/// Environment variables that select the runtime mode, in priority order.
pub const MODE_VARS: [&str; 2] = ["APP_ENV", "NODE_ENV"];
/// Overrides `storage.data_dir`.
pub const DATA_DIR_VAR: &str = "SITESTORE_DATA_DIR";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_AUDIT_KEY: &str = "audit:entries";
pub const DEFAULT_MAX_ENTRIES: usize = 500;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub remote: RemoteSettings,
}

/// Which backend family serves sections and the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeMode {
    /// Local JSON files under `storage.data_dir`.
    Development,
    /// Remote key-value store over its REST API.
    #[default]
    Production,
}

/// Read from the config file with the same rule as the environment flag.
impl<'de> Deserialize<'de> for RuntimeMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let flag = String::deserialize(deserializer)?;
        Ok(Self::from_flag(&flag))
    }
}

impl RuntimeMode {
    /// Only the exact value `development` selects local files; anything else is production.
    pub fn from_flag(flag: &str) -> Self {
        if flag == "development" { Self::Development } else { Self::Production }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub mode: RuntimeMode,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { mode: RuntimeMode::default(), data_dir: default_data_dir() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_audit_key")]
    pub key: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { max_entries: default_max_entries(), key: default_audit_key() }
    }
}

fn default_data_dir() -> PathBuf { PathBuf::from(DEFAULT_DATA_DIR) }
fn default_max_entries() -> usize { DEFAULT_MAX_ENTRIES }
fn default_audit_key() -> String { DEFAULT_AUDIT_KEY.to_string() }

/// Read the process environment, treating empty values as unset.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// `CONFIG_PATH`, defaulting to `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`) when present, otherwise start from defaults,
    /// then overlay the process environment and validate.
    pub fn load_and_validate() -> Result<Self> {
        let path = config_path();
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path).map_err(|e| anyhow!("failed to load {path}: {e}"))?
        } else {
            AppConfig::default()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.normalize_with(env_lookup)
    }

    /// Same as [`normalize_and_validate`](Self::normalize_and_validate) with an injectable
    /// variable source.
    pub fn normalize_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.storage.normalize_from(&lookup);
        self.remote.normalize_from(&lookup);
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        if self.audit.max_entries == 0 {
            return Err(anyhow!("audit.max_entries must be >= 1"));
        }
        if self.audit.key.trim().is_empty() {
            return Err(anyhow!("audit.key must not be empty"));
        }
        if self.remote.request_timeout_secs == 0 {
            return Err(anyhow!("remote.request_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}

impl StorageConfig {
    fn normalize_from<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // environment wins over the file
        if let Some(flag) = MODE_VARS.iter().find_map(|name| lookup(name)) {
            self.mode = RuntimeMode::from_flag(&flag);
        }
        if let Some(dir) = lookup(DATA_DIR_VAR) {
            self.data_dir = PathBuf::from(dir);
        }
    }
}
