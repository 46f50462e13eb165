//! Configuration loading, validation, and management for StyleCraft.
//!
//! Loads configuration from `~/.stylecraft/config.toml` with environment
//! variable overrides. Validates all settings at startup; a missing or
//! malformed required value is fatal.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The root configuration structure.
///
/// Maps directly to `~/.stylecraft/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language-model backend
    #[serde(default)]
    pub model: ModelConfig,

    /// Record storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Known model backends.
pub const PROVIDERS: [&str; 3] = ["openai_compat", "ollama", "mock"];

#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// One of [`PROVIDERS`]
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Ollama ignores the key but the OpenAI wire format requires one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_provider() -> String {
    "openai_compat".into()
}
fn default_base_url() -> String {
    "http://localhost:11434/v1".into()
}
fn default_model() -> String {
    "qwen2:0.5b".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    250
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `sqlite:<path>`, `postgres://...`, or `memory`. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl StorageConfig {
    /// The URL with any `user:password@` credentials masked.
    pub fn redacted_url(&self) -> String {
        let Some(url) = self.url.as_deref() else {
            return "None".into();
        };
        match (url.find("://"), url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}://[REDACTED]@{}", &url[..scheme_end], &url[at + 1..])
            }
            _ => url.to_string(),
        }
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("url", &self.redacted_url())
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// CORS origins allowed to call the API (the presentation layer)
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:8501".into()]
}
fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origins: default_allowed_origins(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path` (or the default location), apply
    /// environment overrides, and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| Self::config_dir().join("config.toml"));
        let mut config = Self::read_file(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without env overrides or validation.
    /// A missing file yields the defaults.
    pub fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// Later names in each list win over earlier ones.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let first = |keys: &[&str]| keys.iter().rev().find_map(|k| lookup(k));

        if let Some(provider) = first(&["STYLECRAFT_MODEL_PROVIDER"]) {
            self.model.provider = provider;
        }
        if let Some(url) = first(&["OLLAMA_BASE_URL", "STYLECRAFT_MODEL_URL"]) {
            self.model.base_url = url;
        }
        if let Some(model) = first(&["OLLAMA_MODEL", "STYLECRAFT_MODEL"]) {
            self.model.model = model;
        }
        if let Some(key) = first(&["OLLAMA_API_KEY", "STYLECRAFT_API_KEY"]) {
            self.model.api_key = Some(key);
        }
        if let Some(timeout) = first(&["STYLECRAFT_TIMEOUT_SECS"]) {
            // An unparseable value becomes 0 so that validation rejects it.
            self.model.timeout_secs = timeout.trim().parse().unwrap_or(0);
        }
        if let Some(url) = first(&["DATABASE_URL"]) {
            self.storage.url = Some(url);
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !PROVIDERS.contains(&self.model.provider.as_str()) {
            return Err(ConfigError::Invalid {
                field: "model.provider",
                reason: format!(
                    "unknown provider '{}', expected one of {}",
                    self.model.provider,
                    PROVIDERS.join(", ")
                ),
            });
        }

        if self.model.provider != "mock" {
            let url = self.model.base_url.trim();
            if url.is_empty() {
                return Err(ConfigError::Missing("model.base_url (OLLAMA_BASE_URL)"));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    field: "model.base_url",
                    reason: format!("'{url}' is not an http(s) URL"),
                });
            }
        }

        if self.model.model.trim().is_empty() {
            return Err(ConfigError::Missing("model.model (OLLAMA_MODEL)"));
        }

        if self.model.timeout_secs == 0 || self.model.timeout_secs > 600 {
            return Err(ConfigError::Invalid {
                field: "model.timeout_secs",
                reason: "must be between 1 and 600 seconds".into(),
            });
        }

        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(ConfigError::Invalid {
                field: "model.temperature",
                reason: "must be between 0.0 and 2.0".into(),
            });
        }

        let Some(url) = self.storage.url.as_deref().map(str::trim) else {
            return Err(ConfigError::Missing("storage.url (DATABASE_URL)"));
        };
        if url.is_empty() {
            return Err(ConfigError::Missing("storage.url (DATABASE_URL)"));
        }
        let known_scheme = url == "memory"
            || url.starts_with("sqlite:")
            || url.starts_with("postgres://")
            || url.starts_with("postgresql://");
        if !known_scheme {
            return Err(ConfigError::Invalid {
                field: "storage.url",
                reason: "expected sqlite:, postgres://, postgresql:// or memory".into(),
            });
        }

        if self.storage.max_connections == 0 {
            return Err(ConfigError::Invalid {
                field: "storage.max_connections",
                reason: "must be at least 1".into(),
            });
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".stylecraft")
    }

    /// Generate a default config TOML string (for `init`).
    ///
    /// Unlike [`AppConfig::default`], the generated file points storage at a
    /// SQLite database inside the config directory so it validates as-is.
    pub fn default_toml() -> String {
        let db_path = Self::config_dir().join("stylecraft.db");
        let config = Self {
            storage: StorageConfig {
                url: Some(format!("sqlite://{}", db_path.display())),
                ..StorageConfig::default()
            },
            ..Self::default()
        };
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors. All are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Missing required configuration value: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn kind(&self) -> stylecraft_core::ErrorKind {
        stylecraft_core::ErrorKind::Configuration
    }
}
