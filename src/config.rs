use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct OctologConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub providers: ProviderConfig,
    pub retrieval: RetrievalConfig,
    pub report: ReportConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    pub report_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderConfig {
    /// `"openai"` for any OpenAI-compatible endpoint, `"none"` to run offline.
    pub kind: String,
    pub base_url: String,
    /// Falls back to `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,
    pub embedding_model: String,
    pub generation_model: String,
    pub vision_model: String,
    pub timeout_secs: u64,
    pub embed_on_ingest: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReportConfig {
    pub context_limit: usize,
    pub language: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IngestConfig {
    pub queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            host: "127.0.0.1".into(),
            port: 5000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let dir = default_octolog_dir();
        Self {
            db_path: dir.join("db.json").to_string_lossy().into_owned(),
            report_dir: dir.join("reports").to_string_lossy().into_owned(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: "openai".into(),
            base_url: "https://api.openai.com/v1".into(),
            api_key: None,
            embedding_model: "text-embedding-3-small".into(),
            generation_model: "gpt-4o".into(),
            vision_model: "gpt-4o-mini".into(),
            timeout_secs: 60,
            embed_on_ingest: true,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            context_limit: 10,
            language: "English".into(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { queue_capacity: 32 }
    }
}

/// Returns `~/.octolog/`, or `./.octolog/` when no home directory is known.
pub fn default_octolog_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".octolog")
}

/// Returns the default config file path: `~/.octolog/config.toml`
pub fn default_config_path() -> PathBuf {
    default_octolog_dir().join("config.toml")
}

impl OctologConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            OctologConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (OCTOLOG_DB, OCTOLOG_REPORT_DIR, OCTOLOG_LOG_LEVEL, OCTOLOG_PROVIDER).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("OCTOLOG_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("OCTOLOG_REPORT_DIR") {
            self.storage.report_dir = val;
        }
        if let Ok(val) = std::env::var("OCTOLOG_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("OCTOLOG_PROVIDER") {
            self.providers.kind = val;
        }
    }

    /// Resolve the store path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn resolved_report_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.report_dir)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
