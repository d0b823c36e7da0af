//! Worker configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SHLTR_*)
//! 2. TOML config file (if SHLTR_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The cache generation and derived store name live here rather than in
//! module-level constants, so multiple generations can be tested side by
//! side without global mutation.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

mod validation;

pub use validation::ConfigError;

/// Offline cache proxy configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SHLTR_*)
/// 2. TOML config file (if SHLTR_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Cache generation identifier. Bump this to invalidate cached files:
    /// activation deletes every store from another generation.
    ///
    /// Set via SHLTR_GENERATION environment variable.
    #[serde(default = "default_generation")]
    pub generation: String,

    /// Prefix for derived store names.
    ///
    /// Set via SHLTR_CACHE_PREFIX environment variable.
    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,

    /// Origin of the page this worker serves. Cross-origin requests are
    /// never intercepted.
    ///
    /// Set via SHLTR_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// App shell paths pre-cached during install, in order. The first
    /// entry must be "/" so navigation fallback has a document to serve.
    ///
    /// Set via SHLTR_APP_SHELL environment variable.
    #[serde(default = "default_app_shell")]
    pub app_shell: Vec<String>,

    /// Path to the SQLite cache database.
    ///
    /// Set via SHLTR_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for network fetches.
    ///
    /// Set via SHLTR_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via SHLTR_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Network fetch timeout in milliseconds.
    ///
    /// Set via SHLTR_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow.
    ///
    /// Set via SHLTR_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_generation() -> String {
    "v1".into()
}

fn default_cache_prefix() -> String {
    "shltr-cache".into()
}

fn default_origin() -> String {
    "http://localhost:4173".into()
}

fn default_app_shell() -> Vec<String> {
    vec!["/".into(), "/index.html".into(), "/manifest.webmanifest".into()]
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./shltr-cache.sqlite")
}

fn default_user_agent() -> String {
    "shltr/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            generation: default_generation(),
            cache_prefix: default_cache_prefix(),
            origin: default_origin(),
            app_shell: default_app_shell(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl WorkerConfig {
    /// Derived name of the current generation's cache store.
    pub fn store_name(&self) -> String {
        format!("{}-{}", self.cache_prefix, self.generation)
    }

    /// Parsed origin URL.
    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.origin)
            .map_err(|e| ConfigError::Invalid { field: "origin".into(), reason: e.to_string() })
    }

    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SHLTR_`
    /// 2. TOML file from `SHLTR_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHLTR_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SHLTR_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WorkerConfig::default();
        assert_eq!(config.generation, "v1");
        assert_eq!(config.cache_prefix, "shltr-cache");
        assert_eq!(config.origin, "http://localhost:4173");
        assert_eq!(config.app_shell, vec!["/", "/index.html", "/manifest.webmanifest"]);
        assert_eq!(config.db_path, PathBuf::from("./shltr-cache.sqlite"));
        assert_eq!(config.max_bytes, 5_242_880);
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_store_name_derivation() {
        let config = WorkerConfig::default();
        assert_eq!(config.store_name(), "shltr-cache-v1");

        let bumped = WorkerConfig { generation: "v2".into(), ..Default::default() };
        assert_eq!(bumped.store_name(), "shltr-cache-v2");
    }

    #[test]
    fn test_origin_url_parses() {
        let config = WorkerConfig::default();
        let origin = config.origin_url().unwrap();
        assert_eq!(origin.scheme(), "http");
        assert_eq!(origin.host_str(), Some("localhost"));
    }

    #[test]
    fn test_timeout_duration() {
        let config = WorkerConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }
}
