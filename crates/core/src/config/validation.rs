//! Configuration validation rules.
//!
//! This module provides validation logic for `WorkerConfig` values
//! after they have been loaded from environment, files, or defaults.

use thiserror::Error;

use crate::config::WorkerConfig;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl WorkerConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `generation` or `cache_prefix` is empty or contains `/`
    /// - `origin` is not an absolute URL
    /// - `app_shell` is empty, misses the root path, or holds non-absolute paths
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.is_empty() {
            return Err(ConfigError::Invalid { field: "generation".into(), reason: "must not be empty".into() });
        }
        if self.generation.contains('/') {
            return Err(ConfigError::Invalid { field: "generation".into(), reason: "must not contain '/'".into() });
        }

        if self.cache_prefix.is_empty() {
            return Err(ConfigError::Invalid { field: "cache_prefix".into(), reason: "must not be empty".into() });
        }
        if self.cache_prefix.contains('/') {
            return Err(ConfigError::Invalid { field: "cache_prefix".into(), reason: "must not contain '/'".into() });
        }

        self.origin_url()?;

        if self.app_shell.is_empty() {
            return Err(ConfigError::Invalid { field: "app_shell".into(), reason: "must not be empty".into() });
        }
        if !self.app_shell.iter().any(|p| p == "/") {
            return Err(ConfigError::Invalid {
                field: "app_shell".into(),
                reason: "must contain the root path \"/\"".into(),
            });
        }
        if let Some(bad) = self.app_shell.iter().find(|p| !p.starts_with('/')) {
            return Err(ConfigError::Invalid {
                field: "app_shell".into(),
                reason: format!("path {bad:?} must start with '/'"),
            });
        }

        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }
}
