//! # Configuration Module
//!
//! Layered configuration for the Impact binary.
//!
//! ## Precedence (highest first)
//!
//! 1. CLI flags (`--host`, `--port`)
//! 2. Environment: `IMPACT_CORS_ORIGINS`, `IMPACT_RATE_LIMIT`, `IMPACT_API_KEY`
//! 3. `impact.toml` (or the file named by `--config`)
//! 4. Built-in defaults
//!
//! ## File Format
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! cors_origins = "http://localhost:3000"
//! rate_limit = 100
//! body_limit_bytes = 2097152
//!
//! [import]
//! max_file_size = 104857600
//! ```

use impact_core::ImpactError;
use serde::Deserialize;
use std::path::Path;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "impact.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RATE_LIMIT: u32 = 100;
const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Maximum sheet file size for import (100 MB).
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

// =============================================================================
// RESOLVED CONFIGURATION
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated origins, `*` for any; `None` keeps the localhost default.
    pub cors_origins: Option<String>,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    pub body_limit_bytes: usize,
    /// Bearer key; `None` disables authentication.
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: None,
            rate_limit: DEFAULT_RATE_LIMIT,
            body_limit_bytes: DEFAULT_BODY_LIMIT,
            api_key: None,
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Sheet import settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub max_file_size: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    pub import: ImportConfig,
}

// =============================================================================
// FILE LAYER
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    server: RawServer,
    #[serde(default)]
    import: RawImport,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    cors_origins: Option<String>,
    rate_limit: Option<u32>,
    body_limit_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawImport {
    max_file_size: Option<u64>,
}

impl Config {
    /// Parse TOML text over the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ImpactError> {
        let raw: RawConfig = toml::from_str(text)
            .map_err(|e| ImpactError::SerializationError(format!("Invalid config: {}", e)))?;
        let defaults = Self::default();

        Ok(Self {
            server: ServerConfig {
                host: raw.server.host.unwrap_or(defaults.server.host),
                port: raw.server.port.unwrap_or(defaults.server.port),
                cors_origins: raw.server.cors_origins,
                rate_limit: raw.server.rate_limit.unwrap_or(defaults.server.rate_limit),
                body_limit_bytes: raw
                    .server
                    .body_limit_bytes
                    .unwrap_or(defaults.server.body_limit_bytes),
                api_key: None,
            },
            import: ImportConfig {
                max_file_size: raw
                    .import
                    .max_file_size
                    .unwrap_or(defaults.import.max_file_size),
            },
        })
    }

    /// Load configuration from a file and the process environment.
    ///
    /// An explicit `path` must exist. Without one, `impact.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ImpactError> {
        let file = match path {
            Some(p) => Some(std::fs::read_to_string(p).map_err(|e| {
                ImpactError::IoError(format!("Cannot read config '{}': {}", p.display(), e))
            })?),
            None => std::fs::read_to_string(DEFAULT_CONFIG_FILE).ok(),
        };

        let config = match file {
            Some(text) => Self::from_toml_str(&text)?,
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Unparseable numbers are ignored with a warning.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(origins) = lookup("IMPACT_CORS_ORIGINS") {
            self.server.cors_origins = Some(origins);
        }
        if let Some(limit) = lookup("IMPACT_RATE_LIMIT") {
            match limit.trim().parse() {
                Ok(rps) => self.server.rate_limit = rps,
                Err(_) => tracing::warn!("Ignoring invalid IMPACT_RATE_LIMIT '{}'", limit),
            }
        }
        if let Some(key) = lookup("IMPACT_API_KEY").filter(|k| !k.is_empty()) {
            self.server.api_key = Some(key);
        }
        self
    }

    /// Apply CLI overrides for the server address.
    #[must_use]
    pub fn with_cli(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").expect("parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.server.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn file_values_override_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 9000
            rate_limit = 0

            [import]
            max_file_size = 1024
            "#,
        )
        .expect("parse");

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.rate_limit, 0);
        assert_eq!(config.import.max_file_size, 1024);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result = Config::from_toml_str("[server]\nprot = 1\n");
        assert!(matches!(result, Err(ImpactError::SerializationError(_))));
    }

    #[test]
    fn env_overrides_file() {
        let config = Config::from_toml_str("[server]\nrate_limit = 5\n")
            .expect("parse")
            .with_env(env(&[
                ("IMPACT_RATE_LIMIT", "42"),
                ("IMPACT_API_KEY", "secret"),
                ("IMPACT_CORS_ORIGINS", "*"),
            ]));

        assert_eq!(config.server.rate_limit, 42);
        assert_eq!(config.server.api_key.as_deref(), Some("secret"));
        assert_eq!(config.server.cors_origins.as_deref(), Some("*"));
    }

    #[test]
    fn invalid_env_values_ignored() {
        let config = Config::default().with_env(env(&[
            ("IMPACT_RATE_LIMIT", "fast"),
            ("IMPACT_API_KEY", ""),
        ]));

        assert_eq!(config.server.rate_limit, 100);
        assert!(config.server.api_key.is_none());
    }

    #[test]
    fn cli_overrides_everything() {
        let config = Config::from_toml_str("[server]\nhost = \"0.0.0.0\"\nport = 1\n")
            .expect("parse")
            .with_cli(Some("localhost".to_string()), Some(3000));

        assert_eq!(config.server.addr(), "localhost:3000");
    }
}
