//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: PAGEKIT_, `__` separates nesting levels)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/pagekit/config.toml
//! 4. Default values
//!
//! ```toml
//! [service]
//! name = "pagekit"
//! port = 8080
//! log_level = "info"
//!
//! [pagination]
//! default_page_size = 10
//! max_page_size = 100
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PAGEKIT_";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// Page size policy for the HTTP and CLI front ends
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    #[serde(default = "default_name")]
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level or `EnvFilter` directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

/// Page size policy
///
/// The paginators themselves accept any non-zero size; these limits are
/// applied by the front ends before a request reaches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Size used when a request does not specify one
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Largest size a request may ask for
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl PaginationConfig {
    /// Resolve a requested page size against this policy
    ///
    /// Missing sizes take the default; sizes above the maximum are clamped.
    /// Zero passes through so the paginator can reject it.
    ///
    /// ```rust
    /// use pagekit::config::PaginationConfig;
    ///
    /// let config = PaginationConfig::default();
    /// assert_eq!(config.resolve(None), 10);
    /// assert_eq!(config.resolve(Some(25)), 25);
    /// assert_eq!(config.resolve(Some(500)), 100);
    /// assert_eq!(config.resolve(Some(0)), 0);
    /// ```
    #[must_use]
    pub fn resolve(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size)
    }
}

fn default_name() -> String {
    "pagekit".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    100
}

impl Config {
    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so later files override earlier ones
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        let config = figment.merge(Self::env()).extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses the search path; environment variables still override
    /// the file. A missing file leaves the defaults in place.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Self::env())
            .extract()?;

        Ok(config)
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX).split("__")
    }

    /// Candidate config files, highest priority first
    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix("pagekit");
        if let Some(path) = xdg_dirs.find_config_file("config.toml") {
            paths.push(path);
        }

        paths
    }
}
