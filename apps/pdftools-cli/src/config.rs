//! Client configuration
//!
//! Read from `pdftools.toml` in the working directory, or from the path
//! given with `--config`. Every field has a default, so an empty or missing
//! file is valid.

use anyhow::Context;
use pdftools_core::DEFAULT_GROUP_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File looked up when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "pdftools.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// Explicit path must exist; the default file is optional
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, base_url: Option<String>, timeout_ms: Option<u64>) -> Self {
        if let Some(base_url) = base_url {
            self.backend.base_url = base_url;
        }
        if let Some(timeout_ms) = timeout_ms {
            self.backend.timeout_ms = timeout_ms;
        }
        self
    }
}

/// Transform backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL the tool endpoints are joined to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout (default: 60000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Sent as `X-CSRFToken` when set
    #[serde(default)]
    pub csrf_token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            csrf_token: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/".to_string()
}

fn default_timeout_ms() -> u64 {
    60_000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Pages per working group (default: 12)
    #[serde(default = "default_group_size")]
    pub group_size: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            group_size: default_group_size(),
        }
    }
}

fn default_group_size() -> usize {
    DEFAULT_GROUP_SIZE
}
