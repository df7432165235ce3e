//! `impls-lens.toml` configuration.
//!
//! Every field is optional in the file; missing fields take the defaults below.
//! CLI flags override file values.

use crate::domain::candidate::DEFAULT_MOCK_MARKER;
use crate::domain::launch::{LaunchOptions, RewriteRules};
use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "impls-lens.toml";
pub const DEFAULT_COMMAND_ID: &str = "impls-lens.showImplementations";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LensConfig {
    /// Path substrings that classify an implementation as a mock.
    pub mock_markers: Vec<String>,
    /// Action identifier attached to every lens.
    pub command_id: String,
    pub lens_title: String,
    pub gopls_path: String,
    pub dlv_path: String,
    pub dlv_listen: String,
    pub env_file_names: Vec<String>,
    pub host_key_markers: Vec<String>,
    pub bind_host: String,
    pub http_addr: String,
}

impl Default for LensConfig {
    fn default() -> Self {
        let rules = RewriteRules::default();
        Self {
            mock_markers: vec![DEFAULT_MOCK_MARKER.to_string()],
            command_id: DEFAULT_COMMAND_ID.to_string(),
            lens_title: "impls".to_string(),
            gopls_path: "gopls".to_string(),
            dlv_path: "dlv".to_string(),
            dlv_listen: "127.0.0.1:2345".to_string(),
            env_file_names: vec![".env".to_string()],
            host_key_markers: rules.host_key_markers,
            bind_host: rules.bind_host,
            http_addr: "127.0.0.1:7878".to_string(),
        }
    }
}

impl LensConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse impls-lens configuration")
    }

    /// Load `impls-lens.toml` from `workspace_root`, or defaults when absent.
    pub fn load(workspace_root: &Path) -> Result<Self> {
        let path = workspace_root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            env_file_names: self.env_file_names.clone(),
            rules: RewriteRules {
                host_key_markers: self.host_key_markers.clone(),
                bind_host: self.bind_host.clone(),
            },
            ..LaunchOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = LensConfig::default();
        assert_eq!(config.mock_markers, vec!["mock"]);
        assert_eq!(config.command_id, DEFAULT_COMMAND_ID);
        assert_eq!(config.bind_host, "0.0.0.0");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = LensConfig::from_toml_str(
            "mock_markers = [\"mock\", \"fake\"]\nbind_host = \"host.docker.internal\"\n",
        )
        .unwrap();
        assert_eq!(config.mock_markers, vec!["mock", "fake"]);
        assert_eq!(config.bind_host, "host.docker.internal");
        assert_eq!(config.gopls_path, "gopls");
        assert_eq!(config.launch_options().rules.bind_host, "host.docker.internal");
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(LensConfig::from_toml_str("nope = 1\n").is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(LensConfig::load(tmp.path()).unwrap(), LensConfig::default());
    }

    #[test]
    fn test_load_from_workspace() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "lens_title = \"impl\"\n").unwrap();
        let config = LensConfig::load(tmp.path()).unwrap();
        assert_eq!(config.lens_title, "impl");
    }
}
