use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::github::DEFAULT_API_URL;
use crate::pr::ListOptions;

/// Config file looked up in the current directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".pr-exporter.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .pr-exporter.toml.
/// All fields are optional; the tool works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,
    /// API host, for GitHub Enterprise installs
    pub api_url: Option<String>,
}

/// Defaults for walking the pull request list. CLI flags win over these.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportConfig {
    pub state: Option<String>,
    pub per_page: Option<u32>,
    pub max_pages: Option<u32>,
}

impl Config {
    /// Load an explicitly requested config file, which must exist, or else
    /// the optional `.pr-exporter.toml` in the current directory.
    pub fn resolve(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Self::load(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Load configuration from `path`, or return the default config if the
    /// file doesn't exist.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from a specific path; a missing file is an error here.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the GitHub token: an explicit value wins, then the config
    /// file, then the GITHUB_TOKEN env var.
    pub fn github_token(&self, explicit: Option<String>) -> Option<String> {
        explicit
            .or_else(|| self.github.token.clone())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
    }

    pub fn api_url(&self) -> &str {
        self.github.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Merge CLI overrides over config values over built-in defaults.
    pub fn list_options(
        &self,
        state: Option<String>,
        per_page: Option<u32>,
        max_pages: Option<u32>,
    ) -> ListOptions {
        let defaults = ListOptions::default();
        ListOptions {
            state: state
                .or_else(|| self.export.state.clone())
                .unwrap_or(defaults.state),
            per_page: per_page.or(self.export.per_page).unwrap_or(defaults.per_page),
            max_pages: max_pages
                .or(self.export.max_pages)
                .unwrap_or(defaults.max_pages),
        }
    }
}
