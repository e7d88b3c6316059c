//! Persistent client configuration model and file-backed manager.

use issuehub_api::config::DEFAULT_API_BASE;
use issuehub_api::models::{IssueSort, SortOrder, DEFAULT_PER_PAGE, MAX_PER_PAGE};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the configured API URL.
pub const API_URL_ENV: &str = "ISSUEHUB_API_URL";

/// API URL baked in at build time, falling back to the local backend.
fn default_api_url() -> String {
    option_env!("ISSUEHUB_DEFAULT_API_URL")
        .unwrap_or(DEFAULT_API_BASE)
        .to_string()
}

/// Default page size for issue lists.
fn default_issues_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

/// Default request timeout in seconds.
fn default_request_timeout_secs() -> u64 {
    30
}

/// Represents the client configuration persisted on disk: API endpoint, issue list defaults and request timeout.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_issues_per_page")]
    pub issues_per_page: u32,
    pub default_sort: IssueSort,
    pub default_order: SortOrder,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    /// Returns baseline config when no persisted settings are available.
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            issues_per_page: default_issues_per_page(),
            default_sort: IssueSort::default(),
            default_order: SortOrder::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Applies the environment override and clamps values into usable ranges.
    pub fn resolved(mut self) -> Self {
        if let Some(url) = env::var(API_URL_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
        {
            self.api_url = url;
        }
        self.issues_per_page = self.issues_per_page.clamp(1, MAX_PER_PAGE);
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_request_timeout_secs();
        }
        self
    }
}

/// Manages loading and saving of client configuration to a JSON file in the platform-specific config directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Creates a manager bound to the platform-specific config path.
    pub fn new() -> Result<Self, String> {
        let dirs = directories::ProjectDirs::from("dev", "issuehub", "issuehub")
            .ok_or_else(|| "Could not determine config directory".to_string())?;
        let path = dirs.config_dir().join("config.json");
        Ok(Self { path })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads config from disk, falling back to defaults on read/parse errors.
    pub fn load(&self) -> Config {
        if self.path.exists() {
            let content = fs::read_to_string(&self.path).unwrap_or_default();
            serde_json::from_str(&content).unwrap_or_else(|err| {
                log::warn!("Ignoring unreadable config at {}: {}", self.path.display(), err);
                Config::default()
            })
        } else {
            Config::default()
        }
    }

    /// Persists config to disk, creating parent directories when needed.
    pub fn save(&self, config: &Config) -> Result<(), std::io::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
