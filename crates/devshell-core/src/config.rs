//! Browser configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use devshell_navigation::DEFAULT_SEARCH_ENGINE;
use devshell_net::InterceptorConfig;

use crate::error::CoreError;
use crate::Result;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page loaded at startup
    pub homepage: String,
    /// Search engine URL template
    pub search_engine: String,
    /// Debugging console script injected after each page load
    pub console_script_url: String,
    /// Route main-frame loads through the CSP-stripping proxy
    pub strip_csp: bool,
    /// Enable the renderer's own inspector
    pub devtools: bool,
    pub dark_mode: bool,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Config {
    /// Load `config.json` from the data directory, or defaults if it is missing.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config = serde_json::from_str(&contents)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;

        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("DevShell"))
            .unwrap_or_else(|| PathBuf::from(".devshell"))
    }

    pub fn interceptor_config(&self) -> InterceptorConfig {
        InterceptorConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            homepage: "https://github.com/liriliri/eruda".to_string(),
            search_engine: DEFAULT_SEARCH_ENGINE.to_string(),
            console_script_url: "https://cdn.jsdelivr.net/npm/eruda".to_string(),
            strip_csp: true,
            devtools: true,
            dark_mode: false,
            connect_timeout_secs: 10,
            read_timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.strip_csp);
        assert_eq!(config.search_engine, "https://www.google.com/search?q=%s");
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "homepage": "https://example.com", "strip_csp": false, "read_timeout_secs": 3 }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.homepage, "https://example.com");
        assert!(!config.strip_csp);
        assert_eq!(config.console_script_url, Config::default().console_script_url);

        let timeouts = config.interceptor_config();
        assert_eq!(timeouts.read_timeout, Duration::from_secs(3));
        assert_eq!(timeouts.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();

        assert!(matches!(Config::load(dir.path()), Err(CoreError::Config(_))));
    }
}
