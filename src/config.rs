//! Server configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! working server on `127.0.0.1:8787` querying every provider.
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 9000
//!
//! [search]
//! providers = ["ddg_html", "wikipedia"]
//! provider_timeout_ms = 4000
//! retry_jitter_ms = [50, 200]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sift_search::SearchConfig;

use crate::error::{GatewayError, Result};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SIFT_CONFIG";

/// Gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port (`0` picks a free port).
    pub port: u16,
    /// Search engine tuning.
    pub search: SearchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8787,
            search: SearchConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| GatewayError::Config(e.to_string()))
    }

    /// Load from the file named by `SIFT_CONFIG`, or use defaults when the
    /// variable is unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable names an unreadable or invalid file.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Check the search settings.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.search.validate().map_err(GatewayError::from)
    }

    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_search::ProviderTag;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8787");
        assert_eq!(config.search.providers.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_file_partial_toml_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sift.toml");
        std::fs::write(
            &path,
            r#"
port = 9000

[search]
providers = ["ddg_html", "wikipedia"]
retry_jitter_ms = [50, 200]
"#,
        )
        .expect("write config");

        let config = ServerConfig::from_file(&path).expect("load config");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(
            config.search.providers,
            vec![ProviderTag::DdgHtml, ProviderTag::Wikipedia]
        );
        assert_eq!(config.search.retry_jitter_ms, (50, 200));
        assert_eq!(config.search.provider_timeout_ms, 5_000);
    }

    #[test]
    fn from_file_nonexistent_returns_io_error() {
        let result = ServerConfig::from_file(Path::new("/nonexistent/path/sift.toml"));
        assert!(matches!(result, Err(GatewayError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write config");
        assert!(matches!(ServerConfig::from_file(&path), Err(GatewayError::Config(_))));
    }

    #[test]
    fn unknown_provider_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sift.toml");
        std::fs::write(&path, "[search]\nproviders = [\"altavista\"]\n").expect("write config");
        assert!(ServerConfig::from_file(&path).is_err());
    }

    #[test]
    fn invalid_search_settings_fail_validation() {
        let mut config = ServerConfig::default();
        config.search.request_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
        assert!(err.to_string().contains("request_timeout_ms"));
    }
}
