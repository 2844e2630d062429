//! Configuration file parser for ~/.config/feedscout/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use crate::feed::{redirect_policy, FetchPolicy};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Landing pages to inspect when none are given on the command line.
    pub seeds: Vec<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Largest page body (in bytes) that will be read.
    pub max_page_bytes: usize,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Allow requests to localhost and private network addresses.
    pub allow_private_hosts: bool,
}

impl Default for Config {
    fn default() -> Self {
        let policy = FetchPolicy::default();
        Self {
            seeds: Vec::new(),
            timeout_secs: policy.timeout.as_secs(),
            max_page_bytes: policy.max_page_bytes,
            user_agent: concat!("feedscout/", env!("CARGO_PKG_VERSION")).to_string(),
            allow_private_hosts: policy.allow_private_hosts,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 5] = [
        "seeds",
        "timeout_secs",
        "max_page_bytes",
        "user_agent",
        "allow_private_hosts",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Zero timeout or body limit → `Err(ConfigError::Invalid)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;

        if config.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        if config.max_page_bytes == 0 {
            return Err(ConfigError::Invalid("max_page_bytes must be at least 1".into()));
        }

        tracing::info!(seeds = config.seeds.len(), "Loaded configuration");
        Ok(config)
    }

    /// Request limits derived from this configuration.
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            timeout: Duration::from_secs(self.timeout_secs),
            max_page_bytes: self.max_page_bytes,
            allow_private_hosts: self.allow_private_hosts,
        }
    }

    /// HTTP client carrying the configured `User-Agent`.
    ///
    /// Redirects are followed only while each hop passes the same host guard
    /// as the initial request.
    pub fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .redirect(redirect_policy(self.allow_private_hosts))
            .build()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("feedscout_config_test_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.seeds.is_empty());
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.max_page_bytes, 5 * 1024 * 1024);
        assert!(config.user_agent.starts_with("feedscout/"));
        assert!(!config.allow_private_hosts);
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/feedscout_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let path = write_config("whitespace", "   \n  \n  ");
        let config = Config::load(&path).unwrap();
        assert!(config.seeds.is_empty());
        cleanup(&path);
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let path = write_config("partial", "timeout_secs = 3\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.max_page_bytes, 5 * 1024 * 1024);
        assert!(config.seeds.is_empty());
        cleanup(&path);
    }

    #[test]
    fn test_full_config() {
        let content = r#"
seeds = ["https://example.com", "https://news.example.org/rss/"]
timeout_secs = 30
max_page_bytes = 1024
user_agent = "test-agent/1.0"
allow_private_hosts = true
"#;
        let path = write_config("full", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.seeds,
            vec!["https://example.com", "https://news.example.org/rss/"]
        );
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_page_bytes, 1024);
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert!(config.allow_private_hosts);
        cleanup(&path);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let path = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        cleanup(&path);
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let config = Config::from_toml("timeout_secs = 5\ntheme = \"dark\"\n").unwrap();
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_wrong_type_returns_error() {
        assert!(matches!(
            Config::from_toml("seeds = \"https://example.com\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_limits_rejected() {
        assert!(matches!(
            Config::from_toml("timeout_secs = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("max_page_bytes = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_too_large_file_rejected() {
        let path = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        cleanup(&path);
    }

    #[test]
    fn test_fetch_policy_from_config() {
        let config = Config::from_toml(
            "timeout_secs = 7\nmax_page_bytes = 2048\nallow_private_hosts = true\n",
        )
        .unwrap();
        let policy = config.fetch_policy();
        assert_eq!(policy.timeout, Duration::from_secs(7));
        assert_eq!(policy.max_page_bytes, 2048);
        assert!(policy.allow_private_hosts);
    }

    #[test]
    fn test_build_client() {
        assert!(Config::default().build_client().is_ok());
    }
}
