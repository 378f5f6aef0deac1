//! Configuration loading and resolution
//!
//! Bootstrap configuration is read from a single TOML file. Resolution order:
//! 1. Command-line argument (highest priority)
//! 2. `AICD_CONFIG` environment variable
//! 3. Per-user config file (`<config_dir>/aicd/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing file is never fatal: the resolver falls back to compiled
//! defaults and reports the missing path so the caller can warn about it.
//! A file that exists but fails to parse or validate is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "AICD_CONFIG";

/// Environment variable overriding the remote classifier API token
pub const TOKEN_ENV_VAR: &str = "AICD_CLASSIFIER_TOKEN";

/// Default HTTP port for the detector service
pub const DEFAULT_PORT: u16 = 5740;

/// Primary hosted image classifier
pub const PRIMARY_CLASSIFIER_URL: &str =
    "https://api-inference.huggingface.co/models/umm-maybe/AI-image-detector";

/// Secondary hosted image classifier, tried when the primary fails
pub const SECONDARY_CLASSIFIER_URL: &str =
    "https://api-inference.huggingface.co/models/Organika/sdxl-detector";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Remote classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on request bodies (uploaded media)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Remote image classifier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Disable to run image analysis on heuristics alone
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token sent to the hosted classifiers
    #[serde(default)]
    pub api_token: Option<String>,

    /// Endpoints in the order they are tried
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<EndpointConfig>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_timeout_secs(),
            api_token: None,
            endpoints: default_endpoints(),
        }
    }
}

/// One remote classifier endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub name: String,
    pub url: String,

    /// Label-matching profile applied to this endpoint's responses
    #[serde(default)]
    pub profile: MatchProfile,
}

/// Label-matching profile for a classifier endpoint
///
/// - `primary`: AI terms are artificial/ai/fake/generated; when no label
///   matches, a non-AI first label is read as the human class (`1 - score`)
/// - `secondary`: adds `sdxl` to the terms; the first label's score is taken
///   as-is when nothing matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchProfile {
    #[default]
    Primary,
    Secondary,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_body_bytes() -> usize {
    32 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_endpoints() -> Vec<EndpointConfig> {
    vec![
        EndpointConfig {
            name: "ai-image-detector".to_string(),
            url: PRIMARY_CLASSIFIER_URL.to_string(),
            profile: MatchProfile::Primary,
        },
        EndpointConfig {
            name: "sdxl-detector".to_string(),
            url: SECONDARY_CLASSIFIER_URL.to_string(),
            profile: MatchProfile::Secondary,
        },
    ]
}

impl TomlConfig {
    /// Check values that serde cannot reject on its own
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("server.port must be non-zero".to_string()));
        }
        if self.server.max_body_bytes == 0 {
            return Err(Error::Config(
                "server.max_body_bytes must be non-zero".to_string(),
            ));
        }
        if self.classifier.timeout_secs == 0 {
            return Err(Error::Config(
                "classifier.timeout_secs must be non-zero".to_string(),
            ));
        }
        for endpoint in &self.classifier.endpoints {
            if endpoint.url.trim().is_empty() {
                return Err(Error::Config(format!(
                    "classifier endpoint '{}' has an empty url",
                    endpoint.name
                )));
            }
        }
        Ok(())
    }
}

/// Parse and validate a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    UserFile(PathBuf),
    /// Compiled defaults; `missing` names a requested file that did not exist
    Defaults { missing: Option<PathBuf> },
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CommandLine(p) => write!(f, "command line ({})", p.display()),
            ConfigSource::Environment(p) => write!(f, "{} ({})", CONFIG_ENV_VAR, p.display()),
            ConfigSource::UserFile(p) => write!(f, "user config ({})", p.display()),
            ConfigSource::Defaults { .. } => write!(f, "compiled defaults"),
        }
    }
}

/// Effective configuration plus its provenance
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
}

/// Resolves the bootstrap configuration file
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
    user_config_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self {
            cli_path: None,
            user_config_path: default_user_config_path(),
        }
    }

    /// Path given on the command line (highest priority)
    pub fn with_cli_path(mut self, path: Option<PathBuf>) -> Self {
        self.cli_path = path;
        self
    }

    /// Override the per-user config location (tests, packaging)
    pub fn with_user_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.user_config_path = path;
        self
    }

    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let (path, source) = if let Some(path) = &self.cli_path {
            (Some(path.clone()), ConfigSource::CommandLine(path.clone()))
        } else if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            (Some(path.clone()), ConfigSource::Environment(path))
        } else if let Some(path) = self.user_config_path.as_ref().filter(|p| p.exists()) {
            (Some(path.clone()), ConfigSource::UserFile(path.clone()))
        } else {
            (None, ConfigSource::Defaults { missing: None })
        };

        let (mut config, source) = match path {
            Some(path) if path.exists() => (load_toml_config(&path)?, source),
            Some(path) => (
                TomlConfig::default(),
                ConfigSource::Defaults {
                    missing: Some(path),
                },
            ),
            None => (TomlConfig::default(), source),
        };

        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.trim().is_empty() {
                config.classifier.api_token = Some(token);
            }
        }

        Ok(ResolvedConfig { config, source })
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// `<config_dir>/aicd/config.toml` for the current platform
pub fn default_user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("aicd").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_list_both_endpoints_in_order() {
        let config = TomlConfig::default();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.classifier.endpoints.len(), 2);
        assert_eq!(config.classifier.endpoints[0].profile, MatchProfile::Primary);
        assert_eq!(config.classifier.endpoints[1].profile, MatchProfile::Secondary);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TomlConfig = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.logging.level, "info");
        assert!(config.classifier.enabled);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = TomlConfig::default();
        config.classifier.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_profile_parses_lowercase() {
        let endpoint: EndpointConfig =
            toml::from_str("name = \"x\"\nurl = \"http://x\"\nprofile = \"secondary\"\n").unwrap();
        assert_eq!(endpoint.profile, MatchProfile::Secondary);
    }
}
