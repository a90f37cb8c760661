//! Configuration management.
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file (`--config`, or the first of the default locations)
//! 3. Environment variables prefixed with `UPSTREAM_`
//!
//! ```toml
//! base_url = "https://suarify.my"
//! api_key = "sk-..."
//! timeout_secs = 60
//! legacy_tool_names = true
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Platform host used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://suarify.my";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "UPSTREAM";

const CONFIG_FILE_NAME: &str = "suarify-mcp.toml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the upstream REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as `x-api-key` on every request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds; unset means the HTTP client's default
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Also register the unprefixed (deprecated) tool names
    #[serde(default = "default_true")]
    pub legacy_tool_names: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: None,
            legacy_tool_names: true,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_true() -> bool {
    true
}

/// Non-fatal configuration problems, reported at startup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigWarning {
    #[error("UPSTREAM_API_KEY is not set; upstream calls will fail with an authentication error")]
    MissingApiKey,
}

/// Fatal configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl Config {
    /// Treat blank strings as unset and strip a trailing slash from the base URL
    fn normalized(mut self) -> Self {
        self.api_key = self
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let base = self.base_url.trim().trim_end_matches('/');
        self.base_url = if base.is_empty() {
            default_base_url()
        } else {
            base.to_string()
        };

        if self.timeout_secs == Some(0) {
            self.timeout_secs = None;
        }

        self
    }

    /// Check the configuration, returning warnings for recoverable problems
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        url::Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;

        let mut warnings = Vec::new();
        if self.api_key.is_none() {
            warnings.push(ConfigWarning::MissingApiKey);
        }
        Ok(warnings)
    }
}

/// Load configuration from an optional file plus the process environment
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    load_config_with_env(path, None)
}

/// Load configuration, reading environment overrides from `env` instead of the
/// process environment when it is provided
pub fn load_config_with_env(
    path: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX).source(env))
        .build()?;

    let config: Config = settings.try_deserialize()?;
    Ok(config.normalized())
}

/// Find a configuration file in the default locations
///
/// Checks `<config dir>/suarify-mcp/config.toml`, then `./suarify-mcp.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let candidates = [
        dirs::config_dir().map(|dir| dir.join("suarify-mcp").join("config.toml")),
        Some(PathBuf::from(CONFIG_FILE_NAME)),
    ];

    candidates.into_iter().flatten().find(|path| path.is_file())
}

/// Environment variables recognized by the server, with descriptions
pub fn env_vars() -> [(String, &'static str); 4] {
    [
        (
            format!("{ENV_PREFIX}_API_KEY"),
            "API key for the upstream platform (required)",
        ),
        (
            format!("{ENV_PREFIX}_BASE_URL"),
            "Override the upstream base URL",
        ),
        (
            format!("{ENV_PREFIX}_TIMEOUT_SECS"),
            "Request timeout in seconds (default: none)",
        ),
        (
            format!("{ENV_PREFIX}_LEGACY_TOOL_NAMES"),
            "Register deprecated unprefixed tool names (default: true)",
        ),
    ]
}
