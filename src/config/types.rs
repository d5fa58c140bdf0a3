//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{
    default_channels, default_host, default_max_line_len, default_port, random_nickname,
};
use super::validation::{validate, ValidationError};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server to connect to.
    #[serde(default)]
    pub server: ServerConfig,
    /// Who we register as.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Channels and other chat behavior.
    #[serde(default)]
    pub chat: ChatConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Load from `path` if it exists, otherwise use built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.as_ref().display(), "No config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Resolve the registration identity, picking a random nickname if none
    /// is configured.
    pub fn identity(&self) -> Identity {
        let nickname = self
            .identity
            .nickname
            .clone()
            .unwrap_or_else(random_nickname);
        Identity {
            username: self
                .identity
                .username
                .clone()
                .unwrap_or_else(|| nickname.clone()),
            realname: self
                .identity
                .realname
                .clone()
                .unwrap_or_else(|| nickname.clone()),
            nickname,
        }
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// Server endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Hostname (default: `irc.freenode.net`).
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port (default: 6667).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Longest accepted or sent line, terminator included (default: 512).
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_line_len: default_max_line_len(),
        }
    }
}

/// Registration identity as written in the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfig {
    /// Preferred nickname; random `supNNNNN` when absent.
    pub nickname: Option<String>,
    /// USER username; defaults to the nickname.
    pub username: Option<String>,
    /// USER realname; defaults to the nickname.
    pub realname: Option<String>,
}

/// Fully resolved registration identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub nickname: String,
    pub username: String,
    pub realname: String,
}

/// Chat behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Channels joined automatically after welcome.
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
        }
    }
}
