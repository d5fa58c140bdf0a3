//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use slirc_proto::{ChannelExt, NickExt};
use thiserror::Error;

use super::Config;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.host is required")]
    MissingHost,
    #[error("server.port must be non-zero")]
    ZeroPort,
    #[error("server.max_line_len must be at least 64, got {0}")]
    LineLimitTooSmall(usize),
    #[error("identity.nickname is not a valid nickname: '{0}'")]
    InvalidNickname(String),
    #[error("chat.channels entry is not a channel name: '{0}'")]
    InvalidChannel(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ValidationError::MissingHost);
    }
    if config.server.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if config.server.max_line_len < 64 {
        errors.push(ValidationError::LineLimitTooSmall(
            config.server.max_line_len,
        ));
    }

    if let Some(ref nick) = config.identity.nickname
        && !nick.is_valid_nick()
    {
        errors.push(ValidationError::InvalidNickname(nick.clone()));
    }

    for channel in &config.chat.channels {
        if !channel.is_channel_name() {
            errors.push(ValidationError::InvalidChannel(channel.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
