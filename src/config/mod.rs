//! Configuration loading and management.
//!
//! - [`types`]: config struct definitions and loading
//! - [`validation`]: sanity checks applied after parsing

mod defaults;
mod types;
mod validation;

pub use types::{ChatConfig, Config, ConfigError, Identity, IdentityConfig, ServerConfig};
pub use validation::ValidationError;
