//! Configuration module
//!
//! Layered configuration: TOML file plus `ROWGUARD_`-prefixed environment
//! variables, validated before the engine sees it.

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_from_str};
pub use types::{AppConfig, AuthConfig, LogFormat, LoggingConfig, PolicyConfig, RoleConfig};
