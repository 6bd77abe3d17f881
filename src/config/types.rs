//! Configuration types for rowguard
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use serde::Deserialize;
use std::collections::HashMap;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Authentication settings
    pub auth: AuthConfig,

    /// Policy: role definitions
    pub policy: PolicyConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Authentication configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Path to a TOML credential table; the built-in default table is used
    /// when unset
    pub credentials_path: Option<String>,
}

/// Policy configuration: role name → role definition
///
/// An empty roles table means "use the built-in default policy".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub roles: HashMap<String, RoleConfig>,
}

/// One role's definition as written in configuration
///
/// All three maps are explicit and default to empty, so "no restriction" and
/// "missing key" are never conflated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoleConfig {
    /// Table → allowed actions (`read`/`create`/`modify`/`remove`, SQL verbs
    /// also accepted)
    pub tables: HashMap<String, Vec<String>>,

    /// Table → column allowlist; a table absent here is unrestricted
    pub columns: HashMap<String, Vec<String>>,

    /// Table → row-restriction template with `{attribute}` placeholders
    pub rows: HashMap<String, String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.auth.credentials_path.is_none());
        assert!(config.policy.roles.is_empty());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_deserialize_log_format() {
        let json = r#""json""#;
        let format: LogFormat = serde_json::from_str(json).unwrap();
        assert_eq!(format, LogFormat::Json);

        let json = r#""pretty""#;
        let format: LogFormat = serde_json::from_str(json).unwrap();
        assert_eq!(format, LogFormat::Pretty);
    }

    #[test]
    fn test_role_config_maps_default_to_empty() {
        let role: RoleConfig = toml::from_str(
            r#"
[tables]
orders = ["read"]
"#,
        )
        .unwrap();
        assert_eq!(role.tables.len(), 1);
        assert!(role.columns.is_empty());
        assert!(role.rows.is_empty());
    }
}
