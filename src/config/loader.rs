//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (ROWGUARD_*)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use crate::policy::{Action, PredicateTemplate};
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "rowguard.toml",
    ".rowguard.toml",
    "~/.config/rowguard/config.toml",
    "/etc/rowguard/config.toml",
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Defaults are handled by serde defaults on AppConfig

    // 2. Add configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Add environment variables with ROWGUARD_ prefix
    // e.g., ROWGUARD_LOGGING__LEVEL, ROWGUARD_AUTH__CREDENTIALS_PATH
    // Double underscore (__) maps to nested keys (logging.level)
    builder = builder.add_source(
        Environment::with_prefix("ROWGUARD")
            // `separator` would otherwise also become the prefix separator,
            // requiring ROWGUARD__ instead of the documented ROWGUARD_.
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // Build and deserialize
    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
///
/// Action names and row-restriction templates are checked here so a broken
/// policy file fails at startup, not at first resolution.
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.logging.level.is_empty() {
        return Err(ConfigError::Missing {
            field: "logging.level".to_string(),
        });
    }

    for (role, role_config) in &config.policy.roles {
        for actions in role_config.tables.values() {
            for action in actions {
                if Action::try_parse(action).is_none() {
                    return Err(ConfigError::UnknownAction {
                        role: role.clone(),
                        action: action.clone(),
                    });
                }
            }
        }

        for (table, columns) in &role_config.columns {
            if columns.is_empty() {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "policy.roles.{role}.columns.{table} is empty; omit the key for unrestricted access"
                    ),
                });
            }
        }

        for template in role_config.rows.values() {
            PredicateTemplate::parse(template)?;
        }
    }

    Ok(())
}
