//! Error types for rowguard
//!
//! This module defines the error hierarchy used throughout the engine.
//! We use `thiserror` for library-style errors that are part of the API;
//! denial outcomes are ordinary `Result` values, never panics.

use thiserror::Error;

use crate::policy::Action;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Access denied: {0}")]
    Access(#[from] AccessError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Execution error: {0}")]
    Exec(#[from] ExecError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid predicate template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Unknown action '{action}' in role '{role}'")]
    UnknownAction { role: String, action: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Access control denial outcomes
///
/// Every way a request can be refused is a distinct variant; nothing here is
/// used for control flow outside the resolution path, and no denial is ever
/// downgraded to a partial success.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("Role '{role}' is not permitted to {action} on table '{table}'")]
    PermissionDenied {
        role: String,
        action: Action,
        table: String,
    },

    #[error("None of the requested columns on table '{table}' are accessible to role '{role}'")]
    NoAccessibleColumns { role: String, table: String },

    #[error("Payload sets '{attribute}' to a value the session does not own")]
    ContextViolation { attribute: String },

    #[error("{action} requires a filter condition")]
    MissingCondition { action: Action },

    #[error(
        "Row restriction references context attribute '{attribute}' which is absent from the session"
    )]
    MissingContextAttribute { attribute: String },
}

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Unknown identity or invalid credential")]
    InvalidCredentials,

    #[error("No credential store configured")]
    NotConfigured,

    #[error("Failed to load credential store: {0}")]
    Store(String),
}

/// Execution boundary errors
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("Data store rejected the statement: {0}")]
    Statement(String),

    #[error("Connection to the data store failed: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for resolution outcomes
pub type AccessResult<T> = std::result::Result<T, AccessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_error_messages() {
        let err = AccessError::PermissionDenied {
            role: "customer".into(),
            action: Action::Remove,
            table: "orders".into(),
        };
        assert!(err.to_string().contains("customer"));
        assert!(err.to_string().contains("orders"));

        let err = AccessError::MissingContextAttribute {
            attribute: "store_id".into(),
        };
        assert!(err.to_string().contains("store_id"));
    }

    #[test]
    fn test_access_error_is_comparable() {
        let a = AccessError::MissingCondition {
            action: Action::Remove,
        };
        let b = AccessError::MissingCondition {
            action: Action::Remove,
        };
        assert_eq!(a, b);
    }
}
