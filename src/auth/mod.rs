//! Authentication module
//!
//! The engine consumes authentication exactly once, to build a session
//! context: `authenticate(identity, credential)` either yields a role plus an
//! attribute bag, or a clear failure. The trait is object-safe so harnesses
//! can swap providers; this crate ships a file-backed credential store with a
//! built-in default table for the demo binary.

pub mod credentials;
pub mod provider;

pub use credentials::StaticAuthProvider;
pub use provider::{AuthGrant, AuthProvider, BoxedAuthProvider};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Create an auth provider from configuration
pub fn create_auth_provider(config: &AuthConfig) -> Result<BoxedAuthProvider, AuthError> {
    match &config.credentials_path {
        Some(path) => Ok(Box::new(StaticAuthProvider::from_path(path)?)),
        None => Ok(Box::new(StaticAuthProvider::with_defaults())),
    }
}
