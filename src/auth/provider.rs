//! Authentication provider trait

use crate::error::AuthError;
use crate::session::AttributeBag;
// async_trait required for dyn-compatibility with Box<dyn AuthProvider>
use async_trait::async_trait;

/// What a successful authentication grants: a role and the session's context
/// attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub role: String,
    pub attributes: AttributeBag,
}

/// Authentication provider trait
///
/// Implementations verify an identity/credential pair and return the grant
/// used to build a [`crate::session::SessionContext`]. Failures are uniform
/// (`InvalidCredentials`) so callers cannot distinguish an unknown identity
/// from a wrong credential.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Verify a credential and return the identity's grant
    async fn authenticate(&self, identity: &str, credential: &str)
    -> Result<AuthGrant, AuthError>;

    /// Get a description of the provider (for logging)
    fn provider_type(&self) -> &'static str;
}

/// Box type alias for auth providers
pub type BoxedAuthProvider = Box<dyn AuthProvider>;
