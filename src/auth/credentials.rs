//! File-backed credential store
//!
//! Verifies identities against a TOML credential table. Ships a built-in
//! default table for the demo binary; real deployments point
//! `auth.credentials_path` at their own file. Passwords are held as
//! [`SecretString`] so they never appear in debug output or logs.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::auth::provider::{AuthGrant, AuthProvider};
use crate::error::AuthError;
use crate::session::AttributeBag;
use crate::util::SecretString;

/// One entry in the credential table
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialEntry {
    password: SecretString,
    role: String,
    #[serde(flatten)]
    attributes: AttributeBag,
}

#[derive(Debug, Deserialize)]
struct CredentialFile {
    #[serde(default)]
    users: HashMap<String, CredentialEntry>,
}

/// Static credential-table auth provider
#[derive(Debug, Clone)]
pub struct StaticAuthProvider {
    users: HashMap<String, CredentialEntry>,
}

impl StaticAuthProvider {
    /// Load a credential table from a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AuthError::Store(format!("{}: {e}", path.display())))?;
        let file: CredentialFile =
            toml::from_str(&contents).map_err(|e| AuthError::Store(e.to_string()))?;
        debug!(
            path = %path.display(),
            users = file.users.len(),
            "loaded credential store"
        );
        Ok(Self { users: file.users })
    }

    /// Build from prepared entries (used by tests)
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, CredentialEntry)>,
    ) -> Self {
        Self {
            users: entries.into_iter().collect(),
        }
    }

    /// The built-in default credential table for the retail sample policy
    pub fn with_defaults() -> Self {
        fn entry(
            password: &str,
            role: &str,
            staff_id: Option<i64>,
            store_id: Option<i64>,
            customer_id: Option<i64>,
        ) -> CredentialEntry {
            CredentialEntry {
                password: SecretString::new(password),
                role: role.to_string(),
                attributes: AttributeBag {
                    staff_id,
                    store_id,
                    customer_id,
                },
            }
        }

        let users = HashMap::from([
            ("admin".to_string(), entry("admin_pass", "admin", None, None, None)),
            (
                "executive".to_string(),
                entry("exec_pass", "executive", Some(1), None, None),
            ),
            (
                "store1_manager".to_string(),
                entry("manager1_pass", "store_manager", Some(2), Some(1), None),
            ),
            (
                "store2_manager".to_string(),
                entry("manager2_pass", "store_manager", Some(5), Some(2), None),
            ),
            (
                "store3_manager".to_string(),
                entry("manager3_pass", "store_manager", Some(8), Some(3), None),
            ),
            (
                "team_lead1".to_string(),
                entry("team1_pass", "team_lead", Some(3), Some(1), None),
            ),
            (
                "sales1".to_string(),
                entry("sales1_pass", "staff", Some(4), Some(1), None),
            ),
            (
                "customer1".to_string(),
                entry("customer1_pass", "customer", None, None, Some(1)),
            ),
        ]);

        Self { users }
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn authenticate(
        &self,
        identity: &str,
        credential: &str,
    ) -> Result<AuthGrant, AuthError> {
        let entry = self
            .users
            .get(identity)
            .ok_or(AuthError::InvalidCredentials)?;

        if entry.password.expose_secret() != credential {
            return Err(AuthError::InvalidCredentials);
        }

        debug!(identity, role = %entry.role, "authentication succeeded");
        Ok(AuthGrant {
            role: entry.role.clone(),
            attributes: entry.attributes,
        })
    }

    fn provider_type(&self) -> &'static str {
        "static credential table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_table_authenticates() {
        let provider = StaticAuthProvider::with_defaults();
        let grant = provider.authenticate("sales1", "sales1_pass").await.unwrap();
        assert_eq!(grant.role, "staff");
        assert_eq!(grant.attributes.store_id, Some(1));
        assert_eq!(grant.attributes.customer_id, None);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let provider = StaticAuthProvider::with_defaults();
        let err = provider.authenticate("admin", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_identity_same_error_as_wrong_password() {
        let provider = StaticAuthProvider::with_defaults();
        let unknown = provider.authenticate("nobody", "x").await.unwrap_err();
        let wrong = provider.authenticate("admin", "x").await.unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(
            &path,
            r#"
[users.clerk]
password = "clerk_pass"
role = "staff"
staff_id = 9
store_id = 2
"#,
        )
        .unwrap();

        let provider = StaticAuthProvider::from_path(&path).unwrap();
        let grant = provider.authenticate("clerk", "clerk_pass").await.unwrap();
        assert_eq!(grant.role, "staff");
        assert_eq!(grant.attributes.store_id, Some(2));
    }

    #[test]
    fn test_missing_file_is_store_error() {
        let result = StaticAuthProvider::from_path("/nonexistent/credentials.toml");
        assert!(matches!(result.unwrap_err(), AuthError::Store(_)));
    }
}
