//! Session context
//!
//! The authenticated identity's role plus a fixed set of named context
//! attributes, established once at authentication and immutable for the
//! session's lifetime.

use serde::Deserialize;
use std::fmt;

/// Names of the context attributes a session may carry
pub const CONTEXT_ATTRIBUTES: &[&str] = &["staff_id", "store_id", "customer_id"];

/// Optional context attributes bound to a session
///
/// `None` means "not applicable to this identity" (an admin has no store,
/// a customer has no staff id).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct AttributeBag {
    #[serde(default)]
    pub staff_id: Option<i64>,
    #[serde(default)]
    pub store_id: Option<i64>,
    #[serde(default)]
    pub customer_id: Option<i64>,
}

impl AttributeBag {
    /// Look up an attribute by name
    pub fn get(&self, name: &str) -> Option<i64> {
        match name {
            "staff_id" => self.staff_id,
            "store_id" => self.store_id,
            "customer_id" => self.customer_id,
            _ => None,
        }
    }

    /// Check whether a name is a recognized context attribute
    pub fn is_known(name: &str) -> bool {
        CONTEXT_ATTRIBUTES.contains(&name)
    }
}

impl fmt::Display for AttributeBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in CONTEXT_ATTRIBUTES {
            if let Some(value) = self.get(name) {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{name}={value}")?;
                first = false;
            }
        }
        if first {
            write!(f, "(none)")?;
        }
        Ok(())
    }
}

/// Immutable per-session context: who is acting, as which role, with which
/// context attributes
///
/// Built once from an authentication grant; exclusively owned by the caller
/// that created it. Carries no mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    identity: String,
    role: String,
    attributes: AttributeBag,
}

impl SessionContext {
    /// Create a session context for an authenticated identity
    pub fn new(
        identity: impl Into<String>,
        role: impl Into<String>,
        attributes: AttributeBag,
    ) -> Self {
        Self {
            identity: identity.into(),
            role: role.into(),
            attributes,
        }
    }

    /// The authenticated identity
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The role this session acts as
    pub fn role(&self) -> &str {
        &self.role
    }

    /// The session's context attributes
    pub fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_name() {
        let bag = AttributeBag {
            staff_id: Some(4),
            store_id: Some(1),
            customer_id: None,
        };
        assert_eq!(bag.get("staff_id"), Some(4));
        assert_eq!(bag.get("store_id"), Some(1));
        assert_eq!(bag.get("customer_id"), None);
        assert_eq!(bag.get("region_id"), None);
    }

    #[test]
    fn test_known_attributes() {
        assert!(AttributeBag::is_known("store_id"));
        assert!(AttributeBag::is_known("customer_id"));
        assert!(!AttributeBag::is_known("password"));
    }

    #[test]
    fn test_display_skips_absent_attributes() {
        let bag = AttributeBag {
            store_id: Some(2),
            ..Default::default()
        };
        assert_eq!(bag.to_string(), "store_id=2");
        assert_eq!(AttributeBag::default().to_string(), "(none)");
    }

    #[test]
    fn test_session_context_accessors() {
        let context = SessionContext::new(
            "sales1",
            "staff",
            AttributeBag {
                staff_id: Some(4),
                store_id: Some(1),
                customer_id: None,
            },
        );
        assert_eq!(context.identity(), "sales1");
        assert_eq!(context.role(), "staff");
        assert_eq!(context.attributes().store_id, Some(1));
    }
}
