//! Predicate templates
//!
//! A row restriction is a predicate string with `{name}` placeholders, e.g.
//! `store_id = {store_id}`, bound against session attributes at resolution
//! time. Placeholders are extracted once at policy-load time; rendering with a
//! session that lacks a referenced attribute is a hard failure, never a
//! silently dropped restriction.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{AccessError, AccessResult, ConfigError};
use crate::session::AttributeBag;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex"))
}

/// Parsed row-restriction template
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateTemplate {
    source: String,
    placeholders: Vec<String>,
}

impl PredicateTemplate {
    /// Parse a template, extracting its placeholder names
    ///
    /// Placeholders must name known session context attributes; anything else
    /// could never be bound and is rejected at load time.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        if source.trim().is_empty() {
            return Err(ConfigError::InvalidTemplate {
                template: source.to_string(),
                reason: "template is empty".to_string(),
            });
        }

        let mut placeholders = Vec::new();
        for captures in placeholder_regex().captures_iter(source) {
            let name = captures[1].to_string();
            if !AttributeBag::is_known(&name) {
                return Err(ConfigError::InvalidTemplate {
                    template: source.to_string(),
                    reason: format!("unknown context attribute '{name}'"),
                });
            }
            if !placeholders.contains(&name) {
                placeholders.push(name);
            }
        }

        Ok(Self {
            source: source.to_string(),
            placeholders,
        })
    }

    /// The raw template text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names referenced by this template
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Substitute every placeholder from the session's attribute bag
    ///
    /// A placeholder whose attribute is absent fails with
    /// `MissingContextAttribute`; the restriction is never omitted.
    pub fn render(&self, attributes: &AttributeBag) -> AccessResult<String> {
        let mut rendered = self.source.clone();
        for name in &self.placeholders {
            let value = attributes.get(name).ok_or_else(|| {
                AccessError::MissingContextAttribute {
                    attribute: name.clone(),
                }
            })?;
            rendered = rendered.replace(&format!("{{{name}}}"), &value.to_string());
        }
        Ok(rendered)
    }
}
