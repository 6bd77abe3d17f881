//! Policy types
//!
//! Core types describing what a role is allowed to do.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::OnceLock;

use crate::config::PolicyConfig;
use crate::error::ConfigError;
use crate::policy::template::PredicateTemplate;

/// Data store action a role may be granted
///
/// Mirrors the four basic SQL statements: SELECT, INSERT, UPDATE, DELETE.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Create,
    Modify,
    Remove,
}

impl Action {
    /// Get the action name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Modify => "modify",
            Action::Remove => "remove",
        }
    }

    /// The SQL verb this action maps to
    pub const fn sql_verb(&self) -> &'static str {
        match self {
            Action::Read => "SELECT",
            Action::Create => "INSERT",
            Action::Modify => "UPDATE",
            Action::Remove => "DELETE",
        }
    }

    /// Try to parse an action from a string
    ///
    /// Accepts both the engine vocabulary (`read`, `create`, ...) and the
    /// SQL verbs (`select`, `insert`, ...) so policy files can use either.
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "read" | "select" => Some(Action::Read),
            "create" | "insert" => Some(Action::Create),
            "modify" | "update" => Some(Action::Modify),
            "remove" | "delete" => Some(Action::Remove),
            _ => None,
        }
    }

    /// Check if this action mutates data
    pub const fn is_mutating(&self) -> bool {
        !matches!(self, Action::Read)
    }

    /// Get all actions
    pub const fn all() -> &'static [Action] {
        &[Action::Read, Action::Create, Action::Modify, Action::Remove]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Column access rule for one table
///
/// Absence of a column allowlist entry means the role may touch every column;
/// presence means exactly that set. Column rules are orthogonal to action
/// permission and are always intersected with the caller's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule<'a> {
    /// No column restriction for this table
    Unrestricted,
    /// Only these columns are accessible
    Only(&'a [String]),
}

/// Permission set for a single role
///
/// Every role carries all three restriction maps explicitly, possibly empty,
/// so "no restriction" and "missing key" are never conflated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RolePermissions {
    /// Allowed actions per table; a table absent here is fully denied
    table_actions: BTreeMap<String, BTreeSet<Action>>,
    /// Column allowlist per table; a table absent here is unrestricted
    column_rules: BTreeMap<String, Vec<String>>,
    /// Mandatory row-restriction template per table
    row_restrictions: BTreeMap<String, PredicateTemplate>,
}

impl RolePermissions {
    /// Create an empty permission set (denies everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant actions on a table
    pub fn allow(mut self, table: &str, actions: &[Action]) -> Self {
        self.table_actions
            .entry(table.to_string())
            .or_default()
            .extend(actions.iter().copied());
        self
    }

    /// Limit accessible columns on a table
    pub fn limit_columns(mut self, table: &str, columns: &[&str]) -> Self {
        self.column_rules.insert(
            table.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    /// Attach a mandatory row-restriction template to a table
    pub fn restrict_rows(mut self, table: &str, template: &str) -> Result<Self, ConfigError> {
        let template = PredicateTemplate::parse(template)?;
        self.row_restrictions.insert(table.to_string(), template);
        Ok(self)
    }

    /// Check whether an action is granted on a table
    pub fn permits(&self, table: &str, action: Action) -> bool {
        self.table_actions
            .get(table)
            .is_some_and(|actions| actions.contains(&action))
    }

    /// Column rule for a table
    pub fn column_rule(&self, table: &str) -> ColumnRule<'_> {
        match self.column_rules.get(table) {
            Some(columns) => ColumnRule::Only(columns),
            None => ColumnRule::Unrestricted,
        }
    }

    /// Row-restriction template for a table, if any
    pub fn row_restriction(&self, table: &str) -> Option<&PredicateTemplate> {
        self.row_restrictions.get(table)
    }

    /// Tables this role has at least one granted action on
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.table_actions.keys().map(String::as_str)
    }

    /// Granted actions on a table
    pub fn actions_for(&self, table: &str) -> impl Iterator<Item = Action> + '_ {
        self.table_actions
            .get(table)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// True if no table has any granted action
    pub fn is_empty(&self) -> bool {
        self.table_actions.is_empty()
    }
}

/// Immutable role-name → permission-set mapping
///
/// Built once at process start; safe to share across arbitrarily many
/// concurrent sessions without synchronization. Unknown roles resolve to a
/// shared empty permission set.
#[derive(Debug, Clone)]
pub struct PolicyStore {
    roles: HashMap<String, RolePermissions>,
}

fn empty_permissions() -> &'static RolePermissions {
    static EMPTY: OnceLock<RolePermissions> = OnceLock::new();
    EMPTY.get_or_init(RolePermissions::new)
}

impl PolicyStore {
    /// Create a store from a prepared role map
    pub fn new(roles: HashMap<String, RolePermissions>) -> Self {
        Self { roles }
    }

    /// Build a store from loaded configuration
    ///
    /// An empty `[policy.roles]` table falls back to the built-in default
    /// policy, so a minimal configuration file still yields a working engine.
    pub fn from_config(config: &PolicyConfig) -> Result<Self, ConfigError> {
        if config.roles.is_empty() {
            return crate::policy::defaults::default_policy();
        }

        let mut roles = HashMap::with_capacity(config.roles.len());
        for (role_name, role_config) in &config.roles {
            let mut perms = RolePermissions::new();

            for (table, actions) in &role_config.tables {
                let mut parsed = Vec::with_capacity(actions.len());
                for action in actions {
                    let action = Action::try_parse(action).ok_or_else(|| {
                        ConfigError::UnknownAction {
                            role: role_name.clone(),
                            action: action.clone(),
                        }
                    })?;
                    parsed.push(action);
                }
                perms = perms.allow(table, &parsed);
            }

            for (table, columns) in &role_config.columns {
                let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
                perms = perms.limit_columns(table, &columns);
            }

            for (table, template) in &role_config.rows {
                perms = perms.restrict_rows(table, template)?;
            }

            roles.insert(role_name.clone(), perms);
        }

        Ok(Self { roles })
    }

    /// Look up the permission set for a role
    ///
    /// Unknown roles get the empty set: deny-by-default, not an error.
    pub fn permissions_for(&self, role: &str) -> &RolePermissions {
        self.roles.get(role).unwrap_or_else(|| empty_permissions())
    }

    /// Names of all defined roles
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    /// Number of defined roles
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// True if no roles are defined
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse_both_vocabularies() {
        assert_eq!(Action::try_parse("read"), Some(Action::Read));
        assert_eq!(Action::try_parse("SELECT"), Some(Action::Read));
        assert_eq!(Action::try_parse("insert"), Some(Action::Create));
        assert_eq!(Action::try_parse("update"), Some(Action::Modify));
        assert_eq!(Action::try_parse("delete"), Some(Action::Remove));
        assert_eq!(Action::try_parse("truncate"), None);
    }

    #[test]
    fn test_action_sql_verbs() {
        assert_eq!(Action::Read.sql_verb(), "SELECT");
        assert_eq!(Action::Create.sql_verb(), "INSERT");
        assert_eq!(Action::Modify.sql_verb(), "UPDATE");
        assert_eq!(Action::Remove.sql_verb(), "DELETE");
    }

    #[test]
    fn test_permits_unknown_table_is_denied() {
        let perms = RolePermissions::new().allow("orders", &[Action::Read]);
        for action in Action::all() {
            assert!(!perms.permits("stores", *action));
        }
    }

    #[test]
    fn test_column_rule_absence_means_unrestricted() {
        let perms = RolePermissions::new()
            .allow("customers", &[Action::Read])
            .limit_columns("customers", &["customer_id", "email"]);

        assert!(matches!(
            perms.column_rule("customers"),
            ColumnRule::Only(cols) if cols.len() == 2
        ));
        assert_eq!(perms.column_rule("orders"), ColumnRule::Unrestricted);
    }

    #[test]
    fn test_unknown_role_gets_empty_permissions() {
        let store = PolicyStore::new(HashMap::new());
        let perms = store.permissions_for("nobody");
        assert!(perms.is_empty());
        assert!(!perms.permits("orders", Action::Read));
    }

    #[test]
    fn test_roles_are_listed() {
        let mut roles = HashMap::new();
        roles.insert(
            "staff".to_string(),
            RolePermissions::new().allow("orders", &[Action::Read]),
        );
        let store = PolicyStore::new(roles);
        assert_eq!(store.len(), 1);
        assert_eq!(store.roles().collect::<Vec<_>>(), vec!["staff"]);
    }
}
