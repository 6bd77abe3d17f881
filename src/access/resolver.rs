//! Permission resolver
//!
//! Pure queries over (role permissions, session context, table). Nothing here
//! blocks, mutates, or touches the data store; the resolver only answers what
//! policy says about a table for the session at hand.

use tracing::trace;

use crate::error::AccessResult;
use crate::policy::{Action, ColumnRule, RolePermissions};
use crate::session::SessionContext;

/// Pure permission queries for one session against one permission set
#[derive(Debug, Clone, Copy)]
pub struct PermissionResolver<'a> {
    permissions: &'a RolePermissions,
    context: &'a SessionContext,
}

impl<'a> PermissionResolver<'a> {
    /// Create a resolver for a session's permission set
    pub fn new(permissions: &'a RolePermissions, context: &'a SessionContext) -> Self {
        Self {
            permissions,
            context,
        }
    }

    /// Is the action granted on this table?
    ///
    /// A table absent from the role's action map is denied for every action.
    pub fn may(&self, table: &str, action: Action) -> bool {
        let permitted = self.permissions.permits(table, action);
        trace!(
            role = self.context.role(),
            table,
            action = %action,
            permitted,
            "checked table permission"
        );
        permitted
    }

    /// Which columns may this session touch on the table?
    pub fn allowed_columns(&self, table: &str) -> ColumnRule<'a> {
        self.permissions.column_rule(table)
    }

    /// The mandatory row restriction for the table, rendered against the
    /// session's attributes
    ///
    /// `Ok(None)` when the role carries no restriction for the table. A
    /// restriction that references an attribute the session does not have is
    /// a hard failure, never an omitted clause.
    pub fn row_restriction(&self, table: &str) -> AccessResult<Option<String>> {
        match self.permissions.row_restriction(table) {
            Some(template) => {
                let rendered = template.render(self.context.attributes())?;
                trace!(
                    role = self.context.role(),
                    table,
                    restriction = %rendered,
                    "rendered row restriction"
                );
                Ok(Some(rendered))
            }
            None => Ok(None),
        }
    }
}
