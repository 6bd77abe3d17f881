//! Restricted operation builder
//!
//! Composes resolver decisions with the caller's requested shape into a final
//! [`ResolvedOperation`]. The build is a state machine per request, terminal
//! on the first failed check; on failure no partial operation exists.

use tracing::debug;

use crate::access::resolver::PermissionResolver;
use crate::access::types::{ColumnSelection, OperationRequest, ResolvedOperation};
use crate::error::{AccessError, AccessResult};
use crate::policy::{Action, ColumnRule, RolePermissions};
use crate::session::{AttributeBag, SessionContext};

/// Builds permission-checked operations for one session
pub struct OperationBuilder<'a> {
    resolver: PermissionResolver<'a>,
    context: &'a SessionContext,
}

impl<'a> OperationBuilder<'a> {
    /// Create a builder over a session's permission set
    pub fn new(permissions: &'a RolePermissions, context: &'a SessionContext) -> Self {
        Self {
            resolver: PermissionResolver::new(permissions, context),
            context,
        }
    }

    /// Resolve a request into a safe-to-execute operation, or a typed denial
    ///
    /// Resolution is deterministic: the same request against the same policy
    /// and session always yields the same operation.
    pub fn resolve(&self, request: &OperationRequest) -> AccessResult<ResolvedOperation> {
        if !self.resolver.may(&request.table, request.action) {
            debug!(
                role = self.context.role(),
                table = %request.table,
                action = %request.action,
                "permission denied"
            );
            return Err(AccessError::PermissionDenied {
                role: self.context.role().to_string(),
                action: request.action,
                table: request.table.clone(),
            });
        }

        match request.action {
            Action::Read => self.resolve_read(request),
            Action::Create => self.resolve_create(request),
            Action::Modify | Action::Remove => self.resolve_mutation(request),
        }
    }

    fn resolve_read(&self, request: &OperationRequest) -> AccessResult<ResolvedOperation> {
        let columns = self.effective_columns(request)?;
        let restriction = self.resolver.row_restriction(&request.table)?;
        let predicate = combine_predicates(request.filter.as_deref(), restriction.as_deref());

        Ok(ResolvedOperation {
            table: request.table.clone(),
            action: Action::Read,
            columns,
            predicate,
            payload: Vec::new(),
            limit: request.limit,
        })
    }

    fn resolve_create(&self, request: &OperationRequest) -> AccessResult<ResolvedOperation> {
        self.check_context_ownership(request)?;

        // No pre-existing row to filter; the context-equality check above is
        // the write-side counterpart of the row restriction.
        Ok(ResolvedOperation {
            table: request.table.clone(),
            action: Action::Create,
            columns: ColumnSelection::Columns(
                request.payload.iter().map(|(col, _)| col.clone()).collect(),
            ),
            predicate: None,
            payload: request.payload.clone(),
            limit: None,
        })
    }

    fn resolve_mutation(&self, request: &OperationRequest) -> AccessResult<ResolvedOperation> {
        // Unconditional mass mutation or deletion must not be reachable here.
        let filter = match request.filter.as_deref() {
            Some(filter) if !filter.trim().is_empty() => filter,
            _ => {
                return Err(AccessError::MissingCondition {
                    action: request.action,
                });
            }
        };

        if request.action == Action::Modify {
            self.check_context_ownership(request)?;
        }

        let restriction = self.resolver.row_restriction(&request.table)?;
        let predicate = combine_predicates(Some(filter), restriction.as_deref());

        let columns = if request.action == Action::Modify {
            ColumnSelection::Columns(
                request.payload.iter().map(|(col, _)| col.clone()).collect(),
            )
        } else {
            ColumnSelection::All
        };

        Ok(ResolvedOperation {
            table: request.table.clone(),
            action: request.action,
            columns,
            predicate,
            payload: request.payload.clone(),
            limit: None,
        })
    }

    /// Intersect the caller's column request with the role's allowlist
    fn effective_columns(&self, request: &OperationRequest) -> AccessResult<ColumnSelection> {
        match self.resolver.allowed_columns(&request.table) {
            ColumnRule::Unrestricted => {
                if request.columns.is_empty() {
                    Ok(ColumnSelection::All)
                } else {
                    Ok(ColumnSelection::Columns(request.columns.clone()))
                }
            }
            ColumnRule::Only(allowed) => {
                if request.columns.is_empty() {
                    // No explicit request: the allowed set is the selection.
                    return Ok(ColumnSelection::Columns(allowed.to_vec()));
                }
                // Explicit request: intersect, preserving the caller's order.
                let kept: Vec<String> = request
                    .columns
                    .iter()
                    .filter(|col| allowed.contains(col))
                    .cloned()
                    .collect();
                if kept.is_empty() {
                    // An explicit but fully rejected request is a denial, not
                    // a silent fallback to the allowed set.
                    return Err(AccessError::NoAccessibleColumns {
                        role: self.context.role().to_string(),
                        table: request.table.clone(),
                    });
                }
                Ok(ColumnSelection::Columns(kept))
            }
        }
    }

    /// Reject write payloads that claim a context attribute the session does
    /// not own
    fn check_context_ownership(&self, request: &OperationRequest) -> AccessResult<()> {
        for (column, value) in &request.payload {
            if !AttributeBag::is_known(column) {
                continue;
            }
            let Some(owned) = self.context.attributes().get(column) else {
                // Session has no value for this attribute (e.g. admin): the
                // payload may set it freely.
                continue;
            };
            if value.as_int() != Some(owned) {
                debug!(
                    role = self.context.role(),
                    table = %request.table,
                    attribute = %column,
                    "payload claims a foreign context attribute"
                );
                return Err(AccessError::ContextViolation {
                    attribute: column.clone(),
                });
            }
        }
        Ok(())
    }
}

/// AND-combine the caller filter with the mandatory row restriction
///
/// Each clause is parenthesized independently so operator precedence in
/// caller-supplied text cannot loosen the restriction.
fn combine_predicates(filter: Option<&str>, restriction: Option<&str>) -> Option<String> {
    match (filter, restriction) {
        (Some(f), Some(r)) => Some(format!("({f}) AND ({r})")),
        (Some(f), None) => Some(format!("({f})")),
        (None, Some(r)) => Some(format!("({r})")),
        (None, None) => None,
    }
}
