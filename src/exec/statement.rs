//! Statement rendering
//!
//! Turns a [`ResolvedOperation`] into parameterized SQL text plus an ordered
//! bound-parameter list. Table and column names come only from the policy
//! vocabulary and allowlist-validated caller choices; payload values are
//! always `?` placeholders.

use std::fmt::Write as _;

use crate::access::{ColumnSelection, ResolvedOperation, Value};
use crate::policy::Action;

/// A parameterized statement ready for a driver
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text with `?` placeholders for every payload value
    pub sql: String,
    /// Bound values, in placeholder order
    pub params: Vec<Value>,
}

impl Statement {
    /// Render a resolved operation
    pub fn render(operation: &ResolvedOperation) -> Self {
        match operation.action {
            Action::Read => render_select(operation),
            Action::Create => render_insert(operation),
            Action::Modify => render_update(operation),
            Action::Remove => render_delete(operation),
        }
    }
}

fn render_select(op: &ResolvedOperation) -> Statement {
    let mut sql = format!("SELECT {} FROM {}", op.columns, op.table);
    if let Some(predicate) = &op.predicate {
        let _ = write!(sql, " WHERE {predicate}");
    }
    if let Some(limit) = op.limit {
        let _ = write!(sql, " LIMIT {limit}");
    }
    Statement {
        sql,
        params: Vec::new(),
    }
}

fn render_insert(op: &ResolvedOperation) -> Statement {
    let columns: Vec<&str> = op.payload.iter().map(|(col, _)| col.as_str()).collect();
    let placeholders: Vec<&str> = op.payload.iter().map(|_| "?").collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        op.table,
        columns.join(", "),
        placeholders.join(", ")
    );
    Statement {
        sql,
        params: op.payload.iter().map(|(_, value)| value.clone()).collect(),
    }
}

fn render_update(op: &ResolvedOperation) -> Statement {
    let assignments: Vec<String> = op
        .payload
        .iter()
        .map(|(col, _)| format!("{col} = ?"))
        .collect();
    let mut sql = format!("UPDATE {} SET {}", op.table, assignments.join(", "));
    if let Some(predicate) = &op.predicate {
        let _ = write!(sql, " WHERE {predicate}");
    }
    Statement {
        sql,
        params: op.payload.iter().map(|(_, value)| value.clone()).collect(),
    }
}

fn render_delete(op: &ResolvedOperation) -> Statement {
    let mut sql = format!("DELETE FROM {}", op.table);
    if let Some(predicate) = &op.predicate {
        let _ = write!(sql, " WHERE {predicate}");
    }
    Statement {
        sql,
        params: Vec::new(),
    }
}
