//! Execution boundary
//!
//! The seam between the engine and the data store. A [`ResolvedOperation`] is
//! rendered into a parameterized [`Statement`] — payload values travel as
//! bound parameters, never interpolated text — and handed to an
//! [`ExecutionBoundary`] implementation. Retry and timeout policy belongs to
//! the implementation, not to the engine; the resolver itself never blocks.
//!
//! This crate ships only a [`DryRunExecutor`]; real drivers implement the
//! trait outside.

pub mod statement;

pub use statement::Statement;

use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::info;

use crate::access::{ResolvedOperation, Value};
use crate::error::ExecError;
use crate::policy::Action;

/// One result row, column name → value
pub type Row = BTreeMap<String, Value>;

/// Outcome of executing a resolved operation
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    /// Rows returned by a read
    Rows(Vec<Row>),
    /// Rows affected by a write
    Affected(u64),
}

/// Data store execution interface
///
/// One connection/session handle per concurrent caller; the engine performs
/// no pooling and no internal retries.
#[async_trait]
pub trait ExecutionBoundary: Send + Sync {
    /// Execute a resolved operation with bound parameters
    async fn execute(&self, operation: &ResolvedOperation) -> Result<ExecOutcome, ExecError>;
}

/// Executor that logs the rendered statement and touches no data store
///
/// Useful for demos and for verifying what would run.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunExecutor;

#[async_trait]
impl ExecutionBoundary for DryRunExecutor {
    async fn execute(&self, operation: &ResolvedOperation) -> Result<ExecOutcome, ExecError> {
        let statement = Statement::render(operation);
        info!(
            sql = %statement.sql,
            params = statement.params.len(),
            "dry-run execution"
        );
        Ok(match operation.action {
            Action::Read => ExecOutcome::Rows(Vec::new()),
            _ => ExecOutcome::Affected(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::ColumnSelection;

    #[tokio::test]
    async fn test_dry_run_read_returns_no_rows() {
        let op = ResolvedOperation {
            table: "orders".into(),
            action: Action::Read,
            columns: ColumnSelection::All,
            predicate: Some("(customer_id = 1)".into()),
            payload: Vec::new(),
            limit: None,
        };
        let outcome = DryRunExecutor.execute(&op).await.unwrap();
        assert_eq!(outcome, ExecOutcome::Rows(Vec::new()));
    }

    #[tokio::test]
    async fn test_dry_run_write_affects_nothing() {
        let op = ResolvedOperation {
            table: "stocks".into(),
            action: Action::Modify,
            columns: ColumnSelection::Columns(vec!["quantity".into()]),
            predicate: Some("(product_id = 1) AND (store_id = 1)".into()),
            payload: vec![("quantity".into(), Value::Int(50))],
            limit: None,
        };
        let outcome = DryRunExecutor.execute(&op).await.unwrap();
        assert_eq!(outcome, ExecOutcome::Affected(0));
    }
}
