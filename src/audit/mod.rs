//! Audit collaborator
//!
//! Every successfully resolved operation is reported to an [`AuditSink`]
//! before execution. The record carries the finalized statement — what will
//! actually run — never the raw caller-supplied filter alone.
//!
//! Auditing is fire-and-forget: a failing sink is reported through `tracing`
//! and never turns into a denial. The sink is an explicit collaborator passed
//! to the engine, not ambient process state, so tests can substitute a
//! capturing recorder.

use std::sync::Mutex;

use tracing::info;

use crate::access::ResolvedOperation;
use crate::exec::Statement;
use crate::policy::Action;
use crate::session::SessionContext;

/// A structured record of one resolved operation
#[derive(Debug, Clone, PartialEq)]
pub struct AccessRecord {
    pub identity: String,
    pub role: String,
    pub action: Action,
    pub table: String,
    /// The finalized statement text, with bound-parameter placeholders
    pub statement: String,
}

impl AccessRecord {
    /// Build a record from a resolved operation
    pub fn for_operation(context: &SessionContext, operation: &ResolvedOperation) -> Self {
        let statement = Statement::render(operation);
        Self {
            identity: context.identity().to_string(),
            role: context.role().to_string(),
            action: operation.action,
            table: operation.table.clone(),
            statement: statement.sql,
        }
    }
}

/// Sink for access records
pub trait AuditSink: Send + Sync {
    /// Record one resolved operation
    fn record(&self, record: &AccessRecord) -> std::io::Result<()>;
}

/// Audit sink that writes structured log lines through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAudit;

impl AuditSink for TracingAudit {
    fn record(&self, record: &AccessRecord) -> std::io::Result<()> {
        info!(
            target: "rowguard::audit",
            identity = %record.identity,
            role = %record.role,
            action = %record.action,
            table = %record.table,
            statement = %record.statement,
            "database access"
        );
        Ok(())
    }
}

/// Capturing audit sink for tests
#[derive(Debug, Default)]
pub struct MemoryAudit {
    records: Mutex<Vec<AccessRecord>>,
}

impl MemoryAudit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn records(&self) -> Vec<AccessRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, record: &AccessRecord) -> std::io::Result<()> {
        self.records
            .lock()
            .map_err(|_| std::io::Error::other("audit mutex poisoned"))?
            .push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{ColumnSelection, OperationRequest, OperationBuilder};
    use crate::policy::default_policy;
    use crate::session::AttributeBag;

    #[test]
    fn test_record_carries_finalized_statement() {
        let policy = default_policy().unwrap();
        let context = SessionContext::new(
            "customer1",
            "customer",
            AttributeBag {
                customer_id: Some(1),
                ..Default::default()
            },
        );
        let builder = OperationBuilder::new(policy.permissions_for(context.role()), &context);
        let op = builder.resolve(&OperationRequest::read("orders")).unwrap();

        let record = AccessRecord::for_operation(&context, &op);
        assert_eq!(record.identity, "customer1");
        assert_eq!(record.role, "customer");
        // finalized predicate, not the (absent) caller filter
        assert!(record.statement.contains("(customer_id = 1)"));
    }

    #[test]
    fn test_memory_audit_captures_records() {
        let sink = MemoryAudit::new();
        let record = AccessRecord {
            identity: "sales1".into(),
            role: "staff".into(),
            action: Action::Read,
            table: "orders".into(),
            statement: "SELECT * FROM orders".into(),
        };
        sink.record(&record).unwrap();
        sink.record(&record).unwrap();
        assert_eq!(sink.records().len(), 2);
        assert_eq!(sink.records()[0], record);
    }

    #[test]
    fn test_tracing_audit_never_fails() {
        let sink = TracingAudit;
        let record = AccessRecord {
            identity: "sales1".into(),
            role: "staff".into(),
            action: Action::Create,
            table: "orders".into(),
            statement: "INSERT INTO orders (store_id) VALUES (?)".into(),
        };
        assert!(sink.record(&record).is_ok());
    }

    #[test]
    fn test_record_for_write_uses_placeholders() {
        let policy = default_policy().unwrap();
        let context = SessionContext::new(
            "sales1",
            "staff",
            AttributeBag {
                staff_id: Some(4),
                store_id: Some(1),
                customer_id: None,
            },
        );
        let builder = OperationBuilder::new(policy.permissions_for(context.role()), &context);
        let op = builder
            .resolve(&OperationRequest::create(
                "orders",
                vec![("store_id".to_string(), crate::access::Value::Int(1))],
            ))
            .unwrap();
        assert_eq!(op.columns, ColumnSelection::Columns(vec!["store_id".into()]));

        let record = AccessRecord::for_operation(&context, &op);
        // payload values are bound, never inlined into the logged statement
        assert!(record.statement.contains("VALUES (?)"));
    }
}
