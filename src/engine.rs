//! Session engine
//!
//! [`SecureSession`] is the operation surface for one authenticated caller:
//! it *holds* a policy handle, the session context, an audit sink, and an
//! execution boundary (composition, so policy logic stays testable without
//! any data store). Each operation resolves through the builder, reports the
//! finalized operation to the audit sink, and hands it to the executor.
//!
//! Resolution is synchronous and side-effect-free; only the final execution
//! handoff is async. A denial returns before anything is logged as executed.

use std::sync::Arc;
use tracing::{info, warn};

use crate::access::{OperationBuilder, OperationRequest, ResolvedOperation, Value};
use crate::audit::{AccessRecord, AuditSink};
use crate::auth::AuthProvider;
use crate::error::{AccessResult, AppError};
use crate::exec::{ExecOutcome, ExecutionBoundary, Row};
use crate::policy::PolicyStore;
use crate::session::SessionContext;

/// One authenticated caller's handle on the engine
pub struct SecureSession {
    policy: Arc<PolicyStore>,
    context: SessionContext,
    audit: Arc<dyn AuditSink>,
    executor: Arc<dyn ExecutionBoundary>,
}

impl std::fmt::Debug for SecureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureSession")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl SecureSession {
    /// Create a session from an already-built context
    pub fn new(
        policy: Arc<PolicyStore>,
        context: SessionContext,
        audit: Arc<dyn AuditSink>,
        executor: Arc<dyn ExecutionBoundary>,
    ) -> Self {
        Self {
            policy,
            context,
            audit,
            executor,
        }
    }

    /// Authenticate an identity and open a session for it
    pub async fn open(
        policy: Arc<PolicyStore>,
        auth: &dyn AuthProvider,
        identity: &str,
        credential: &str,
        audit: Arc<dyn AuditSink>,
        executor: Arc<dyn ExecutionBoundary>,
    ) -> Result<Self, AppError> {
        let grant = auth.authenticate(identity, credential).await?;
        info!(identity, role = %grant.role, "session opened");
        let context = SessionContext::new(identity, grant.role, grant.attributes);
        Ok(Self::new(policy, context, audit, executor))
    }

    /// The session's immutable context
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Resolve a request without executing it
    ///
    /// Pure with respect to the data store; useful for checking what an
    /// operation would become.
    pub fn resolve(&self, request: &OperationRequest) -> AccessResult<ResolvedOperation> {
        let permissions = self.policy.permissions_for(self.context.role());
        OperationBuilder::new(permissions, &self.context).resolve(request)
    }

    /// Resolve, audit, and execute a request
    pub async fn run(&self, request: &OperationRequest) -> Result<ExecOutcome, AppError> {
        let operation = self.resolve(request)?;

        let record = AccessRecord::for_operation(&self.context, &operation);
        if let Err(e) = self.audit.record(&record) {
            // Fire-and-forget: a failing sink is reported, never a denial.
            warn!(error = %e, "audit sink failed; continuing");
        }

        Ok(self.executor.execute(&operation).await?)
    }

    /// Read rows from a table
    pub async fn select(
        &self,
        table: &str,
        columns: &[&str],
        filter: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<Row>, AppError> {
        let mut request = OperationRequest::read(table).with_columns(columns);
        if let Some(filter) = filter {
            request = request.with_filter(filter);
        }
        if let Some(limit) = limit {
            request = request.with_limit(limit);
        }

        match self.run(&request).await? {
            ExecOutcome::Rows(rows) => Ok(rows),
            ExecOutcome::Affected(_) => Ok(Vec::new()),
        }
    }

    /// Insert a row into a table
    pub async fn insert(
        &self,
        table: &str,
        payload: Vec<(String, Value)>,
    ) -> Result<u64, AppError> {
        let request = OperationRequest::create(table, payload);
        Ok(affected(self.run(&request).await?))
    }

    /// Update rows matching a filter
    pub async fn update(
        &self,
        table: &str,
        payload: Vec<(String, Value)>,
        filter: &str,
    ) -> Result<u64, AppError> {
        let request = OperationRequest::modify(table, payload).with_filter(filter);
        Ok(affected(self.run(&request).await?))
    }

    /// Delete rows matching a filter
    pub async fn delete(&self, table: &str, filter: &str) -> Result<u64, AppError> {
        let request = OperationRequest::remove(table).with_filter(filter);
        Ok(affected(self.run(&request).await?))
    }
}

fn affected(outcome: ExecOutcome) -> u64 {
    match outcome {
        ExecOutcome::Affected(count) => count,
        ExecOutcome::Rows(_) => 0,
    }
}
