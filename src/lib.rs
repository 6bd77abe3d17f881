//! rowguard
//!
//! A role-based access control engine for structured data operations.
//!
//! Given an authenticated identity's role and context attributes, the engine
//! decides which tables, columns, and rows a requested operation may touch
//! and produces a restricted operation description safe to execute. Every
//! denial is a typed outcome; the engine fails closed.
//!
//! ## Restriction layers
//!
//! ```text
//! table/action grant → column allowlist → mandatory row restriction
//! ```
//!
//! - A table absent from a role's action map is denied for every action.
//! - A column allowlist is intersected with the caller's request; a fully
//!   rejected explicit request is a denial, not a fallback.
//! - A row restriction is a predicate template (`store_id = {store_id}`)
//!   bound against session attributes and ANDed into every predicate on that
//!   table; a caller filter can only narrow it further.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rowguard::{
//!     AttributeBag, OperationRequest, SecureSession, SessionContext,
//!     audit::TracingAudit, exec::DryRunExecutor, policy::default_policy,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let policy = Arc::new(default_policy()?);
//! let context = SessionContext::new(
//!     "store1_manager",
//!     "store_manager",
//!     AttributeBag { store_id: Some(1), ..Default::default() },
//! );
//! let session = SecureSession::new(
//!     policy,
//!     context,
//!     Arc::new(TracingAudit),
//!     Arc::new(DryRunExecutor),
//! );
//!
//! let op = session.resolve(&OperationRequest::read("orders"))?;
//! assert_eq!(op.predicate.as_deref(), Some("(store_id = 1)"));
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod audit;
pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod exec;
pub mod policy;
pub mod session;
pub mod util;

// Re-export main types
pub use access::{ColumnSelection, OperationRequest, ResolvedOperation, Value};
pub use config::{AppConfig, load_config};
pub use engine::SecureSession;
pub use error::{AccessError, AppError, Result};
pub use policy::{Action, PolicyStore};
pub use session::{AttributeBag, SessionContext};
