//! Access resolution module
//!
//! The policy resolution and restricted-operation-construction engine.
//!
//! The resolver answers three pure questions about a (role, session, table)
//! triple: is an action permitted, which columns are accessible, and which
//! mandatory row restriction applies with session attributes substituted.
//!
//! The builder composes those answers with the caller's requested operation
//! shape into a [`ResolvedOperation`] that is safe to execute, or fails with a
//! typed denial on the first check that does not hold:
//!
//! - a caller-supplied filter can only narrow a row restriction, never remove
//!   it (the restriction clause is always ANDed in, both sides parenthesized)
//! - an explicit column request that is fully rejected surfaces as a denial
//!   rather than degrading to the allowed set
//! - unconditional update or delete is not reachable through this layer
//! - write payloads cannot claim a context attribute the session does not own

pub mod builder;
pub mod resolver;
pub mod types;

pub use builder::OperationBuilder;
pub use resolver::PermissionResolver;
pub use types::{ColumnSelection, OperationRequest, ResolvedOperation, Value};
