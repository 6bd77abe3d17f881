//! Policy module
//!
//! The policy store is the static, immutable vocabulary of the engine: which
//! roles exist, which actions each role may perform per table, which columns
//! it may touch, and which mandatory row restriction applies.
//!
//! Policy is loaded once at process start (from configuration or the built-in
//! default policy) and shared read-only across sessions. Unknown roles resolve
//! to an empty permission set, so "unknown role" means "deny everything"
//! without being a special case anywhere else.
//!
//! ## Example configuration
//!
//! ```toml
//! [policy.roles.store_manager.tables]
//! stocks = ["read", "modify"]
//! customers = ["read"]
//!
//! [policy.roles.store_manager.columns]
//! customers = ["customer_id", "first_name", "last_name", "email", "phone"]
//!
//! [policy.roles.store_manager.rows]
//! stocks = "store_id = {store_id}"
//! ```

pub mod defaults;
pub mod template;
pub mod types;

pub use defaults::default_policy;
pub use template::PredicateTemplate;
pub use types::{Action, ColumnRule, PolicyStore, RolePermissions};
