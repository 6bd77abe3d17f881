//! Built-in default policy
//!
//! The retail sample policy the engine ships with: six roles over the nine
//! tables of a bike-store schema. Used when no `[policy.roles]` section is
//! configured, and by the test suites as a realistic policy fixture.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::policy::types::{Action, PolicyStore, RolePermissions};

use Action::{Create, Modify, Read};

const ALL_TABLES: &[&str] = &[
    "brands",
    "categories",
    "customers",
    "orders",
    "order_items",
    "products",
    "staffs",
    "stocks",
    "stores",
];

/// Columns of the customers table visible to store-side roles
const CUSTOMER_CONTACT_COLUMNS: &[&str] =
    &["customer_id", "first_name", "last_name", "email", "phone"];

/// Build the built-in default policy store
pub fn default_policy() -> Result<PolicyStore, ConfigError> {
    let mut roles = HashMap::new();

    // Admin: every action on every table, no restrictions.
    let mut admin = RolePermissions::new();
    for table in ALL_TABLES {
        admin = admin.allow(table, Action::all());
    }
    roles.insert("admin".to_string(), admin);

    // Executive: reads everything, maintains catalog and org tables.
    let executive = RolePermissions::new()
        .allow("brands", &[Read, Create, Modify])
        .allow("categories", &[Read, Create, Modify])
        .allow("customers", &[Read])
        .allow("orders", &[Read])
        .allow("order_items", &[Read])
        .allow("products", &[Read, Create, Modify])
        .allow("staffs", &[Read, Create, Modify])
        .allow("stocks", &[Read])
        .allow("stores", &[Read, Create, Modify]);
    roles.insert("executive".to_string(), executive);

    // Store manager: reads broadly, updates orders/staff/stock, but only
    // inside their own store and with limited customer visibility.
    let store_manager = RolePermissions::new()
        .allow("brands", &[Read])
        .allow("categories", &[Read])
        .allow("customers", &[Read])
        .allow("orders", &[Read, Modify])
        .allow("order_items", &[Read])
        .allow("products", &[Read])
        .allow("staffs", &[Read, Modify])
        .allow("stocks", &[Read, Modify])
        .allow("stores", &[Read])
        .limit_columns("customers", CUSTOMER_CONTACT_COLUMNS)
        .restrict_rows("orders", "store_id = {store_id}")?
        .restrict_rows("staffs", "store_id = {store_id}")?
        .restrict_rows("stocks", "store_id = {store_id}")?;
    roles.insert("store_manager".to_string(), store_manager);

    // Team lead: handles sales and customer data for their store.
    let team_lead = RolePermissions::new()
        .allow("brands", &[Read])
        .allow("categories", &[Read])
        .allow("customers", &[Read, Create, Modify])
        .allow("orders", &[Read, Create, Modify])
        .allow("order_items", &[Read, Create, Modify])
        .allow("products", &[Read])
        .allow("staffs", &[Read])
        .allow("stocks", &[Read])
        .limit_columns("customers", CUSTOMER_CONTACT_COLUMNS)
        .limit_columns("staffs", &["staff_id", "first_name", "last_name", "store_id"])
        .restrict_rows("orders", "store_id = {store_id}")?
        .restrict_rows("stocks", "store_id = {store_id}")?;
    roles.insert("team_lead".to_string(), team_lead);

    // Staff: records sales and orders for their own store.
    let staff = RolePermissions::new()
        .allow("brands", &[Read])
        .allow("categories", &[Read])
        .allow("customers", &[Read, Create])
        .allow("orders", &[Read, Create])
        .allow("order_items", &[Read, Create])
        .allow("products", &[Read])
        .allow("staffs", &[Read])
        .allow("stocks", &[Read])
        .limit_columns("customers", CUSTOMER_CONTACT_COLUMNS)
        .restrict_rows("orders", "store_id = {store_id}")?;
    roles.insert("staff".to_string(), staff);

    // Customer: reads public catalog data and only their own orders.
    let customer = RolePermissions::new()
        .allow("brands", &[Read])
        .allow("categories", &[Read])
        .allow("orders", &[Read])
        .allow("order_items", &[Read])
        .allow("products", &[Read])
        .allow("stores", &[Read])
        .restrict_rows("orders", "customer_id = {customer_id}")?
        .restrict_rows(
            "order_items",
            "order_id IN (SELECT order_id FROM orders WHERE customer_id = {customer_id})",
        )?;
    roles.insert("customer".to_string(), customer);

    Ok(PolicyStore::new(roles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::types::ColumnRule;

    #[test]
    fn test_default_policy_builds() {
        let store = default_policy().unwrap();
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn test_admin_has_everything() {
        let store = default_policy().unwrap();
        let admin = store.permissions_for("admin");
        for table in ALL_TABLES {
            for action in Action::all() {
                assert!(admin.permits(table, *action), "{table}/{action}");
            }
            assert_eq!(admin.column_rule(table), ColumnRule::Unrestricted);
            assert!(admin.row_restriction(table).is_none());
        }
    }

    #[test]
    fn test_customer_cannot_read_customers_table() {
        let store = default_policy().unwrap();
        let customer = store.permissions_for("customer");
        assert!(!customer.permits("customers", Read));
        assert!(customer.permits("orders", Read));
        assert!(!customer.permits("orders", Modify));
    }

    #[test]
    fn test_store_manager_restrictions() {
        let store = default_policy().unwrap();
        let manager = store.permissions_for("store_manager");
        assert!(manager.permits("stocks", Modify));
        assert!(!manager.permits("stocks", Action::Remove));
        assert!(!manager.permits("categories", Create));

        let restriction = manager.row_restriction("stocks").unwrap();
        assert_eq!(restriction.source(), "store_id = {store_id}");

        assert!(matches!(
            manager.column_rule("customers"),
            ColumnRule::Only(cols) if cols.contains(&"email".to_string())
        ));
    }
}
