//! Configuration and policy loading tests

use rowguard::access::{OperationBuilder, OperationRequest};
use rowguard::config::load_config_from_str;
use rowguard::error::ConfigError;
use rowguard::policy::{Action, PolicyStore};
use rowguard::session::{AttributeBag, SessionContext};

const MINIMAL_CONFIG: &str = r#"
[logging]
level = "info"
"#;

const MANAGER_POLICY: &str = r#"
[policy.roles.store_manager.tables]
stocks = ["read", "modify"]
customers = ["read"]

[policy.roles.store_manager.columns]
customers = ["customer_id", "first_name", "last_name", "email", "phone"]

[policy.roles.store_manager.rows]
stocks = "store_id = {store_id}"
"#;

#[test]
fn minimal_config_loads() {
    let config = load_config_from_str(MINIMAL_CONFIG).unwrap();
    assert_eq!(config.logging.level, "info");
    assert!(config.policy.roles.is_empty());
}

#[test]
fn empty_roles_fall_back_to_default_policy() {
    let config = load_config_from_str(MINIMAL_CONFIG).unwrap();
    let store = PolicyStore::from_config(&config.policy).unwrap();
    // the six built-in retail roles
    assert_eq!(store.len(), 6);
    assert!(store.permissions_for("admin").permits("orders", Action::Remove));
}

#[test]
fn configured_policy_replaces_defaults() {
    let config = load_config_from_str(MANAGER_POLICY).unwrap();
    let store = PolicyStore::from_config(&config.policy).unwrap();
    assert_eq!(store.len(), 1);

    let manager = store.permissions_for("store_manager");
    assert!(manager.permits("stocks", Action::Modify));
    assert!(!manager.permits("stocks", Action::Remove));
    assert_eq!(
        manager.row_restriction("stocks").unwrap().source(),
        "store_id = {store_id}"
    );
}

#[test]
fn loaded_policy_resolves_operations() {
    let config = load_config_from_str(MANAGER_POLICY).unwrap();
    let store = PolicyStore::from_config(&config.policy).unwrap();
    let context = SessionContext::new(
        "store2_manager",
        "store_manager",
        AttributeBag {
            store_id: Some(2),
            ..Default::default()
        },
    );
    let builder = OperationBuilder::new(store.permissions_for(context.role()), &context);

    let op = builder
        .resolve(&OperationRequest::read("stocks").with_filter("quantity < 10"))
        .unwrap();
    assert_eq!(
        op.predicate.as_deref(),
        Some("(quantity < 10) AND (store_id = 2)")
    );
}

#[test]
fn sql_verb_action_names_load() {
    let config = load_config_from_str(
        r#"
[policy.roles.reporter.tables]
orders = ["SELECT"]
"#,
    )
    .unwrap();
    let store = PolicyStore::from_config(&config.policy).unwrap();
    assert!(store.permissions_for("reporter").permits("orders", Action::Read));
}

#[test]
fn unknown_action_fails_at_load() {
    let result = load_config_from_str(
        r#"
[policy.roles.reporter.tables]
orders = ["grant"]
"#,
    );
    assert!(matches!(
        result.unwrap_err(),
        ConfigError::UnknownAction { .. }
    ));
}

#[test]
fn template_with_unknown_attribute_fails_at_load() {
    let result = load_config_from_str(
        r#"
[policy.roles.reporter.tables]
orders = ["read"]

[policy.roles.reporter.rows]
orders = "tenant_id = {tenant_id}"
"#,
    );
    assert!(matches!(
        result.unwrap_err(),
        ConfigError::InvalidTemplate { .. }
    ));
}

#[test]
fn malformed_toml_is_a_load_error() {
    let result = load_config_from_str("[policy.roles");
    assert!(matches!(result.unwrap_err(), ConfigError::Load(_)));
}
