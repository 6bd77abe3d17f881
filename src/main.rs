//! rowguard CLI
//!
//! Authenticates an identity against the configured credential store and
//! reports its effective permissions: granted actions, accessible columns,
//! and the rendered row restriction per table. Statements are executed
//! through the dry-run boundary, so this binary never needs a data store.

use clap::Parser;
use std::sync::Arc;

use rowguard::{
    audit::TracingAudit,
    auth::create_auth_provider,
    config::{LogFormat, load_config},
    engine::SecureSession,
    exec::DryRunExecutor,
    policy::{ColumnRule, PolicyStore},
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Role-based access control engine for structured data operations
#[derive(Parser, Debug)]
#[command(name = "rowguard")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "ROWGUARD_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ROWGUARD_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Identity to authenticate as
    #[arg(short, long)]
    identity: String,

    /// Credential for the identity
    #[arg(short = 'p', long, env = "ROWGUARD_CREDENTIAL")]
    credential: String,

    /// Report only this table (defaults to every table the role can touch)
    #[arg(short, long)]
    table: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration first so logging can honor its format choice
    let config = load_config(args.config.as_deref())
        .inspect_err(|e| eprintln!("Failed to load configuration: {e}"))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    match config.logging.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting rowguard");

    let policy = Arc::new(
        PolicyStore::from_config(&config.policy)
            .inspect_err(|e| error!(error = %e, "Failed to build policy store"))?,
    );

    let auth = create_auth_provider(&config.auth)
        .inspect_err(|e| error!(error = %e, "Failed to create auth provider"))?;

    let session = SecureSession::open(
        policy.clone(),
        auth.as_ref(),
        &args.identity,
        &args.credential,
        Arc::new(TracingAudit),
        Arc::new(DryRunExecutor),
    )
    .await
    .inspect_err(|e| error!(error = %e, "Authentication failed"))?;

    let context = session.context();
    println!(
        "{} acts as '{}' with context {}",
        context.identity(),
        context.role(),
        context.attributes()
    );

    let permissions = policy.permissions_for(context.role());
    let tables: Vec<String> = match &args.table {
        Some(table) => vec![table.clone()],
        None => permissions.tables().map(str::to_string).collect(),
    };

    if tables.is_empty() {
        println!("role '{}' has no granted tables", context.role());
        return Ok(());
    }

    for table in &tables {
        let actions: Vec<&str> = permissions
            .actions_for(table)
            .map(|action| action.as_str())
            .collect();
        if actions.is_empty() {
            println!("{table}: no access");
            continue;
        }

        let columns = match permissions.column_rule(table) {
            ColumnRule::Unrestricted => "all columns".to_string(),
            ColumnRule::Only(columns) => columns.join(", "),
        };

        let restriction = match permissions.row_restriction(table) {
            Some(template) => match template.render(context.attributes()) {
                Ok(rendered) => format!("rows where {rendered}"),
                Err(e) => format!("unresolvable restriction ({e})"),
            },
            None => "all rows".to_string(),
        };

        println!("{table}: [{}] {columns}; {restriction}", actions.join(", "));
    }

    Ok(())
}
