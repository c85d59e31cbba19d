//! StockTransit - Multi-Branch Stock Transfer Workflow
//!
//! Main entry point. Architecture:
//!
//! ```text
//! ┌──────────┐    ┌────────────────┐    ┌──────────────┐
//! │ Gateway  │───▶│ TransferLedger │───▶│ LedgerStore  │
//! │ (axum)   │    │ StaffDirectory │    │ (pg/memory)  │
//! │          │    │ BranchRegistry │    │              │
//! └──────────┘    └────────────────┘    └──────────────┘
//! ```
//!
//! Every workflow mutation goes through the service layer; the storage
//! backend commits product, slip and audit writes atomically.

use std::sync::Arc;

use stocktransit::audit::LocationAuditTrail;
use stocktransit::branch::BranchRegistry;
use stocktransit::config::{AppConfig, BootstrapConfig};
use stocktransit::gateway::auth::AuthService;
use stocktransit::gateway::state::AppState;
use stocktransit::ledger::TransferLedger;
use stocktransit::staff::StaffDirectory;
use stocktransit::store::{DirectoryStore, LedgerStore, MemoryStore, PgStore, RegistryStore};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

/// Seed the first branch and admin so someone can log in on a fresh
/// deployment. Skipped as soon as any staff profile exists.
async fn bootstrap_if_empty(
    cfg: &BootstrapConfig,
    registry: &BranchRegistry,
    directory: &StaffDirectory,
) {
    match directory.list_staff(None).await {
        Ok(staff) if staff.is_empty() => {}
        Ok(_) => return,
        Err(e) => {
            tracing::warn!("bootstrap check failed: {e}");
            return;
        }
    }

    let branch = match registry
        .create_branch(&cfg.branch_name, &cfg.branch_address)
        .await
    {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("bootstrap branch creation failed: {e}");
            return;
        }
    };
    match directory
        .create_profile(
            &cfg.admin_identity,
            &cfg.admin_name,
            stocktransit::StaffRole::Admin,
            branch.id,
            &cfg.admin_pin,
        )
        .await
    {
        Ok(admin) => {
            println!("🌱 Bootstrap: branch {} ({})", branch.name, branch.id);
            println!("🌱 Bootstrap: admin  {} ({})", admin.name, admin.id);
            println!("   Log in with this staff id and the configured PIN, then rotate the PIN.");
        }
        Err(e) => tracing::warn!("bootstrap admin creation failed: {e}"),
    }
}

#[tokio::main]
async fn main() {
    let env = get_env();
    let app_config = AppConfig::load(&env);
    let _log_guard = stocktransit::logging::init_logging(&app_config);

    println!(
        "=== StockTransit {} ({}) ===",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );
    tracing::info!("Starting StockTransit in {} mode", env);

    // ==========================================================================
    // Storage backend
    // ==========================================================================
    let (registry_store, directory_store, ledger_store, backend): (
        Arc<dyn RegistryStore>,
        Arc<dyn DirectoryStore>,
        Arc<dyn LedgerStore>,
        &'static str,
    ) = if let Some(ref url) = app_config.postgres_url {
        println!("\n[Storage] Connecting to PostgreSQL...");
        match PgStore::connect(url).await {
            Ok(store) => match store.init_schema().await {
                Ok(_) => {
                    println!("✅ PostgreSQL connected and schema initialized");
                    let store = Arc::new(store);
                    (store.clone(), store.clone(), store, "postgres")
                }
                Err(e) => {
                    eprintln!("❌ FATAL: Failed to initialize PostgreSQL schema: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("❌ FATAL: Failed to connect to PostgreSQL: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("\n[Storage] No postgres_url configured, using in-memory store (volatile!)");
        let store = Arc::new(MemoryStore::new());
        (store.clone(), store.clone(), store, "memory")
    };

    // ==========================================================================
    // Domain services
    // ==========================================================================
    let registry = Arc::new(BranchRegistry::new(registry_store.clone()));
    let directory = Arc::new(StaffDirectory::new(directory_store, registry_store));
    let ledger = Arc::new(TransferLedger::new(
        ledger_store.clone(),
        directory.clone(),
        registry.clone(),
    ));
    let audit_trail = Arc::new(LocationAuditTrail::new(ledger_store));
    let auth = Arc::new(AuthService::new(
        directory.clone(),
        app_config.jwt_secret.clone(),
        app_config.token_ttl_secs,
    ));

    if let Some(ref bootstrap) = app_config.bootstrap {
        bootstrap_if_empty(bootstrap, &registry, &directory).await;
    }

    let state = Arc::new(AppState::new(
        registry,
        directory,
        ledger,
        audit_trail,
        auth,
        backend,
    ));

    // ==========================================================================
    // HTTP gateway
    // ==========================================================================
    let port = get_port_override().unwrap_or(app_config.gateway.port);
    stocktransit::gateway::run_server(&app_config.gateway.host, port, state).await;
}
