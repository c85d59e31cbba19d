//! HTTP API Gateway
//!
//! Axum-based REST front for the transfer workflow: public login and
//! health endpoints, JWT-protected branch/staff/product/transfer/audit
//! routes, and Swagger UI at `/docs`.

pub mod auth;
pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

/// Run the HTTP gateway until the process is stopped.
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) {
    // ==========================================================================
    // Auth Routes (public)
    // ==========================================================================
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // ==========================================================================
    // Workflow Routes - Protected by JWT
    // ==========================================================================
    let protected_routes = Router::new()
        // Branch registry
        .route("/branches", post(handlers::branch::create_branch))
        .route("/branches", get(handlers::branch::list_branches))
        .route("/branches/{branch_id}", get(handlers::branch::get_branch))
        .route(
            "/branches/{branch_id}",
            axum::routing::patch(handlers::branch::update_branch),
        )
        .route(
            "/branches/{branch_id}/deactivate",
            post(handlers::branch::deactivate_branch),
        )
        // Staff directory
        .route("/staff", post(handlers::staff::create_staff))
        .route("/staff", get(handlers::staff::list_staff))
        .route("/staff/me", get(handlers::staff::get_own_profile))
        .route(
            "/staff/me/pin",
            axum::routing::put(handlers::staff::update_own_pin),
        )
        .route("/staff/{staff_id}", get(handlers::staff::get_staff))
        .route(
            "/staff/{staff_id}/deactivate",
            post(handlers::staff::deactivate_staff),
        )
        // Product catalog and stock
        .route("/products", post(handlers::product::register_product))
        .route("/products", get(handlers::product::list_products))
        .route("/products/{product_id}", get(handlers::product::get_product))
        .route(
            "/products/{product_id}/adjust",
            post(handlers::product::adjust_stock),
        )
        .route(
            "/products/{product_id}/history",
            get(handlers::product::product_history),
        )
        // Transfer workflow
        .route("/transfers", post(handlers::transfer::initiate_transfer))
        .route("/transfers", get(handlers::transfer::list_transfers))
        .route(
            "/transfers/resolve/{token}",
            get(handlers::transfer::resolve_transfer_token),
        )
        .route("/transfers/{slip_id}", get(handlers::transfer::get_transfer))
        .route(
            "/transfers/{slip_id}/receive",
            post(handlers::transfer::receive_transfer),
        )
        .route(
            "/transfers/{slip_id}/cancel",
            post(handlers::transfer::cancel_transfer),
        )
        // Audit trail
        .route("/audit", get(handlers::audit::query_audit))
        // Apply auth middleware
        .layer(from_fn_with_state(state.clone(), auth::jwt_auth_middleware));

    // Build complete router
    let app = Router::new()
        // Health check
        .route("/api/v1/health", get(handlers::health::health_check))
        // API Routes
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1", protected_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
        // OpenAPI / Swagger UI (stateless, added after with_state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()));

    // Bind address
    let addr = format!("{}:{}", host, port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to bind to {}: {}", addr, e);
            eprintln!(
                "   Hint: Port {} may already be in use. Check with: lsof -i :{}",
                port, port
            );
            std::process::exit(1);
        }
    };

    println!("🚀 Gateway listening on http://{}", addr);
    println!("📖 API Docs: http://{}/docs", addr);
    println!("🔓 Public:    /api/v1/health, /api/v1/auth/login");
    println!("🔒 Protected: /api/v1/* (bearer JWT required)");

    // Start server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ FATAL: Server error: {}", e);
        std::process::exit(1);
    }
}
