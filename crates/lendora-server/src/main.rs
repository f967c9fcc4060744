//! Lendora HTTP Server
//!
//! Axum-based server exposing the demo loan-agent REST API: session
//! creation, streamed chat replies, resets, analytics and the
//! sanction-letter export payload.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lendora_core::provider::CompletionProvider;
use lendora_runtime::GatewayProvider;

use crate::handlers::{
    create_session, health_check, list_profiles, reset_session, sanction_letter, send_message,
    session_analytics,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize the generation gateway provider
    let provider = Arc::new(GatewayProvider::from_env().map_err(|e| {
        anyhow::anyhow!("gateway configuration error: {e}. Set LENDORA_GATEWAY_KEY in .env")
    })?);

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Generation gateway configured"),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Gateway not fully configured - chat requests will fail");
        }
    }

    // Build application state
    let state = AppState::new(provider);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/profiles", get(list_profiles))
        // Session API
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}/messages", post(send_message))
        .route("/api/sessions/{id}/reset", post(reset_session))
        .route("/api/sessions/{id}/analytics", get(session_analytics))
        .route("/api/sessions/{id}/sanction-letter", get(sanction_letter))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 lendora-server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                              - Health check");
    tracing::info!("  GET  /api/profiles                        - List demo profiles");
    tracing::info!("  POST /api/sessions                        - Start a session");
    tracing::info!("  POST /api/sessions/{{id}}/messages          - Send message (SSE reply)");
    tracing::info!("  POST /api/sessions/{{id}}/reset             - Reset session");
    tracing::info!("  GET  /api/sessions/{{id}}/analytics         - Session analytics");
    tracing::info!("  GET  /api/sessions/{{id}}/sanction-letter   - Decision export payload");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
