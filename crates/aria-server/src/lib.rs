//! ARIA server library logic.

pub mod api_calls;
pub mod api_dashboard;
pub mod api_sip;
pub mod config;
pub mod error;

use std::sync::Arc;

use aria_db::DbPool;
use aria_session::SessionRegistry;
use aria_tools::ToolContext;
use aria_voice::RoomService;
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// The greeting spoken at call start when no caller was pre-identified.
pub const WELCOME_MESSAGE: &str = "Bonjour, je suis ARIA, l'assistante virtuelle d'ARTEX \
     Assurances. Comment puis-je vous aider ?";

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Live call sessions keyed by room id.
    pub sessions: SessionRegistry,
    /// Collaborators handed to tool handlers.
    pub tools: ToolContext,
    /// LiveKit room operations for the SIP bridge.
    pub room_service: Arc<RoomService>,
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // SIP bridge webhook
        .route("/inbound-sip", post(api_sip::inbound_sip_handler))
        // Agent call lifecycle, driven by the voice worker
        .route("/api/agent/tools", get(api_calls::list_tools_handler))
        .route("/api/agent/calls", post(api_calls::start_call_handler))
        .route(
            "/api/agent/calls/{callId}/tool",
            post(api_calls::tool_call_handler),
        )
        .route(
            "/api/agent/calls/{callId}/end",
            post(api_calls::end_call_handler),
        )
        .route(
            "/api/agent/calls/{callId}/evaluation",
            post(api_calls::record_evaluation_handler),
        )
        // Dashboard read API
        .route("/api/dashboard/kpis", get(api_dashboard::kpis_handler))
        .route("/api/dashboard/calls", get(api_dashboard::list_calls_handler))
        .route(
            "/api/dashboard/calls/{journalId}",
            get(api_dashboard::call_detail_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
