use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Assistant configuration
        .route(
            "/assistant/settings",
            get(handlers::get_settings)
                .put(handlers::update_settings)
                .patch(handlers::patch_settings),
        )
        .route(
            "/assistant/settings/interval/increment",
            post(handlers::increment_interval),
        )
        .route(
            "/assistant/settings/interval/decrement",
            post(handlers::decrement_interval),
        )
        // Run control
        .route("/runs/start", post(handlers::start_run))
        .route("/runs/:run_id/pause", post(handlers::pause_run))
        .route("/runs/:run_id/resume", post(handlers::resume_run))
        .route("/runs/:run_id/finish/hold", post(handlers::hold_finish))
        .route("/runs/:run_id/finish/release", post(handlers::release_finish))
        .route("/runs/:run_id/cancel", post(handlers::cancel_run))
        // Run queries
        .route("/runs/:run_id/status", get(handlers::get_run_status))
        .route("/runs/:run_id/events", get(handlers::get_run_events))
        // History
        .route("/activities", get(handlers::list_activities))
        .route("/activities/:run_id", get(handlers::get_activity))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
