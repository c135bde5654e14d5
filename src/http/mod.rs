//! HTTP API for controlling runs
//!
//! This module provides a REST API standing in for the app's screens:
//! - GET/PUT /assistant/settings - Voice assistant configuration
//! - POST /runs/start - Start a new run (countdown first)
//! - POST /runs/:id/{pause,resume,cancel} - Run controls
//! - POST /runs/:id/finish/{hold,release} - Hold-to-finish gesture
//! - GET /runs/:id/status, /runs/:id/events - Live run data
//! - GET /activities - Finished runs, most recent first
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
