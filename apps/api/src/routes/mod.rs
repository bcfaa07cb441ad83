pub mod health;
pub mod uploads;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, put},
    Router,
};

use crate::candidates::handlers;
use crate::state::AppState;

/// Headroom above the résumé ceiling for the text fields and multipart framing.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_resume_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/candidates",
            get(handlers::handle_list).post(handlers::handle_submit),
        )
        .route(
            "/api/candidates/:id/status",
            put(handlers::handle_update_status),
        )
        .route("/api/candidates/:id", delete(handlers::handle_delete))
        .route("/uploads/:name", get(uploads::handle_get_resume))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
