pub mod health;
pub mod tts;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::interview::handlers as interview;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::stats::handlers as stats;

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Auth API
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/auth/me", get(auth::handle_me))
        // Resume API
        .route("/api/v1/resumes", get(resume::handle_list_resumes))
        .route(
            "/api/v1/resumes/parse",
            post(resume::handle_parse_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Interview API
        .route("/api/v1/interviews/generate", post(interview::handle_generate))
        .route("/api/v1/interviews/evaluate", post(interview::handle_evaluate))
        .route(
            "/api/v1/interviews/:session_id",
            get(interview::handle_get_session),
        )
        .route(
            "/api/v1/interviews/:session_id/complete",
            post(interview::handle_complete),
        )
        .route(
            "/api/v1/interviews/:session_id/abandon",
            post(interview::handle_abandon),
        )
        .route(
            "/api/v1/interviews/:session_id/results",
            get(interview::handle_results),
        )
        // Dashboard
        .route("/api/v1/dashboard", get(stats::handle_dashboard))
        .route("/api/v1/tts", post(tts::handle_tts))
        .with_state(state)
}
