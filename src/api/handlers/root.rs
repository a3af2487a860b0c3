use axum::{extract::State, http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

use crate::api::state::AppState;

pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    let store = &state.settings.store;

    Json(json!({
        "name": "Noticeboard API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Community announcements with comments and reactions",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "announcements": "/announcements"
        },
        "limits": {
            "defaultCommentLimit": store.default_comment_limit,
            "maxCommentLimit": store.effective_max_comment_limit(),
            "idempotencyWindowSecs": store.idempotency_window().num_seconds()
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
