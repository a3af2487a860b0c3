use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;

use crate::{
    api::{middleware::user::CurrentUser, state::AppState},
    domain::{CreateReactionRequest, Reaction},
    error::Result,
    service::ReactionOutcome,
};

pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Reaction>>> {
    let reactions = state.service_context.announcement_service.reactions(&id).await?;
    Ok(Json(reactions))
}

pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
    Json(request): Json<CreateReactionRequest>,
) -> Result<Response> {
    let idempotency_key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let outcome = state
        .service_context
        .announcement_service
        .react(&id, &user.user_id, request.reaction_type, idempotency_key)
        .await?;

    let response = match outcome {
        ReactionOutcome::Recorded(reaction) => (StatusCode::CREATED, Json(reaction)).into_response(),
        ReactionOutcome::Duplicate => {
            (StatusCode::OK, Json(json!({ "status": "duplicate" }))).into_response()
        }
    };

    Ok(response)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<CurrentUser>,
) -> Result<StatusCode> {
    state
        .service_context
        .announcement_service
        .remove_reaction(&id, &user.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
