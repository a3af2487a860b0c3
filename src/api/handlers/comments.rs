use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    api::state::AppState,
    domain::{Comment, CreateCommentRequest},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ListCommentsQuery {
    /// Id of the last comment the caller already has.
    pub cursor: Option<String>,
    pub limit: Option<usize>,
}

pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ListCommentsQuery>,
) -> Result<Json<Vec<Comment>>> {
    let comments = state
        .service_context
        .announcement_service
        .comments(&id, params.cursor.as_deref(), params.limit)
        .await?;

    Ok(Json(comments))
}

pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>)> {
    let comment = state
        .service_context
        .announcement_service
        .add_comment(&id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
