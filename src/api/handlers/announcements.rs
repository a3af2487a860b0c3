use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sha2::{Digest, Sha256};

use crate::{
    api::state::AppState,
    domain::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementStatusRequest},
    error::{AppError, Result},
};

/// Lists announcements newest first. The body is tagged with a content hash so
/// polling clients can send `If-None-Match` and get a 304 back.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    let announcements = state.service_context.announcement_service.list().await?;

    let body = serde_json::to_vec(&announcements)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let etag = compute_etag(&body);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH) {
        if let Ok(candidates) = if_none_match.to_str() {
            if etag_matches(candidates, &etag) {
                tracing::debug!(etag = %etag, "Announcement list unchanged");
                return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
            }
        }
    }

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::ETAG, etag),
        ],
        body,
    )
        .into_response())
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Announcement>> {
    let announcement = state.service_context.announcement_service.get(&id).await?;
    Ok(Json(announcement))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>)> {
    let announcement = state.service_context.announcement_service.create(request).await?;

    Ok((StatusCode::CREATED, Json(announcement)))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAnnouncementStatusRequest>,
) -> Result<Json<Announcement>> {
    let announcement = state
        .service_context
        .announcement_service
        .update_status(&id, request)
        .await?;

    Ok(Json(announcement))
}

/// Weak tag. The hash covers the uncompressed JSON.
fn compute_etag(body: &[u8]) -> String {
    let digest = Sha256::digest(body);
    format!("W/\"{}\"", hex::encode(&digest[..16]))
}

/// Weak comparison, as `If-None-Match` requires.
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    let etag = opaque_tag(etag);
    if_none_match
        .split(',')
        .map(|candidate| opaque_tag(candidate.trim()))
        .any(|candidate| candidate == "*" || candidate == etag)
}

fn opaque_tag(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}
