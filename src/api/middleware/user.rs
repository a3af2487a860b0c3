use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;

/// Header carrying the caller's user identifier. Trusted as-is.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user_id: String,
}

/// Rejects requests without a non-blank `x-user-id` header and exposes the
/// identifier to handlers as a `CurrentUser` extension.
pub async fn require_user(
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing {} header", USER_ID_HEADER)))?
        .to_string();

    request.extensions_mut().insert(CurrentUser { user_id });

    Ok(next.run(request).await)
}
