use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::db::AppState;
use crate::error::AppError;
use crate::util::{extract_bearer_token, secrets_match};

/// Require `Authorization: Bearer {ADMIN_API_KEY}`.
///
/// With no key configured every admin request is rejected.
pub async fn admin_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.admin_api_key.as_deref() else {
        tracing::debug!("Admin request rejected: ADMIN_API_KEY not configured");
        return Err(AppError::Unauthorized);
    };

    let token = extract_bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    if !secrets_match(expected, token) {
        tracing::warn!("Admin request rejected: invalid API key");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
