use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use labelgate_core::{AppError, UserId};

use crate::error::ApiResult;
use crate::state::AppState;

/// Header carrying the user id resolved by the host's authentication layer.
pub const PRINCIPAL_HEADER: &str = "x-user-id";

pub async fn require_principal(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let raw_user_id = request
        .headers()
        .get(PRINCIPAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;
    let user_id = UserId::parse(raw_user_id)
        .map_err(|_| AppError::Unauthorized("malformed principal header".to_owned()))?;

    let identity = state
        .directory
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("unknown principal '{user_id}'")))?
        .identity();

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
