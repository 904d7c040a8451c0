use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::sessions::{self, Session};
use crate::state::AppState;
use crate::users::{self, User};

pub type ApiError = (StatusCode, Json<Value>);

pub fn err(status: StatusCode, msg: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": msg.into() })))
}

pub fn internal(e: impl std::fmt::Display) -> ApiError {
    err(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// Resolve the calling session, or 401 when the cookie is absent, stale, or
/// points at a user that no longer exists.
pub async fn require_login(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(Uuid, Session, User), ApiError> {
    let unauthorized = || err(StatusCode::UNAUTHORIZED, "Login required.");

    let token = sessions::token_from_headers(headers).ok_or_else(unauthorized)?;
    let session = state.sessions.get(token).await.ok_or_else(unauthorized)?;
    let user = users::find(&state.db, session.user_id)
        .await
        .map_err(internal)?
        .ok_or_else(unauthorized)?;

    Ok((token, session, user))
}

/// Administration and statistics are reserved for user id 1.
pub async fn require_admin(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(Uuid, Session, User), ApiError> {
    let (token, session, user) = require_login(state, headers).await?;
    if !user.is_admin() {
        return Err(err(StatusCode::FORBIDDEN, "Unauthorized to manage users."));
    }
    Ok((token, session, user))
}
