use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth::{err, internal, ApiError};
use crate::sessions::{self, session_cookie};
use crate::state::SharedState;
use crate::users;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

/// Log in a registered user. A fresh session is created, so any cursor from
/// a previous login is discarded.
pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = users::authenticate(&state.db, &req.username)
        .await
        .map_err(internal)?;

    let Some(user) = user else {
        warn!(username = %req.username, "failed login attempt");
        return Err(err(StatusCode::UNAUTHORIZED, "Incorrect username."));
    };

    let token = state.sessions.create(user.id).await;
    info!(username = %user.username, user_id = user.id, "successful login attempt");

    Ok((
        AppendHeaders([(header::SET_COOKIE, session_cookie(token))]),
        Json(json!({ "user_id": user.id })),
    ))
}

/// Clear the current session, including the stored cursor.
pub async fn logout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    if let Some(token) = sessions::token_from_headers(&headers) {
        state.sessions.remove(token).await;
    }
    Ok(Json(json!({ "logged_out": true })))
}
