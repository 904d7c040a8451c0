use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::{err, internal, require_admin, ApiError};
use crate::state::SharedState;
use crate::users::{self, UserError};

/// id -> username map of every configured user.
pub async fn get_users(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<BTreeMap<i64, String>>, ApiError> {
    require_admin(&state, &headers).await?;

    let users = users::list_users(&state.db).await.map_err(internal)?;
    Ok(Json(users.into_iter().map(|u| (u.id, u.username)).collect()))
}

/// Create an annotator account. The response is the only place the generated
/// token ever appears.
pub async fn add_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (_, _, admin) = require_admin(&state, &headers).await?;

    let username = users::create_user(&state.db).await.map_err(internal)?;
    info!(created_by = admin.id, %username, "user added");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "username": username,
            "note": "Copy it now - it is not shown again.",
        })),
    ))
}

pub async fn remove_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let (_, _, admin) = require_admin(&state, &headers).await?;

    match users::delete_user(&state.db, &username).await {
        Ok(()) => {
            info!(deleted_by = admin.id, %username, "user deleted");
            Ok(Json(json!({ "deleted": username })))
        }
        Err(e @ UserError::NotFound(_)) => Err(err(StatusCode::NOT_FOUND, e.to_string())),
        Err(e @ UserError::Forbidden) => Err(err(StatusCode::FORBIDDEN, e.to_string())),
        Err(UserError::Db(e)) => Err(internal(e)),
    }
}
