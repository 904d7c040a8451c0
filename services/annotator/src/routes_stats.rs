use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use labelset::{summarize, user_progress};
use serde_json::{json, Value};

use crate::auth::{internal, require_admin, ApiError};
use crate::state::SharedState;
use crate::users;

fn pct(value: Option<f64>) -> Value {
    match value {
        Some(v) => json!(format!("{v:.3} %")),
        None => json!("no data"),
    }
}

/// Aggregate label statistics plus per-user completion, admin only.
pub async fn get_stats(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_admin(&state, &headers).await?;

    let users = users::list_users(&state.db).await.map_err(internal)?;
    let user_count = users.len() as i64;

    let dataset = state.dataset.clone();
    let items = tokio::task::spawn_blocking(move || dataset.load())
        .await
        .map_err(internal)?
        .map_err(internal)?;

    let summary = summarize(&items);

    let per_user: Vec<Value> = users
        .iter()
        .map(|u| {
            let p = user_progress(&items, u.id, user_count);
            json!({
                "user_id": u.id,
                "range": { "lo": p.range.start, "hi": p.range.end },
                "labeled": p.labeled,
                "completion": pct(p.percent()),
            })
        })
        .collect();

    Ok(Json(json!({
        "total": summary.total,
        "labeled": summary.labeled,
        "usable": summary.usable(),
        "completion": pct(summary.completion_pct()),
        "toxic": pct(summary.toxic_pct()),
        "non_toxic": pct(summary.non_toxic_pct()),
        "unknown": pct(summary.unknown_pct()),
        "users": per_user,
    })))
}
