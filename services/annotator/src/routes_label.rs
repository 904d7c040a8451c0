use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use labelset::{assignment, next_item, CursorOutcome, Label, LabelsetError};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::{err, internal, require_login, ApiError};
use crate::sessions::Session;
use crate::state::SharedState;
use crate::users::{self, User};

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAction {
    Toxic,
    Nontoxic,
    Unknown,
    Goback,
}

#[derive(Deserialize)]
pub struct ActionRequest {
    pub action: LabelAction,
}

/// Present the item the calling annotator should label next, resuming from
/// the session cursor.
pub async fn current_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let (token, session, user) = require_login(&state, &headers).await?;
    scan_and_store(&state, token, session.entry_id, false, user.id).await
}

/// Handle a label submission or a go-back, then present the next item.
pub async fn perform_action(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(req): Json<ActionRequest>,
) -> Result<Json<Value>, ApiError> {
    let (token, session, user) = require_login(&state, &headers).await?;

    let label = match req.action {
        LabelAction::Toxic => Label::Toxic,
        LabelAction::Nontoxic => Label::NonToxic,
        LabelAction::Unknown => Label::Unknown,
        LabelAction::Goback => {
            // Step back one offset; underflow clears the cursor so the scan
            // restarts at the top of the slice. The follow-up scan re-shows
            // the item at the stepped-to offset regardless of its label.
            // A session with no cursor yet has nothing to go back from.
            let revisit = session.entry_id.is_some();
            let entry_id = session.entry_id.and_then(|id| id.checked_sub(1));
            let stored = state
                .sessions
                .update(token, |s| {
                    s.entry_id = entry_id;
                    s.start_id = None;
                })
                .await;
            if !stored {
                return Err(err(StatusCode::UNAUTHORIZED, "Login required."));
            }
            return scan_and_store(&state, token, entry_id, revisit, user.id).await;
        }
    };

    submit_label(&state, &session, &user, label).await?;

    // The scan resumes from the unchanged offset; the freshly labeled item no
    // longer matches, so the cursor advances past it.
    scan_and_store(&state, token, session.entry_id, false, user.id).await
}

/// Write one label under the dataset store's exclusive access and audit-log
/// it. A session without a pending `start_id` (or one pointing past the
/// document) means session/data desync; reject instead of guessing an index.
async fn submit_label(
    state: &SharedState,
    session: &Session,
    user: &User,
    label: Label,
) -> Result<(), ApiError> {
    let start_id = session
        .start_id
        .ok_or_else(|| err(StatusCode::CONFLICT, "No pending item for this session."))?;

    let dataset = state.dataset.clone();
    let item = tokio::task::spawn_blocking(move || dataset.submit(start_id, label))
        .await
        .map_err(internal)?
        .map_err(|e| match e {
            LabelsetError::IndexOutOfRange { .. } => err(StatusCode::CONFLICT, e.to_string()),
            other => internal(other),
        })?;

    info!(
        user_id = user.id,
        label = label.as_str(),
        text = %item.text,
        "label recorded"
    );
    Ok(())
}

async fn scan_and_store(
    state: &SharedState,
    token: Uuid,
    resume: Option<usize>,
    revisit: bool,
    user_id: i64,
) -> Result<Json<Value>, ApiError> {
    let user_count = users::count_users(&state.db).await.map_err(internal)?;

    let dataset = state.dataset.clone();
    let items = tokio::task::spawn_blocking(move || dataset.load())
        .await
        .map_err(internal)?
        .map_err(internal)?;

    let range = assignment(user_id, user_count, items.len());

    match next_item(&items, range, resume, revisit) {
        CursorOutcome::Pending {
            entry_id,
            start_id,
            text,
        } => {
            let stored = state
                .sessions
                .update(token, |s| {
                    s.entry_id = Some(entry_id);
                    s.start_id = Some(start_id);
                })
                .await;
            if !stored {
                // logout raced the scan; never hand out a cursor that was
                // not stored
                return Err(err(StatusCode::UNAUTHORIZED, "Login required."));
            }
            debug!(entry_id, start_id, "cursor advanced");
            Ok(Json(json!({
                "done": false,
                "entry_id": entry_id,
                "start_id": start_id,
                "text": text,
            })))
        }
        CursorOutcome::Done => {
            // No submit target until the user goes back or the slice changes.
            // A vanished session has nothing to clear.
            state.sessions.update(token, |s| s.start_id = None).await;
            Ok(Json(json!({ "done": true })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::header::COOKIE;
    use labelset::DatasetStore;
    use sqlx::sqlite::SqlitePoolOptions;

    use crate::state::AppState;

    async fn state_with_dataset(store: DatasetStore, annotators: usize) -> SharedState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        users::ensure_admin(&pool).await.unwrap();
        for _ in 0..annotators {
            users::create_user(&pool).await.unwrap();
        }
        Arc::new(AppState::new(pool, store))
    }

    fn cookie_headers(token: Uuid) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, format!("session={token}").parse().unwrap());
        headers
    }

    // Submitting without a pending item is session/data desync: reject, never
    // guess an index.
    #[tokio::test]
    async fn label_without_a_pending_item_is_a_409() {
        // the dataset file is never opened on this path
        let state = state_with_dataset(DatasetStore::open("unused.json"), 0).await;
        let token = state.sessions.create(1).await;

        let (status, body) = perform_action(
            State(state.clone()),
            cookie_headers(token),
            Json(ActionRequest {
                action: LabelAction::Toxic,
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.0["error"], "No pending item for this session.");
    }

    #[tokio::test]
    async fn label_submission_advances_the_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::open(dir.path().join("dataset.json"));
        store.seed(4).unwrap();
        let state = state_with_dataset(store, 0).await;
        let token = state.sessions.create(1).await;

        let Json(first) = current_item(State(state.clone()), cookie_headers(token))
            .await
            .unwrap();
        assert_eq!(first["done"], false);
        assert_eq!(first["start_id"], 0);
        assert_eq!(first["text"], "test 0");

        let Json(next) = perform_action(
            State(state.clone()),
            cookie_headers(token),
            Json(ActionRequest {
                action: LabelAction::Nontoxic,
            }),
        )
        .await
        .unwrap();
        assert_eq!(next["start_id"], 1);

        let session = state.sessions.get(token).await.unwrap();
        assert_eq!(session.start_id, Some(1));
        assert_eq!(state.dataset.load().unwrap()[0].label, Label::NonToxic);
    }

    #[tokio::test]
    async fn go_back_re_presents_the_previous_item() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::open(dir.path().join("dataset.json"));
        store.seed(4).unwrap();
        let state = state_with_dataset(store, 0).await;
        let token = state.sessions.create(1).await;

        current_item(State(state.clone()), cookie_headers(token))
            .await
            .unwrap();
        perform_action(
            State(state.clone()),
            cookie_headers(token),
            Json(ActionRequest {
                action: LabelAction::Toxic,
            }),
        )
        .await
        .unwrap();

        // cursor sits at offset 1; go back re-shows the labeled offset 0
        let Json(back) = perform_action(
            State(state.clone()),
            cookie_headers(token),
            Json(ActionRequest {
                action: LabelAction::Goback,
            }),
        )
        .await
        .unwrap();
        assert_eq!(back["done"], false);
        assert_eq!(back["start_id"], 0);
        assert_eq!(back["text"], "test 0");
    }

    // Logout racing a scan must not hand out a cursor that was never stored.
    #[tokio::test]
    async fn scan_for_a_vanished_session_is_a_401() {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::open(dir.path().join("dataset.json"));
        store.seed(4).unwrap();
        let state = state_with_dataset(store, 0).await;

        let token = state.sessions.create(1).await;
        state.sessions.remove(token).await;

        let (status, _) = scan_and_store(&state, token, None, false, 1)
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
