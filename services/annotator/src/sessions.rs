use std::collections::HashMap;
use std::sync::Arc;

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

/// Per-login state: who is logged in and where their cursor sits within
/// their assignment. `entry_id` is the offset inside the user's slice,
/// `start_id` the absolute dataset index of the item last presented (the
/// submit target).
#[derive(Clone, Copy, Debug)]
pub struct Session {
    pub user_id: i64,
    pub entry_id: Option<usize>,
    pub start_id: Option<usize>,
}

impl Session {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            entry_id: None,
            start_id: None,
        }
    }
}

/// Server-side session records keyed by the opaque token in the cookie.
/// Sessions are per-connection and transient; a restart logs everyone out.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, user_id: i64) -> Uuid {
        let token = Uuid::new_v4();
        self.inner.write().await.insert(token, Session::new(user_id));
        token
    }

    pub async fn get(&self, token: Uuid) -> Option<Session> {
        self.inner.read().await.get(&token).copied()
    }

    /// Apply `f` to the session behind `token`. Returns false when the token
    /// no longer resolves (a logout raced the caller), so callers can refuse
    /// to hand out a cursor that was never stored.
    pub async fn update<F: FnOnce(&mut Session)>(&self, token: Uuid, f: F) -> bool {
        match self.inner.write().await.get_mut(&token) {
            Some(s) => {
                f(s);
                true
            }
            None => false,
        }
    }

    /// Clear-on-logout: the token stops resolving immediately.
    pub async fn remove(&self, token: Uuid) {
        self.inner.write().await.remove(&token);
    }
}

/// Pull the session token out of the Cookie header, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE)
            .then(|| Uuid::parse_str(value).ok())
            .flatten()
    })
}

pub fn session_cookie(token: Uuid) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/")
}
