use std::sync::Arc;

use labelset::DatasetStore;
use sqlx::SqlitePool;

use crate::sessions::SessionStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub db: SqlitePool,
    pub dataset: Arc<DatasetStore>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(db: SqlitePool, dataset: DatasetStore) -> Self {
        Self {
            db,
            dataset: Arc::new(dataset),
            sessions: SessionStore::new(),
        }
    }
}
