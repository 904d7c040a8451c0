mod auth;
mod config;
mod routes_auth;
mod routes_label;
mod routes_stats;
mod routes_users;
mod sessions;
mod state;
mod users;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{delete, get, post};
use axum::Router;
use labelset::DatasetStore;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;

    let pool = SqlitePool::connect(&cfg.database_url)
        .await
        .context("Failed to connect to the user database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    if let Some(username) = users::ensure_admin(&pool).await? {
        warn!(%username, "administrator account created - copy the token now, it is not shown again");
    }

    let dataset = DatasetStore::open(&cfg.dataset_path);
    if dataset.seed(cfg.seed_items)? {
        info!(path = %cfg.dataset_path, items = cfg.seed_items, "example dataset created");
    }

    let app_state = Arc::new(AppState::new(pool, dataset));

    let app = Router::new()
        .route("/login", post(routes_auth::login))
        .route("/logout", post(routes_auth::logout))
        .route(
            "/label",
            get(routes_label::current_item).post(routes_label::perform_action),
        )
        .route("/stats", get(routes_stats::get_stats))
        .route(
            "/users",
            get(routes_users::get_users).post(routes_users::add_user),
        )
        .route("/users/:username", delete(routes_users::remove_user))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = &cfg.bind_addr;
    info!("annotator listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
