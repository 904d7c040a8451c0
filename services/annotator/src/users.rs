use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

/// User id 1 holds the administration and statistics privileges and cannot
/// be deleted.
pub const ADMIN_ID: i64 = 1;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Non-existing username: {0}.")]
    NotFound(String),

    #[error("The administrator account cannot be deleted.")]
    Forbidden,

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Clone, Debug, serde::Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.id == ADMIN_ID
    }
}

/// Lookup by username (the login operation).
pub async fn authenticate(pool: &SqlitePool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT id, username FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT id, username FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Insert a fresh opaque token and return it. The token is shown exactly
/// once; it is not recoverable later.
pub async fn create_user(pool: &SqlitePool) -> Result<String, sqlx::Error> {
    let username = Uuid::new_v4().simple().to_string();
    sqlx::query("INSERT INTO users (username) VALUES (?)")
        .bind(&username)
        .execute(pool)
        .await?;
    Ok(username)
}

pub async fn delete_user(pool: &SqlitePool, username: &str) -> Result<(), UserError> {
    let user = authenticate(pool, username)
        .await?
        .ok_or_else(|| UserError::NotFound(username.to_string()))?;
    if user.is_admin() {
        return Err(UserError::Forbidden);
    }
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user.id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as("SELECT id, username FROM users ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn count_users(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

/// First-run bootstrap: when the table is empty, insert the administrator
/// row (auto-increment makes it id 1) and hand back its token for one-time
/// display.
pub async fn ensure_admin(pool: &SqlitePool) -> Result<Option<String>, sqlx::Error> {
    if count_users(pool).await? > 0 {
        return Ok(None);
    }
    let username = create_user(pool).await?;
    Ok(Some(username))
}
