pub mod user_repository;

use sqlx::mysql::MySqlPool;
use std::env;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username or email already exists")]
    Conflict,
    #[error("missing required field")]
    Invalid,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Assemble the connection URL from the `DB_*` environment variables.
pub fn database_url_from_env() -> String {
    format!(
        "mysql://{}:{}@{}:{}/{}",
        env::var("DB_USER").unwrap_or_default(),
        env::var("DB_PASS").unwrap_or_default(),
        env::var("DB_HOST").unwrap_or_default(),
        env::var("DB_PORT").unwrap_or_default(),
        env::var("DB_NAME").unwrap_or_default(),
    )
}

/// Create the MySQL connection pool.
pub async fn connect(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPool::connect(database_url).await?;
    Ok(pool)
}

/// Bring the schema up at process start. Username and email uniqueness is
/// enforced here; racing duplicate sign-ups serialize on these indexes.
pub async fn migrate(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
            fullname VARCHAR(255) NOT NULL,
            username VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE KEY uq_users_username (username),
            UNIQUE KEY uq_users_email (email)
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema is up to date");
    Ok(())
}
