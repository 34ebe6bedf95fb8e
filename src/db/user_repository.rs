use crate::db::StoreError;
use crate::models::user::{NewUser, User};
use async_trait::async_trait;
use sqlx::mysql::MySqlPool;
use tracing::info;

/// Storage capability handed to the handlers. Trait-object form so tests can
/// swap in an in-memory fake.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user and return it with its assigned id. Fails with
    /// `Conflict` when the username or email is already taken and `Invalid`
    /// when a required field is empty.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Exact match against the username or email column, whichever hits.
    async fn find_by_username_or_email(&self, identifier: &str)
        -> Result<Option<User>, StoreError>;
}

fn check_required(new_user: &NewUser) -> Result<(), StoreError> {
    if new_user.fullname.is_empty()
        || new_user.username.is_empty()
        || new_user.email.is_empty()
        || new_user.password_hash.is_empty()
    {
        return Err(StoreError::Invalid);
    }
    Ok(())
}

pub struct MySqlUserStore {
    pool: MySqlPool,
}

impl MySqlUserStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserStore { pool }
    }
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        check_required(&new_user)?;

        let result = sqlx::query(
            "INSERT INTO users (fullname, username, email, password_hash) VALUES (?, ?, ?, ?)",
        )
        .bind(&new_user.fullname)
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
            _ => StoreError::Database(e),
        })?;

        let id = result.last_insert_id();
        info!(user_id = id, username = %new_user.username, "User created");

        Ok(User {
            id,
            fullname: new_user.fullname,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: chrono::Utc::now(),
        })
    }

    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, fullname, username, email, password_hash, created_at \
             FROM users WHERE username = ? OR email = ?",
        )
        .bind(identifier)
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// In-memory stand-in for handler and repository tests. Same contract as the
/// MySQL store, including the uniqueness conflict.
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryUserStore {
    users: std::sync::Mutex<Vec<User>>,
}

#[cfg(test)]
impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        check_required(&new_user)?;

        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.username == new_user.username || u.email == new_user.email)
        {
            return Err(StoreError::Conflict);
        }

        let user = User {
            id: users.len() as u64 + 1,
            fullname: new_user.fullname,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: chrono::Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.username == identifier || u.email == identifier)
            .cloned())
    }
}
