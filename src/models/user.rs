use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Persisted user record. `password_hash` is an argon2 PHC string; the
/// plaintext never reaches this type.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insertion payload for a not-yet-persisted user; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Identity payload signed into every token. Deserialization is the
/// validation: a token whose payload doesn't match this shape is rejected
/// before any handler sees it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub id: u64,
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub exp: i64, // Unix seconds
}

impl Claims {
    /// Rebuild a user identity from token claims, e.g. when reissuing a
    /// pair from a refresh token. The hash is not part of the claims.
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            fullname: self.fullname.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
pub fn test_user() -> User {
    User {
        id: 1,
        fullname: "Ann Lee".to_string(),
        username: "ann".to_string(),
        email: "ann@x.com".to_string(),
        password_hash: "hashed".to_string(),
        created_at: Utc::now(),
    }
}
