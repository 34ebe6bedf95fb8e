use crate::models::user::{Claims, User};
use chrono::Utc;
use jsonwebtoken::errors::{Error, ErrorKind};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::env;

pub const ACCESS_TOKEN_TTL_SECS: i64 = 5 * 60;
pub const REFRESH_TOKEN_TTL_SECS: i64 = 60 * 60;

/// The two signing secrets. Access and refresh tokens are signed with
/// independent key material; neither is ever derived from the other, so
/// leaking one does not compromise the other.
#[derive(Clone)]
pub struct TokenKeys {
    pub access_secret: String,
    pub refresh_secret: String,
}

impl TokenKeys {
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        TokenKeys {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
        }
    }

    pub fn from_env() -> Self {
        TokenKeys::new(
            env::var("AT_SECRET").unwrap_or_default(),
            env::var("RT_SECRET").unwrap_or_default(),
        )
    }

    pub fn configured(&self) -> bool {
        !self.access_secret.is_empty() && !self.refresh_secret.is_empty()
    }
}

fn sign(user: &User, secret: &str, ttl_secs: i64) -> Result<String, Error> {
    if secret.is_empty() {
        return Err(ErrorKind::InvalidKeyFormat.into());
    }

    let claims = Claims {
        id: user.id,
        fullname: user.fullname.clone(),
        username: user.username.clone(),
        email: user.email.clone(),
        exp: Utc::now().timestamp() + ttl_secs,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn issue_access_token(user: &User, keys: &TokenKeys) -> Result<String, Error> {
    sign(user, &keys.access_secret, ACCESS_TOKEN_TTL_SECS)
}

pub fn issue_refresh_token(user: &User, keys: &TokenKeys) -> Result<String, Error> {
    sign(user, &keys.refresh_secret, REFRESH_TOKEN_TTL_SECS)
}

/// Issue the access/refresh pair returned by every successful auth flow.
pub fn issue_token_pair(user: &User, keys: &TokenKeys) -> Result<(String, String), Error> {
    let access_token = issue_access_token(user, keys)?;
    let refresh_token = issue_refresh_token(user, keys)?;
    Ok((access_token, refresh_token))
}

/// Validate signature and expiry, then hand back the structured claims.
/// Zero leeway: a token is invalid the second it expires.
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, Error> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::test_user;

    fn keys() -> TokenKeys {
        TokenKeys::new("access-test-secret", "refresh-test-secret")
    }

    // Encode a token whose expiry is `exp`, bypassing the issue-time TTL, to
    // stand in for a token checked some minutes after issuance.
    fn token_with_exp(secret: &str, exp: i64) -> String {
        let user = test_user();
        let claims = Claims {
            id: user.id,
            fullname: user.fullname,
            username: user.username,
            email: user.email,
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_access_ttl_shorter_than_refresh_ttl() {
        assert!(ACCESS_TOKEN_TTL_SECS < REFRESH_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_round_trip_preserves_claims() {
        let user = test_user();
        let keys = keys();

        let token = issue_access_token(&user, &keys).unwrap();
        let claims = decode_claims(&token, &keys.access_secret).unwrap();

        assert_eq!(claims.id, user.id);
        assert_eq!(claims.fullname, user.fullname);
        assert_eq!(claims.username, user.username);
        assert_eq!(claims.email, user.email);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_pair_tokens_are_distinct_strings() {
        let user = test_user();
        let keys = keys();

        let (access, refresh) = issue_token_pair(&user, &keys).unwrap();
        assert!(!access.is_empty());
        assert!(!refresh.is_empty());
        assert_ne!(access, refresh);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let user = test_user();
        let keys = keys();

        let token = issue_access_token(&user, &keys).unwrap();
        assert!(decode_claims(&token, "some-other-secret").is_err());
    }

    #[test]
    fn test_access_token_fails_refresh_verification() {
        let user = test_user();
        let keys = keys();

        let access = issue_access_token(&user, &keys).unwrap();
        let refresh = issue_refresh_token(&user, &keys).unwrap();

        assert!(decode_claims(&access, &keys.refresh_secret).is_err());
        assert!(decode_claims(&refresh, &keys.access_secret).is_err());
    }

    #[test]
    fn test_access_token_alive_four_minutes_after_issuance() {
        // issued 4 minutes ago: one minute of its 5-minute life left
        let now = Utc::now().timestamp();
        let token = token_with_exp("s", now + ACCESS_TOKEN_TTL_SECS - 4 * 60);

        assert!(decode_claims(&token, "s").is_ok());
    }

    #[test]
    fn test_access_token_dead_six_minutes_after_issuance() {
        let now = Utc::now().timestamp();
        let token = token_with_exp("s", now + ACCESS_TOKEN_TTL_SECS - 6 * 60);

        assert!(decode_claims(&token, "s").is_err());
    }

    #[test]
    fn test_refresh_token_alive_at_fifty_nine_minutes() {
        let now = Utc::now().timestamp();
        let token = token_with_exp("s", now + REFRESH_TOKEN_TTL_SECS - 59 * 60);

        assert!(decode_claims(&token, "s").is_ok());
    }

    #[test]
    fn test_refresh_token_dead_at_sixty_one_minutes() {
        let now = Utc::now().timestamp();
        let token = token_with_exp("s", now + REFRESH_TOKEN_TTL_SECS - 61 * 60);

        assert!(decode_claims(&token, "s").is_err());
    }

    #[test]
    fn test_empty_secret_is_a_signing_error() {
        let user = test_user();
        let keys = TokenKeys::new("", "refresh-test-secret");

        assert!(issue_access_token(&user, &keys).is_err());
        assert!(issue_token_pair(&user, &keys).is_err());
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        assert!(decode_claims("invalid.token.here", "s").is_err());
    }
}
