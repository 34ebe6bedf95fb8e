use crate::db::user_repository::UserStore;
use crate::errors::ApiError;
use crate::models::user::NewUser;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::token::{issue_token_pair, TokenKeys};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SignUpRequest {
    pub fullname: String,
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SignInRequest {
    #[serde(rename = "userNameOrEmail")]
    pub user_name_or_email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Register a new user and hand back a fresh token pair
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "User registered", body = TokenPairResponse),
        (status = 400, description = "Missing required field"),
        (status = 500, description = "Hash, persistence, or signing failure")
    ),
    tag = "Authentication"
)]
pub async fn sign_up(
    store: web::Data<dyn UserStore>,
    keys: web::Data<TokenKeys>,
    payload: web::Json<SignUpRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(username = %payload.username, email = %payload.email, "Sign-up attempt");

    if payload.fullname.is_empty()
        || payload.username.is_empty()
        || payload.password.is_empty()
        || payload.email.is_empty()
    {
        warn!(username = %payload.username, "Sign-up rejected: empty required field");
        return Err(ApiError::MissingInput);
    }

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        ApiError::Hash(e)
    })?;

    let user = store
        .create(NewUser {
            fullname: payload.fullname.clone(),
            username: payload.username.clone(),
            email: payload.email.clone(),
            password_hash,
        })
        .await
        .map_err(|e| {
            warn!(error = %e, username = %payload.username, "Failed to persist user");
            ApiError::from(e)
        })?;

    let (access_token, refresh_token) = issue_token_pair(&user, &keys).map_err(|e| {
        error!(error = %e, user_id = user.id, "Failed to sign token pair");
        ApiError::Signing(e)
    })?;

    info!(user_id = user.id, username = %user.username, "User registered");

    Ok(HttpResponse::Created().json(TokenPairResponse {
        access_token,
        refresh_token,
    }))
}

/// Verify credentials and hand back a fresh token pair
#[utoipa::path(
    post,
    path = "/signin",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Credentials verified", body = TokenPairResponse),
        (status = 400, description = "Missing required field"),
        (status = 401, description = "Invalid credential")
    ),
    tag = "Authentication"
)]
pub async fn sign_in(
    store: web::Data<dyn UserStore>,
    keys: web::Data<TokenKeys>,
    payload: web::Json<SignInRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(identifier = %payload.user_name_or_email, "Sign-in attempt");

    if payload.user_name_or_email.is_empty() || payload.password.is_empty() {
        warn!("Sign-in rejected: empty required field");
        return Err(ApiError::MissingInput);
    }

    let user = store
        .find_by_username_or_email(&payload.user_name_or_email)
        .await
        .map_err(|e| {
            error!(error = %e, "Lookup failed during sign-in");
            ApiError::from(e)
        })?;

    // Unknown user and wrong password take the same exit so the response
    // never reveals which one it was.
    let user = match user {
        Some(user) => user,
        None => {
            warn!(identifier = %payload.user_name_or_email, "Sign-in failed: unknown user");
            return Err(ApiError::InvalidCredential);
        }
    };

    let valid = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, user_id = user.id, "Stored password hash is malformed");
        ApiError::Hash(e)
    })?;
    if !valid {
        warn!(user_id = user.id, "Sign-in failed: wrong password");
        return Err(ApiError::InvalidCredential);
    }

    let (access_token, refresh_token) = issue_token_pair(&user, &keys).map_err(|e| {
        error!(error = %e, user_id = user.id, "Failed to sign token pair");
        ApiError::Signing(e)
    })?;

    info!(user_id = user.id, username = %user.username, "User signed in");

    Ok(HttpResponse::Ok().json(TokenPairResponse {
        access_token,
        refresh_token,
    }))
}
