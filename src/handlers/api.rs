use crate::errors::ApiError;
use crate::handlers::auth::TokenPairResponse;
use crate::models::user::Claims;
use crate::utils::token::{issue_token_pair, TokenKeys};
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: u64,
    pub fullname: String,
    pub username: String,
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub secrets_configured: bool,
}

/// Public health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is degraded")
    ),
    tag = "Health"
)]
pub async fn health(keys: web::Data<TokenKeys>) -> impl Responder {
    let secrets_configured = keys.configured();
    if !secrets_configured {
        warn!("Health check: signing secrets are not configured");
    }

    let status = if secrets_configured {
        "healthy"
    } else {
        "degraded"
    };

    let response = HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        secrets_configured,
    };

    if secrets_configured {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Return the profile carried by the validated access token. No store
/// lookup: the profile is exactly as fresh as the token's claims.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Profile from token claims", body = ProfileResponse),
        (status = 401, description = "Invalid or expired token")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn profile(claims: web::ReqData<Claims>) -> impl Responder {
    HttpResponse::Ok().json(ProfileResponse {
        id: claims.id,
        fullname: claims.fullname.clone(),
        username: claims.username.clone(),
        email: claims.email.clone(),
    })
}

/// Mint a fresh token pair from a validated refresh token. The identity is
/// rebuilt from the claims without a store lookup, and the old refresh token
/// stays valid until its own expiry.
#[utoipa::path(
    get,
    path = "/refresh",
    responses(
        (status = 200, description = "New token pair", body = TokenPairResponse),
        (status = 401, description = "Invalid or expired token"),
        (status = 500, description = "Signing failure")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn refresh(
    claims: web::ReqData<Claims>,
    keys: web::Data<TokenKeys>,
) -> Result<HttpResponse, ApiError> {
    let user = claims.to_user();

    let (access_token, refresh_token) = issue_token_pair(&user, &keys).map_err(|e| {
        error!(error = %e, user_id = user.id, "Failed to sign token pair");
        ApiError::Signing(e)
    })?;

    info!(user_id = user.id, username = %user.username, "Token pair refreshed");

    Ok(HttpResponse::Ok().json(TokenPairResponse {
        access_token,
        refresh_token,
    }))
}
