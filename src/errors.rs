use crate::db::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Request-level failures, mapped to an HTTP status and a `{"message": ...}`
/// body at the boundary. Every authentication sub-cause (unknown user, wrong
/// password, bad or expired token) renders the same message so the response
/// never reveals which check failed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Input Is Required")]
    MissingInput,
    #[error("Invalid Credential")]
    InvalidCredential,
    #[error("Internal Server Error")]
    Persistence(StoreError),
    #[error("Internal Server Error")]
    Hash(argon2::password_hash::Error),
    #[error("Internal Server Error")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // an empty required field is a caller mistake, not a server fault
            StoreError::Invalid => ApiError::MissingInput,
            other => ApiError::Persistence(other),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingInput => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredential => StatusCode::UNAUTHORIZED,
            ApiError::Persistence(_) | ApiError::Hash(_) | ApiError::Signing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.to_string()
        }))
    }
}
