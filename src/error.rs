//! Error taxonomy shared by handlers and services.

use crate::storage::StoreError;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use paperclip::actix::api_v2_errors;
use thiserror::Error;
use tracing::error;

/// Terminal request failures: validation (400), authentication (401) and
/// storage (500). Storage detail is logged server-side and never leaked to
/// the client.
#[api_v2_errors(code = 400, code = 401, code = 500)]
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Auth(String),
    #[error("internal server error")]
    Store(#[from] StoreError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Store(cause) = self {
            error!(error = %cause, "storage failure");
        }

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "status": "error",
            "message": self.to_string(),
        }))
    }
}
