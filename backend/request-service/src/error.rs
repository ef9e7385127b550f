use crate::db::StoreError;
use crate::services::reconciliation::{ReconciliationError, ValidationError};
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use error_types::ErrorResponse;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Message shown to clients for any server-side failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// HTTP-facing error. The `Display` text is exactly what the client sees, so variants built
/// from internal failures carry only a public message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ReconciliationError> for AppError {
    fn from(err: ReconciliationError) -> Self {
        tracing::error!(
            client_id = err.client_id,
            error = %err.source,
            "Request list replacement rolled back"
        );
        AppError::Internal("Failed to save requests.".to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Storage operation failed");
        AppError::Internal(INTERNAL_ERROR_MESSAGE.to_string())
    }
}
