use crate::db::StoreError;
use crate::forms::FieldViolation;
use crate::helpers::JsonResponse;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Failures of the item operations, each mapped to one HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    /// Client data broke a field rule; nothing was written.
    #[error("Validation failed: {0:?}")]
    Validation(Vec<FieldViolation>),
    #[error("Item not found")]
    NotFound,
    /// Store failure or anything else the caller cannot fix.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ItemError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl ResponseError for ItemError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Validation(errors) => JsonResponse::form_error(errors.clone()),
            Self::NotFound => JsonResponse::not_found("Item not found"),
            Self::Internal(err) => {
                tracing::error!("Item request failed: {}", err);
                JsonResponse::internal_server_error("Server Error")
            }
        }
    }
}
