use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Errors raised by the leave commands and translated to HTTP by actix.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input DTO failed validation; carries one message per failed rule.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{entity} ({id}) was not found")]
    NotFound { entity: &'static str, id: String },

    /// Request is well-formed but the current state does not allow it.
    #[error("{0}")]
    BadRequest(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(errors) => json!({ "errors": errors }),
            AppError::Persistence(e) => {
                tracing::error!(error = %e, "Unhandled persistence error");
                json!({ "message": "Internal Server Error" })
            }
            other => json!({ "message": other.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
