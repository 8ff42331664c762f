// Service error type shared by all handlers
// Maps domain failures to the HTTP taxonomy; internal details stay in logs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Visitor is blacklisted")]
    VisitorBlacklisted,

    #[error("Duplicate check-in")]
    DuplicateCheckin { existing_visit_id: Option<uuid::Uuid> },

    #[error("Visitor already checked out")]
    AlreadyCheckedOut,

    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error")]
    InternalError,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServiceError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Database error - please try again later" }),
                )
            },
            ServiceError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "message": msg }))
            },
            ServiceError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "message": format!("{} not found", what) }),
            ),
            ServiceError::VisitorBlacklisted => (
                StatusCode::FORBIDDEN,
                json!({ "message": "This visitor has been blacklisted and cannot check in." }),
            ),
            ServiceError::DuplicateCheckin { existing_visit_id } => (
                StatusCode::CONFLICT,
                json!({
                    "message": "Visitor is already checked in for this company today. Please check out first before checking in again.",
                    "error": "DUPLICATE_CHECKIN",
                    "existingVisitId": existing_visit_id,
                }),
            ),
            ServiceError::AlreadyCheckedOut => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Visitor already checked out" }),
            ),
            ServiceError::AlreadyExists(what) => (
                StatusCode::CONFLICT,
                json!({ "message": format!("{} already exists", what) }),
            ),
            ServiceError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Unauthorized" }),
            ),
            ServiceError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "message": msg })),
            ServiceError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": "Internal server error" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<diesel::result::Error> for ServiceError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => ServiceError::NotFound("Resource"),
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => {
                // The partial unique index on open visits backs the
                // duplicate check-in guard
                if info.message().contains("uq_visits_open_checkin") {
                    ServiceError::DuplicateCheckin {
                        existing_visit_id: None,
                    }
                } else {
                    ServiceError::AlreadyExists("Record")
                }
            },
            _ => ServiceError::DatabaseError(error.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(error: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(error.to_string())
    }
}

impl<E> From<bb8::RunError<E>> for ServiceError
where
    E: std::error::Error + 'static,
{
    fn from(error: bb8::RunError<E>) -> Self {
        ServiceError::DatabaseError(error.to_string())
    }
}
