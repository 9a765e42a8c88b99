use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl AppError {
    /// True when the underlying database error is the storage layer refusing
    /// a double booking (overlap exclusion or uniqueness violation).
    pub fn is_overlap_violation(&self) -> bool {
        if let AppError::Database(e) = self {
            if let Some(db_err) = e.as_database_error() {
                let code = db_err.code().unwrap_or_default();

                // 23P01 = PostgreSQL Exclusion Violation
                // 23505 = PostgreSQL Unique Violation
                // 2067  = SQLite Unique Constraint
                return code == "23P01" || code == "23505" || code == "2067";
            }
        }
        false
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_overlap_violation() {
            return (
                StatusCode::CONFLICT,
                Json(json!({ "error": "Slot is already booked" })),
            )
                .into_response();
        }

        let (status, message) = match &self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
