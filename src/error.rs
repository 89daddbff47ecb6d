use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::db::DbError;
use crate::models::MessageResponse;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    /// Maps a write failure, naming the entity when the name was already taken.
    pub fn from_write(err: DbError, entity: &str, name: &str) -> Self {
        match err {
            DbError::UniqueViolation => {
                ApiError::Conflict(format!("{} {} already exists", entity, name))
            }
            DbError::Sqlx(err) => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
            ApiError::Database(err) => {
                tracing::error!(error = %err, "database error");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        (status, Json(MessageResponse::failure(message))).into_response()
    }
}
