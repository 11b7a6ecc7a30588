use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use todo_core::TodoError;
use todo_db::RepositoryError;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Todo with id {0} not found")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Invalid(TodoError::Validation(message)) => ApiError::Validation(message),
            other => ApiError::Storage(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct JsonError {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Storage(message) = self {
            log::error!("Request failed: {}", message);
        }
        HttpResponse::build(self.status_code()).json(JsonError {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_validation_maps_to_bad_request() {
        let error: ApiError =
            RepositoryError::Invalid(TodoError::Validation("Text cannot be empty".into())).into();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "Text cannot be empty");
    }

    #[test]
    fn other_repository_errors_are_internal() {
        let error: ApiError = RepositoryError::Task("worker panicked".into()).into();
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::NotFound(7).status_code(), StatusCode::NOT_FOUND);
    }
}
