use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use todo_core::StorageError;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid Todo Status")]
    InvalidStatus,

    #[error("Invalid Todo Priority")]
    InvalidPriority,

    #[error("Invalid Todo Category")]
    InvalidCategory,

    #[error("Invalid Due Date")]
    InvalidDueDate,

    #[error("Todo Not Found")]
    TodoNotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidStatus
            | AppError::InvalidPriority
            | AppError::InvalidCategory
            | AppError::InvalidDueDate => StatusCode::BAD_REQUEST,
            AppError::TodoNotFound => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
