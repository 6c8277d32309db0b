use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pinhole_core::StoreError;
use thiserror::Error;
use tracing::{error, warn};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to decode request body: {0}")]
    BadRequest(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("code not found: {0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(StoreError),
    #[error("store task failed: {0}")]
    Task(String),
    #[error("stored url for {0} is not a valid Location header")]
    UnusableRecord(String),
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(code) => Self::NotFound(code),
            other => Self::Store(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Task(_) | AppError::UnusableRecord(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
            // Store internals stay in the log, not in the response.
            return (status, "internal server error\n").into_response();
        }

        warn!(error = %self, "request rejected");
        (status, format!("{self}\n")).into_response()
    }
}
