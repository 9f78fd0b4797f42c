use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use serde_json::json;
use axum::Json;
use thiserror::Error;

/// Failures of the analysis engine. All of them stem from the shape of the
/// input, so callers must not retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EdaError {
    #[error("Malformed dataset: {0}")]
    MalformedDataset(String),
    #[error("Column '{0}' is not part of the dataset")]
    UnknownColumn(String),
    #[error("Column '{column}' of type {dtype} cannot be treated as {class}")]
    ClassMismatch {
        column: String,
        dtype: &'static str,
        class: &'static str,
    },
}

/// Failures turning uploaded bytes into a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported file type: '{0}' (expected .csv or .xlsx)")]
    UnsupportedFormat(String),
    #[error("Failed to parse {format} file: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
    #[error("Failed to fetch file: {0}")]
    Download(String),
}

impl LoadError {
    pub fn parse(format: &'static str, message: impl ToString) -> Self {
        LoadError::Parse {
            format,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Eda(#[from] EdaError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Analysis task failed: {}", err))
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Load(LoadError::Download(_)) => StatusCode::BAD_GATEWAY,
            AppError::Load(_) => StatusCode::BAD_REQUEST,
            AppError::Eda(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", message);
        } else {
            tracing::warn!("Request rejected: {}", message);
        }

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
