use axum::http::StatusCode;
use thiserror::Error;

/// Failures on the persistence path. Malformed local data is always recovered
/// to defaults by the caller; network and backend failures leave local state
/// untouched and flip the sync status to `error`.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),
    #[error("backend error ({status}): {message}")]
    Backend { status: u16, message: String },
    #[error("malformed local data: {0}")]
    MalformedLocalData(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        let status = match err {
            SyncError::Network(_) | SyncError::Backend { .. } => StatusCode::BAD_GATEWAY,
            SyncError::MalformedLocalData(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
