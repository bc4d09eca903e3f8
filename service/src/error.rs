//! HTTP mapping of processing errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use filehash_core::{ProcessError, SupportedExtensions};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("File type '{extension}' not supported for single file processing. Supported types: {supported}")]
    Unsupported {
        extension: String,
        supported: SupportedExtensions,
    },

    #[error("'{}' is a directory. Use the '/process-folder' endpoint for folders.", .0.display())]
    IsDirectory(PathBuf),

    #[error("'{}' is a file. Use the '/process-file/' endpoint for single files.", .0.display())]
    IsFile(PathBuf),

    #[error("Processing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Process(ProcessError::PathNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Process(ProcessError::ReadFailure { .. }) | ApiError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::info!("Request rejected ({}): {}", status, self);
        }
        (status, Json(ErrorBody { detail: self.to_string() })).into_response()
    }
}
