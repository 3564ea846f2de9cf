use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Multipart form is missing the {0:?} file field")]
    MissingFile(&'static str),
    #[error("Uploaded file {0:?} is empty")]
    EmptyFile(String),
    #[error("Uploaded file {file_name:?} does not have one of the extensions {allowed:?}")]
    UnsupportedExtension {
        file_name: String,
        allowed: &'static [&'static str],
    },
    #[error(transparent)]
    Multipart(#[from] MultipartError),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::MissingFile(_) => {
                error_response(StatusCode::BAD_REQUEST, "A document file is required")
            }
            Self::EmptyFile(_) => {
                error_response(StatusCode::BAD_REQUEST, "The uploaded document is empty")
            }
            Self::UnsupportedExtension { allowed, .. } => error_response(
                StatusCode::BAD_REQUEST,
                format!("Only {} documents are accepted", allowed.join(", ")),
            ),
            Self::Multipart(err) => error_response(err.status(), err.body_text()),
        }
    }
}
