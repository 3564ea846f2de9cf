//! Error types for the Wasl server application.
//!
//! Domain errors (authentication, marketplace state, validation, uploads) each map
//! themselves onto an HTTP status with an [`ErrorDto`] body. Everything else is
//! logged and reported as a generic 500.

pub mod auth;
pub mod config;
pub mod marketplace;
pub mod upload;
pub mod validation;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{
        auth::AuthError, config::ConfigError, marketplace::MarketplaceError, upload::UploadError,
        validation::ValidationError,
    },
};

/// Main error type for the Wasl server application.
///
/// Aggregates the domain specific error types and external library errors so that
/// services and controllers can use `?` throughout.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication or authorization failure.
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Marketplace rule violation (missing record, invalid state, duplicate, declined payment).
    #[error(transparent)]
    MarketplaceError(#[from] MarketplaceError),
    /// Rejected request payload.
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
    /// Rejected document upload.
    #[error(transparent)]
    UploadError(#[from] UploadError),
    /// Parse error (failed to parse a value from string or other format).
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Internal error indicating a bug, such as a row vanishing inside a transaction.
    #[error("Internal error: {0:?}")]
    InternalError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// Redis session store error (connection, command execution).
    #[error(transparent)]
    SessionRedisError(#[from] tower_sessions_redis_store::fred::prelude::Error),
    /// Filesystem or socket error.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// Password hashing or hash parsing failure.
    #[error("Password hashing failed: {0}")]
    PasswordHashError(#[from] argon2::password_hash::Error),
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 400, 401, 402, 403, 404, 409 or 413 - Mapped by the domain error
/// - 500 Internal Server Error - For all other errors (with error logging)
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::MarketplaceError(err) => err.into_response(),
            Self::ValidationError(err) => err.into_response(),
            Self::UploadError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Build a JSON error response with the given status and message.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic message to the client so that
/// implementation details are not leaked.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}
