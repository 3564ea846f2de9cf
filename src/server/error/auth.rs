use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use entity::status::UserRole;
use thiserror::Error;

use crate::server::{error::error_response, model::auth::Policy};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User ID is not present in session")]
    UserNotInSession,
    #[error("User ID {0:?} not found in database despite having an active session")]
    UserNotInDatabase(i32),
    #[error("No {role:?} profile exists for user ID {user_id:?}")]
    ProfileNotFound { user_id: i32, role: UserRole },
    #[error("Login failed for email {0:?}")]
    InvalidCredentials(String),
    #[error("User ID {0:?} attempted to log in before approval")]
    AccountPendingApproval(i32),
    #[error("User ID {user_id:?} with role {role:?} denied by policy {policy:?}")]
    Forbidden {
        user_id: i32,
        role: UserRole,
        policy: Policy,
    },
    #[error("Registration attempted with existing email {0:?}")]
    EmailAlreadyRegistered(String),
    #[error("User ID {0:?} supplied an incorrect current password")]
    IncorrectPassword(i32),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::UserNotInSession => {
                error_response(StatusCode::UNAUTHORIZED, "Authentication required")
            }
            Self::UserNotInDatabase(_) | Self::ProfileNotFound { .. } => {
                error_response(StatusCode::NOT_FOUND, "User not found")
            }
            Self::InvalidCredentials(_) => {
                error_response(StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            Self::AccountPendingApproval(_) => {
                error_response(StatusCode::FORBIDDEN, "Your account is pending approval")
            }
            Self::Forbidden { .. } => error_response(
                StatusCode::FORBIDDEN,
                "You do not have access to this resource",
            ),
            Self::EmailAlreadyRegistered(_) => error_response(
                StatusCode::CONFLICT,
                "An account with this email already exists",
            ),
            Self::IncorrectPassword(_) => {
                error_response(StatusCode::BAD_REQUEST, "Current password is incorrect")
            }
        }
    }
}
