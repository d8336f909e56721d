//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Route handlers return `Result<T, AppError>`
//! for failures they don't turn into a re-rendered form.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::AccountError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Account operation failed.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_)
                | Self::Session(_)
                | Self::Internal(_)
                | Self::Account(AccountError::Repository(_) | AccountError::PasswordHash)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Account(err) => match err {
                AccountError::InvalidLogin => StatusCode::UNAUTHORIZED,
                AccountError::EmailTaken | AccountError::HandleTaken => StatusCode::CONFLICT,
                AccountError::InvalidEmail(_)
                | AccountError::InvalidHandle(_)
                | AccountError::InvalidPhoneNumber(_)
                | AccountError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AccountError::AccountNotFound => StatusCode::NOT_FOUND,
                AccountError::Repository(_) | AccountError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                "Internal server error".to_owned()
            }
            Self::Account(err) => match err {
                AccountError::InvalidLogin => "Invalid login".to_owned(),
                AccountError::EmailTaken => "An account with this email already exists".to_owned(),
                AccountError::HandleTaken => {
                    "An account with this handle already exists".to_owned()
                }
                AccountError::InvalidEmail(_) => "Invalid email address".to_owned(),
                AccountError::InvalidHandle(_) => "Invalid handle".to_owned(),
                AccountError::InvalidPhoneNumber(_) => "Invalid phone number".to_owned(),
                AccountError::WeakPassword(msg) => msg.clone(),
                AccountError::AccountNotFound => "Account not found".to_owned(),
                AccountError::Repository(_) | AccountError::PasswordHash => {
                    "Internal server error".to_owned()
                }
            },
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("account pat".to_owned());
        assert_eq!(err.to_string(), "Not found: account pat");

        let err = AppError::BadRequest("invalid input".to_owned());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_account_error_status_codes() {
        assert_eq!(
            get_status(AppError::Account(AccountError::InvalidLogin)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Account(AccountError::EmailTaken)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Account(AccountError::AccountNotFound)),
            StatusCode::NOT_FOUND
        );
    }
}
