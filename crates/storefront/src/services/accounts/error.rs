//! Account service error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] copper_paws_core::EmailError),

    /// Invalid handle format.
    #[error("invalid handle: {0}")]
    InvalidHandle(#[from] copper_paws_core::HandleError),

    /// Invalid phone number format.
    #[error("invalid phone number: {0}")]
    InvalidPhoneNumber(#[from] copper_paws_core::PhoneNumberError),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Email already registered to another account.
    #[error("email already in use")]
    EmailTaken,

    /// Handle already registered to another account.
    #[error("handle already in use")]
    HandleTaken,

    /// Login failed. Deliberately does not say which of the email, the
    /// password, or the account's active flag was at fault.
    #[error("Invalid login")]
    InvalidLogin,

    /// Account not found.
    #[error("account not found")]
    AccountNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
