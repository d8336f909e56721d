//! Profile route handlers.
//!
//! These routes require authentication; unauthenticated requests are
//! redirected to the login page by the `RequireAuth` extractor.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use copper_paws_core::PhoneNumber;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAuth, set_current_account};
use crate::models::{Account, CurrentAccount};
use crate::services::AccountError;
use crate::services::accounts::ProfileUpdate;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Profile update form data.
///
/// Only these four fields are editable. The handle, password, and role
/// flags have no form representation at all.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
}

impl ProfileForm {
    /// Build the form values from the stored account.
    ///
    /// Used for the initial render and for every failed submission: the
    /// re-rendered form shows what is actually persisted, not the
    /// rejected input.
    fn from_account(account: &Account) -> Self {
        Self {
            email: account.email.to_string(),
            first_name: account.first_name.clone().unwrap_or_default(),
            last_name: account.last_name.clone().unwrap_or_default(),
            phone_number: account
                .phone_number
                .as_ref()
                .map(PhoneNumber::to_string)
                .unwrap_or_default(),
        }
    }
}

/// Per-field profile errors.
#[derive(Debug, Default)]
pub struct ProfileErrors {
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl ProfileErrors {
    /// Map a validation-shaped [`AccountError`] onto its field; anything
    /// else is a server fault and passes through.
    fn from_account_error(err: AccountError) -> Result<Self, AppError> {
        let mut errors = Self::default();
        match err {
            AccountError::InvalidEmail(e) => errors.email = Some(e.to_string()),
            AccountError::EmailTaken => {
                errors.email = Some("That email is already in use".to_owned());
            }
            AccountError::InvalidPhoneNumber(e) => errors.phone_number = Some(e.to_string()),
            other => return Err(AppError::Account(other)),
        }
        Ok(errors)
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    /// The account's handle, shown read-only.
    pub handle: String,
    pub values: ProfileForm,
    pub errors: ProfileErrors,
}

// =============================================================================
// Handlers
// =============================================================================

/// Load the authenticated requester's stored account.
///
/// A session naming a deleted account is treated as stale and logged out.
async fn load_account(
    state: &AppState,
    session: &Session,
    current: &CurrentAccount,
) -> Result<Option<Account>, AppError> {
    match state.accounts().get(current.id).await {
        Ok(account) => Ok(Some(account)),
        Err(AccountError::AccountNotFound) => {
            tracing::warn!(account_id = %current.id, "session refers to a missing account");
            session.flush().await?;
            Ok(None)
        }
        Err(err) => Err(AppError::Account(err)),
    }
}

/// Display the profile form, prefilled from the stored account.
pub async fn profile_page(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
) -> Result<Response, AppError> {
    let Some(account) = load_account(&state, &session, &current).await? else {
        return Ok(Redirect::to("/auth/login").into_response());
    };

    Ok(ProfileTemplate {
        handle: account.handle.to_string(),
        values: ProfileForm::from_account(&account),
        errors: ProfileErrors::default(),
    }
    .into_response())
}

/// Handle profile form submission.
///
/// On success the changed fields are persisted, the session identity is
/// refreshed (the email may have changed), and the requester is sent
/// home. On a validation failure the form re-renders from the stored
/// account state with the errors attached.
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    let Some(account) = load_account(&state, &session, &current).await? else {
        return Ok(Redirect::to("/auth/login").into_response());
    };

    let update = ProfileUpdate {
        email: form.email,
        first_name: Some(form.first_name),
        last_name: Some(form.last_name),
        phone_number: Some(form.phone_number),
    };

    match state.accounts().update_profile(&account, update).await {
        Ok(updated) => {
            set_current_account(&session, &CurrentAccount::from(&updated)).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            tracing::debug!(error = %err, "profile update rejected");
            let errors = ProfileErrors::from_account_error(err)?;
            Ok(ProfileTemplate {
                handle: account.handle.to_string(),
                values: ProfileForm::from_account(&account),
                errors,
            }
            .into_response())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copper_paws_core::{AccountId, Email, Handle};

    fn account() -> Account {
        Account {
            id: AccountId::new(1),
            email: Email::parse("pat@example.com").unwrap(),
            handle: Handle::parse("pat").unwrap(),
            first_name: Some("Pat".to_owned()),
            last_name: None,
            phone_number: Some(PhoneNumber::parse("0215550186").unwrap()),
            address: None,
            city: None,
            surburb: None,
            address_x: None,
            address_y: None,
            is_admin: false,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn test_form_values_come_from_stored_account() {
        let form = ProfileForm::from_account(&account());
        assert_eq!(form.email, "pat@example.com");
        assert_eq!(form.first_name, "Pat");
        assert_eq!(form.last_name, "");
        assert_eq!(form.phone_number, "0215550186");
    }

    #[test]
    fn test_profile_errors_land_on_their_field() {
        let errors = ProfileErrors::from_account_error(AccountError::EmailTaken).unwrap();
        assert!(errors.email.is_some());
        assert!(errors.phone_number.is_none());
    }

    #[test]
    fn test_profile_errors_pass_through_server_faults() {
        assert!(ProfileErrors::from_account_error(AccountError::PasswordHash).is_err());
    }
}
