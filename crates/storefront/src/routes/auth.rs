//! Authentication route handlers.
//!
//! Registration, login, and logout. Validation failures re-render the
//! form in place with per-field messages; login failures collapse to one
//! generic message so the response never reveals whether the email is
//! registered.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_account, set_current_account};
use crate::models::CurrentAccount;
use crate::services::AccountError;
use crate::services::accounts::Registration;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form data.
///
/// Doubles as the value set when the form is re-rendered after a
/// validation failure; the password fields are never echoed back.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub surburb: String,
}

impl RegisterForm {
    /// Strip the passwords before the values go back into a template.
    fn without_passwords(mut self) -> Self {
        self.password = String::new();
        self.password_confirm = String::new();
        self
    }
}

/// Per-field registration errors.
#[derive(Debug, Default)]
pub struct RegisterErrors {
    pub email: Option<String>,
    pub handle: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
}

impl RegisterErrors {
    /// Map a validation-shaped [`AccountError`] onto the field it belongs
    /// to. Server-side failures are not form errors and pass through.
    fn from_account_error(err: AccountError) -> Result<Self, AppError> {
        let mut errors = Self::default();
        match err {
            AccountError::InvalidEmail(e) => errors.email = Some(e.to_string()),
            AccountError::EmailTaken => {
                errors.email = Some("An account with this email already exists".to_owned());
            }
            AccountError::InvalidHandle(e) => errors.handle = Some(e.to_string()),
            AccountError::HandleTaken => {
                errors.handle = Some("That handle is already taken".to_owned());
            }
            AccountError::WeakPassword(msg) => errors.password = Some(msg),
            AccountError::InvalidPhoneNumber(e) => errors.phone_number = Some(e.to_string()),
            other => return Err(AppError::Account(other)),
        }
        Ok(errors)
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    /// Entered email, echoed back on failure.
    pub email: String,
    /// The single generic failure message, when set.
    pub error: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub values: RegisterForm,
    pub errors: RegisterErrors,
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate {
        values: RegisterForm::default(),
        errors: RegisterErrors::default(),
    }
}

/// Handle registration form submission.
///
/// On success the new account is logged in immediately and sent home.
/// On a validation failure the form re-renders with the entered values
/// and the errors against the fields they belong to.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    // The confirmation check is a property of the form, not the account:
    // the service never sees the second password.
    if form.password != form.password_confirm {
        let errors = RegisterErrors {
            password: Some("Passwords do not match".to_owned()),
            ..RegisterErrors::default()
        };
        return Ok(RegisterTemplate {
            values: form.without_passwords(),
            errors,
        }
        .into_response());
    }

    let registration = Registration {
        email: form.email.clone(),
        handle: form.handle.clone(),
        password: form.password.clone(),
        first_name: Some(form.first_name.clone()),
        last_name: Some(form.last_name.clone()),
        phone_number: Some(form.phone_number.clone()),
        address: Some(form.address.clone()),
        city: Some(form.city.clone()),
        surburb: Some(form.surburb.clone()),
    };

    match state.accounts().register(registration).await {
        Ok(account) => {
            set_current_account(&session, &CurrentAccount::from(&account)).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            tracing::debug!(error = %err, "registration rejected");
            let errors = RegisterErrors::from_account_error(err)?;
            Ok(RegisterTemplate {
                values: form.without_passwords(),
                errors,
            }
            .into_response())
        }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
///
/// An already-authenticated requester is sent straight home.
pub async fn login_page(OptionalAuth(current): OptionalAuth) -> Response {
    if current.is_some() {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// Handle login form submission.
///
/// Every failure shape re-renders with the same generic message; the
/// response never distinguishes an unknown email from a wrong password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    // Idempotent: a logged-in requester is redirected, not re-authenticated.
    if current.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    match state.accounts().authenticate(&form.email, &form.password).await {
        Ok(account) => {
            set_current_account(&session, &CurrentAccount::from(&account)).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(AccountError::InvalidLogin) => {
            tracing::debug!("login rejected");
            Ok(LoginTemplate {
                email: form.email,
                error: Some("Invalid login".to_owned()),
            }
            .into_response())
        }
        Err(err) => Err(AppError::Account(err)),
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Destroys the session unconditionally (a no-op when nobody is logged
/// in) and redirects home.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_account(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Redirect::to("/").into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_register_errors_land_on_their_field() {
        let errors =
            RegisterErrors::from_account_error(AccountError::EmailTaken).unwrap();
        assert!(errors.email.is_some());
        assert!(errors.handle.is_none());

        let errors =
            RegisterErrors::from_account_error(AccountError::HandleTaken).unwrap();
        assert!(errors.handle.is_some());

        let errors = RegisterErrors::from_account_error(AccountError::WeakPassword(
            "too short".to_owned(),
        ))
        .unwrap();
        assert_eq!(errors.password.as_deref(), Some("too short"));
    }

    #[test]
    fn test_register_errors_pass_through_server_faults() {
        let result =
            RegisterErrors::from_account_error(AccountError::PasswordHash);
        assert!(result.is_err());
    }

    #[test]
    fn test_without_passwords_clears_both_fields() {
        let form = RegisterForm {
            email: "pat@example.com".to_owned(),
            password: "pw123456".to_owned(),
            password_confirm: "pw123456".to_owned(),
            ..RegisterForm::default()
        };
        let cleared = form.without_passwords();
        assert!(cleared.password.is_empty());
        assert!(cleared.password_confirm.is_empty());
        assert_eq!(cleared.email, "pat@example.com");
    }
}
