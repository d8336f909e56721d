//! Account service.
//!
//! Registration, authentication, profile updates, and the member
//! directory. All input normalization and password handling happens here;
//! handlers only move form data in and rendered state out.

mod error;

pub use error::AccountError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use copper_paws_core::{Email, Handle, PhoneNumber};

use crate::db::accounts::{AccountRepository, NewAccount, ProfileChanges};
use crate::db::{ConflictField, RepositoryError};
use crate::models::Account;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Validated-at-the-edge registration input.
///
/// All fields arrive as the raw form strings; the service parses them.
#[derive(Debug, Default)]
pub struct Registration {
    pub email: String,
    pub handle: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub surburb: Option<String>,
}

/// Raw profile-update input. Only these four fields are writable through
/// the update flow.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

/// Account service.
///
/// Handles account creation, login verification, and profile updates.
pub struct AccountService<'a> {
    accounts: AccountRepository<'a>,
}

impl<'a> AccountService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    // =========================================================================
    // Account creation
    // =========================================================================

    /// Register a new account.
    ///
    /// The email is normalized during parsing, the password is Argon2id
    /// hashed, and the account is stored active with no role flags.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidEmail` / `InvalidHandle` /
    /// `InvalidPhoneNumber` if a field fails to parse.
    /// Returns `AccountError::WeakPassword` if the password is too short.
    /// Returns `AccountError::EmailTaken` / `HandleTaken` if the identity
    /// is already registered (decided by the store's unique constraints,
    /// so concurrent duplicate registrations cannot both succeed).
    pub async fn register(&self, registration: Registration) -> Result<Account, AccountError> {
        self.create_account(registration, false).await
    }

    /// Create a privileged account.
    ///
    /// The bootstrap path used by the CLI, never by a request handler.
    /// Identical to [`register`](Self::register) except that `is_admin`,
    /// `is_staff`, and `is_superuser` are all set. A non-empty email and
    /// handle are required, enforced by the same parsers.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`register`](Self::register).
    pub async fn create_superuser(
        &self,
        email: &str,
        handle: &str,
        password: &str,
    ) -> Result<Account, AccountError> {
        let registration = Registration {
            email: email.to_owned(),
            handle: handle.to_owned(),
            password: password.to_owned(),
            ..Registration::default()
        };
        self.create_account(registration, true).await
    }

    async fn create_account(
        &self,
        registration: Registration,
        superuser: bool,
    ) -> Result<Account, AccountError> {
        let email = Email::parse(&registration.email)?;
        let handle = Handle::parse(&registration.handle)?;
        validate_password(&registration.password)?;

        // Fast, friendly duplicate checks. The unique constraints on the
        // insert below stay authoritative under concurrent registrations.
        if self.accounts.email_in_use(&email, None).await? {
            return Err(AccountError::EmailTaken);
        }
        if self.accounts.handle_in_use(&handle).await? {
            return Err(AccountError::HandleTaken);
        }

        let phone_number = clean(registration.phone_number)
            .as_deref()
            .map(PhoneNumber::parse)
            .transpose()?;

        let password_hash = hash_password(&registration.password)?;

        let account = self
            .accounts
            .create(NewAccount {
                email,
                handle,
                password_hash,
                first_name: clean(registration.first_name),
                last_name: clean(registration.last_name),
                phone_number,
                address: clean(registration.address),
                city: clean(registration.city),
                surburb: clean(registration.surburb),
                superuser,
            })
            .await
            .map_err(conflict_to_taken)?;

        tracing::info!(account_id = %account.id, handle = %account.handle, "account created");

        Ok(account)
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Verify an email/password pair against the store.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidLogin` for every failure shape -
    /// malformed email, unknown email, wrong password, or inactive
    /// account - so a caller cannot probe which addresses are registered.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        let email = Email::parse(email).map_err(|_| AccountError::InvalidLogin)?;

        let (account, password_hash) = self
            .accounts
            .get_password_hash(&email)
            .await?
            .ok_or(AccountError::InvalidLogin)?;

        verify_password(password, &password_hash)?;

        if !account.is_active {
            return Err(AccountError::InvalidLogin);
        }

        Ok(account)
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Apply a profile update to `account`.
    ///
    /// The email uniqueness check excludes the account's own row, so
    /// resubmitting an unchanged email never reads as a duplicate. The
    /// pre-write check gives the friendly field error; the store's unique
    /// constraint stays authoritative under concurrent updates and maps
    /// to the same error.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidEmail` / `InvalidPhoneNumber` if a
    /// field fails to parse.
    /// Returns `AccountError::EmailTaken` if another account holds the
    /// new email.
    pub async fn update_profile(
        &self,
        account: &Account,
        update: ProfileUpdate,
    ) -> Result<Account, AccountError> {
        let email = Email::parse(&update.email)?;

        let phone_number = clean(update.phone_number)
            .as_deref()
            .map(PhoneNumber::parse)
            .transpose()?;

        if self
            .accounts
            .email_in_use(&email, Some(account.id))
            .await?
        {
            return Err(AccountError::EmailTaken);
        }

        let updated = self
            .accounts
            .update_profile(
                account.id,
                &ProfileChanges {
                    email,
                    first_name: clean(update.first_name),
                    last_name: clean(update.last_name),
                    phone_number,
                },
            )
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AccountError::AccountNotFound,
                other => conflict_to_taken(other),
            })?;

        tracing::info!(account_id = %updated.id, "profile updated");

        Ok(updated)
    }

    // =========================================================================
    // Directory
    // =========================================================================

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::AccountNotFound` if the account doesn't exist.
    pub async fn get(&self, id: copper_paws_core::AccountId) -> Result<Account, AccountError> {
        self.accounts
            .get_by_id(id)
            .await?
            .ok_or(AccountError::AccountNotFound)
    }

    /// Look up an account by its directory handle.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Repository` if the query fails.
    pub async fn find_by_handle(&self, handle: &Handle) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.get_by_handle(handle).await?)
    }

    /// Every registered account, oldest first, for the directory listing.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Repository` if the query fails.
    pub async fn directory(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.accounts.list_all().await?)
    }
}

/// Map store-level uniqueness conflicts to the matching field error.
fn conflict_to_taken(e: RepositoryError) -> AccountError {
    match e {
        RepositoryError::Conflict(ConflictField::Email) => AccountError::EmailTaken,
        RepositoryError::Conflict(ConflictField::Handle) => AccountError::HandleTaken,
        other => AccountError::Repository(other),
    }
}

/// Drop optional form fields that arrived empty.
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AccountError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AccountError::PasswordHash)
}

/// Verify a password against a hash.
///
/// Fails with the same `InvalidLogin` the unknown-email path uses.
fn verify_password(password: &str, hash: &str) -> Result<(), AccountError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AccountError::InvalidLogin)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AccountError::InvalidLogin)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AccountError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(matches!(
            verify_password("battery staple", &hash),
            Err(AccountError::InvalidLogin)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AccountError::InvalidLogin)
        ));
    }

    #[test]
    fn test_clean_drops_empty_fields() {
        assert_eq!(clean(None), None);
        assert_eq!(clean(Some(String::new())), None);
        assert_eq!(clean(Some("   ".to_owned())), None);
        assert_eq!(clean(Some("  Kingsland ".to_owned())), Some("Kingsland".to_owned()));
    }

    #[test]
    fn test_conflict_mapping() {
        assert!(matches!(
            conflict_to_taken(RepositoryError::Conflict(ConflictField::Email)),
            AccountError::EmailTaken
        ));
        assert!(matches!(
            conflict_to_taken(RepositoryError::Conflict(ConflictField::Handle)),
            AccountError::HandleTaken
        ));
        assert!(matches!(
            conflict_to_taken(RepositoryError::NotFound),
            AccountError::Repository(RepositoryError::NotFound)
        ));
    }
}
