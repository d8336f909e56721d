//! Account repository for database operations.
//!
//! Row structs are fetched with the runtime query API and parsed into the
//! validated domain types in `models::account`; invalid stored values
//! surface as `RepositoryError::DataCorruption` instead of leaking out.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use copper_paws_core::{AccountId, Email, Handle, PhoneNumber};

use super::{ConflictField, RepositoryError};
use crate::models::Account;

/// Column list shared by every query that loads a full account.
const ACCOUNT_COLUMNS: &str = "id, email, handle, first_name, last_name, phone_number, \
     address, city, surburb, address_x, address_y, \
     is_admin, is_active, is_staff, is_superuser, date_joined";

/// Raw account row as stored.
#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i32,
    email: String,
    handle: String,
    first_name: Option<String>,
    last_name: Option<String>,
    phone_number: Option<String>,
    address: Option<String>,
    city: Option<String>,
    surburb: Option<String>,
    address_x: Option<f64>,
    address_y: Option<f64>,
    is_admin: bool,
    is_active: bool,
    is_staff: bool,
    is_superuser: bool,
    date_joined: DateTime<Utc>,
}

impl AccountRow {
    /// Parse the stored strings back through the domain types.
    fn into_account(self) -> Result<Account, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let handle = Handle::parse(&self.handle).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid handle in database: {e}"))
        })?;

        let phone_number = self
            .phone_number
            .as_deref()
            .map(PhoneNumber::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid phone number in database: {e}"))
            })?;

        Ok(Account {
            id: AccountId::new(self.id),
            email,
            handle,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number,
            address: self.address,
            city: self.city,
            surburb: self.surburb,
            address_x: self.address_x,
            address_y: self.address_y,
            is_admin: self.is_admin,
            is_active: self.is_active,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            date_joined: self.date_joined,
        })
    }
}

/// Account row joined with its optional password hash.
#[derive(sqlx::FromRow)]
struct AccountPasswordRow {
    #[sqlx(flatten)]
    account: AccountRow,
    password_hash: Option<String>,
}

/// Fields required to insert a new account.
#[derive(Debug)]
pub struct NewAccount {
    pub email: Email,
    pub handle: Handle,
    /// Argon2 PHC string, never the plaintext.
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<PhoneNumber>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub surburb: Option<String>,
    /// When set, all role flags (`is_admin`, `is_staff`, `is_superuser`)
    /// are stored as true.
    pub superuser: bool,
}

/// Profile fields writable through the update flow.
///
/// Everything else on the account (password, handle, role flags,
/// `date_joined`) is deliberately not representable here.
#[derive(Debug)]
pub struct ProfileChanges {
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<PhoneNumber>,
}

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored values are invalid.
    pub async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM storefront.account WHERE id = $1");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(AccountRow::into_account).transpose()
    }

    /// Get an account by its (normalized) email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored values are invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM storefront.account WHERE email = $1");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(AccountRow::into_account).transpose()
    }

    /// Get an account by its directory handle.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored values are invalid.
    pub async fn get_by_handle(&self, handle: &Handle) -> Result<Option<Account>, RepositoryError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM storefront.account WHERE handle = $1");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(handle.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(AccountRow::into_account).transpose()
    }

    /// Get an account and its password hash by email.
    ///
    /// Returns `None` if the account doesn't exist or has no password set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored values are invalid.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS}, p.password_hash AS password_hash \
             FROM storefront.account a \
             LEFT JOIN storefront.account_password p ON a.id = p.account_id \
             WHERE a.email = $1"
        );
        let row = sqlx::query_as::<_, AccountPasswordRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let Some(password_hash) = row.password_hash else {
            return Ok(None);
        };

        Ok(Some((row.account.into_account()?, password_hash)))
    }

    /// Create a new account with its password hash.
    ///
    /// The account row and its password row are written in one transaction
    /// so a failure leaves neither behind.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` naming the field if the email or
    /// handle is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: NewAccount) -> Result<Account, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO storefront.account \
                 (email, handle, first_name, last_name, phone_number, \
                  address, city, surburb, is_admin, is_staff, is_superuser) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9, $9) \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(new.email.as_str())
            .bind(new.handle.as_str())
            .bind(new.first_name.as_deref())
            .bind(new.last_name.as_deref())
            .bind(new.phone_number.as_ref().map(PhoneNumber::as_str))
            .bind(new.address.as_deref())
            .bind(new.city.as_deref())
            .bind(new.surburb.as_deref())
            .bind(new.superuser)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_unique_violation)?;

        let account = row.into_account()?;

        sqlx::query(
            "INSERT INTO storefront.account_password (account_id, password_hash) \
             VALUES ($1, $2)",
        )
        .bind(account.id.as_i32())
        .bind(&new.password_hash)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(account)
    }

    /// Check whether an email is held by any account other than `exclude`.
    ///
    /// The exclusion is what keeps an account's own unchanged email from
    /// reading as a duplicate during a profile update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_in_use(
        &self,
        email: &Email,
        exclude: Option<AccountId>,
    ) -> Result<bool, RepositoryError> {
        let row: Option<i32> = sqlx::query_scalar(
            "SELECT id FROM storefront.account \
             WHERE email = $1 AND ($2::int4 IS NULL OR id <> $2)",
        )
        .bind(email.as_str())
        .bind(exclude.map(|id| id.as_i32()))
        .fetch_optional(self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// Check whether a handle is already registered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn handle_in_use(&self, handle: &Handle) -> Result<bool, RepositoryError> {
        let row: Option<i32> =
            sqlx::query_scalar("SELECT id FROM storefront.account WHERE handle = $1")
                .bind(handle.as_str())
                .fetch_optional(self.pool)
                .await?;

        Ok(row.is_some())
    }

    /// Apply profile changes to an account.
    ///
    /// Only the fields in [`ProfileChanges`] are written; `date_joined`,
    /// the handle, the role flags, and the password are untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new email is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: AccountId,
        changes: &ProfileChanges,
    ) -> Result<Account, RepositoryError> {
        let sql = format!(
            "UPDATE storefront.account \
             SET email = $2, first_name = $3, last_name = $4, phone_number = $5 \
             WHERE id = $1 \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id.as_i32())
            .bind(changes.email.as_str())
            .bind(changes.first_name.as_deref())
            .bind(changes.last_name.as_deref())
            .bind(changes.phone_number.as_ref().map(PhoneNumber::as_str))
            .fetch_optional(self.pool)
            .await
            .map_err(map_unique_violation)?;

        row.map_or(Err(RepositoryError::NotFound), AccountRow::into_account)
    }

    /// Load every account, oldest first.
    ///
    /// The directory has no pagination; the member base is expected to fit
    /// in one page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored values are invalid.
    pub async fn list_all(&self) -> Result<Vec<Account>, RepositoryError> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM storefront.account ORDER BY date_joined, id"
        );
        let rows = sqlx::query_as::<_, AccountRow>(&sql)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }
}

/// Translate a unique-constraint violation into a field-level conflict.
///
/// The constraint names match the migration
/// (`account_email_key`, `account_handle_key`).
fn map_unique_violation(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        let field = match db_err.constraint() {
            Some("account_handle_key") => ConflictField::Handle,
            _ => ConflictField::Email,
        };
        return RepositoryError::Conflict(field);
    }
    RepositoryError::Database(e)
}
