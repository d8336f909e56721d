//! Account domain types.
//!
//! These types represent validated domain objects separate from database
//! row types.

use chrono::{DateTime, Utc};

use copper_paws_core::{AccountId, Email, Handle, PhoneNumber};

/// A registered account (domain type).
///
/// The email is the login identity; the handle addresses the account in
/// directory URLs. Profile fields are optional at creation and filled in
/// through the profile form.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Login identity, unique across the store.
    pub email: Email,
    /// Directory slug, unique across the store.
    pub handle: Handle,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Ten-digit contact number.
    pub phone_number: Option<PhoneNumber>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Surburb.
    pub surburb: Option<String>,
    /// Geocoded longitude-like coordinate shown in the directory.
    pub address_x: Option<f64>,
    /// Geocoded latitude-like coordinate shown in the directory.
    pub address_y: Option<f64>,
    /// Grants access to administrative actions.
    pub is_admin: bool,
    /// Inactive accounts cannot authenticate.
    pub is_active: bool,
    /// Staff flag, set only on superusers here.
    pub is_staff: bool,
    /// Superuser flag, set only by the bootstrap path.
    pub is_superuser: bool,
    /// When the account was created. Immutable.
    pub date_joined: DateTime<Utc>,
}

impl Account {
    /// Display name: "First Last" when both are set, otherwise whichever
    /// part exists, otherwise the handle.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.to_owned(),
            (None, None) => self.handle.to_string(),
        }
    }

    /// Whether the profile has both name fields filled in.
    #[must_use]
    pub const fn profile_complete(&self) -> bool {
        self.first_name.is_some() && self.last_name.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            id: AccountId::new(1),
            email: Email::parse("pat@example.com").unwrap(),
            handle: Handle::parse("pat").unwrap(),
            first_name: None,
            last_name: None,
            phone_number: None,
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
    fn test_display_name_falls_back_to_handle() {
        assert_eq!(account().display_name(), "pat");
    }

    #[test]
    fn test_display_name_partial() {
        let mut acct = account();
        acct.first_name = Some("Pat".to_owned());
        assert_eq!(acct.display_name(), "Pat");
    }

    #[test]
    fn test_display_name_full() {
        let mut acct = account();
        acct.first_name = Some("Pat".to_owned());
        acct.last_name = Some("Smith".to_owned());
        assert_eq!(acct.display_name(), "Pat Smith");
        assert!(acct.profile_complete());
    }
}
