//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use copper_paws_core::{AccountId, Email, Handle};

use crate::models::Account;

/// Session-stored account identity.
///
/// Minimal data stored in the session to identify the logged-in account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAccount {
    /// Account's database ID.
    pub id: AccountId,
    /// Account's email address.
    pub email: Email,
    /// Account's directory handle.
    pub handle: Handle,
}

impl From<&Account> for CurrentAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            handle: account.handle.clone(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in account.
    pub const CURRENT_ACCOUNT: &str = "current_account";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_roundtrip() {
        let current = CurrentAccount {
            id: AccountId::new(3),
            email: Email::parse("pat@example.com").unwrap(),
            handle: Handle::parse("pat").unwrap(),
        };

        let json = serde_json::to_string(&current).unwrap();
        let parsed: CurrentAccount = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, current.id);
        assert_eq!(parsed.email, current.email);
        assert_eq!(parsed.handle, current.handle);
    }
}
