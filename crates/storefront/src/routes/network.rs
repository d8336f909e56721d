//! Member directory ("network") route handlers.
//!
//! Both pages require authentication; the listing is a projection of
//! every account's public-facing fields, unpaginated.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use copper_paws_core::Handle;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::Account;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// One row of the directory listing.
#[derive(Debug, Clone)]
pub struct DirectoryEntryView {
    pub name: String,
    pub email: String,
    pub handle: String,
    pub phone_number: String,
    pub location: String,
}

/// Format the optional coordinate pair for display.
fn format_location(x: Option<f64>, y: Option<f64>) -> String {
    match (x, y) {
        (Some(x), Some(y)) => format!("{x:.4}, {y:.4}"),
        _ => "\u{2014}".to_owned(),
    }
}

impl From<&Account> for DirectoryEntryView {
    fn from(account: &Account) -> Self {
        Self {
            name: account.display_name(),
            email: account.email.to_string(),
            handle: account.handle.to_string(),
            phone_number: account
                .phone_number
                .as_ref()
                .map_or_else(String::new, ToString::to_string),
            location: format_location(account.address_x, account.address_y),
        }
    }
}

/// Member detail view.
#[derive(Debug, Clone)]
pub struct MemberView {
    pub name: String,
    pub email: String,
    pub handle: String,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub surburb: String,
    pub location: String,
    pub joined: String,
}

impl From<&Account> for MemberView {
    fn from(account: &Account) -> Self {
        Self {
            name: account.display_name(),
            email: account.email.to_string(),
            handle: account.handle.to_string(),
            phone_number: account
                .phone_number
                .as_ref()
                .map_or_else(String::new, ToString::to_string),
            address: account.address.clone().unwrap_or_default(),
            city: account.city.clone().unwrap_or_default(),
            surburb: account.surburb.clone().unwrap_or_default(),
            location: format_location(account.address_x, account.address_y),
            joined: account.date_joined.format("%-d %B %Y").to_string(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Directory listing template.
#[derive(Template, WebTemplate)]
#[template(path = "network/index.html")]
pub struct NetworkTemplate {
    pub entries: Vec<DirectoryEntryView>,
}

/// Member detail template.
#[derive(Template, WebTemplate)]
#[template(path = "network/show.html")]
pub struct MemberTemplate {
    pub member: MemberView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the member directory.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_current): RequireAuth,
) -> Result<impl IntoResponse> {
    let accounts = state.accounts().directory().await?;

    Ok(NetworkTemplate {
        entries: accounts.iter().map(DirectoryEntryView::from).collect(),
    })
}

/// Display one member, addressed by handle.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_current): RequireAuth,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse> {
    // A string that can't even be a handle can't name a member.
    let handle = Handle::parse(&handle)
        .map_err(|_| AppError::NotFound(format!("no member '{handle}'")))?;

    let account = state
        .accounts()
        .find_by_handle(&handle)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no member '{handle}'")))?;

    Ok(MemberTemplate {
        member: MemberView::from(&account),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copper_paws_core::{AccountId, Email, PhoneNumber};

    fn account() -> Account {
        Account {
            id: AccountId::new(1),
            email: Email::parse("pat@example.com").unwrap(),
            handle: Handle::parse("pat").unwrap(),
            first_name: Some("Pat".to_owned()),
            last_name: Some("Smith".to_owned()),
            phone_number: Some(PhoneNumber::parse("0215550186").unwrap()),
            address: Some("12 Harbour St".to_owned()),
            city: Some("Auckland".to_owned()),
            surburb: Some("Kingsland".to_owned()),
            address_x: Some(174.7645),
            address_y: Some(-36.8509),
            is_admin: false,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn test_directory_entry_projection() {
        let entry = DirectoryEntryView::from(&account());
        assert_eq!(entry.name, "Pat Smith");
        assert_eq!(entry.email, "pat@example.com");
        assert_eq!(entry.handle, "pat");
        assert_eq!(entry.phone_number, "0215550186");
        assert_eq!(entry.location, "174.7645, -36.8509");
    }

    #[test]
    fn test_missing_coordinates_render_as_dash() {
        let mut acct = account();
        acct.address_x = None;
        let entry = DirectoryEntryView::from(&acct);
        assert_eq!(entry.location, "\u{2014}");
    }

    #[test]
    fn test_member_view_projection() {
        let member = MemberView::from(&account());
        assert_eq!(member.city, "Auckland");
        assert_eq!(member.surburb, "Kingsland");
        assert!(!member.joined.is_empty());
    }
}
