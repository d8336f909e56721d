//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentAccount;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// The logged-in account, if any; switches the nav between the guest
    /// and member variants.
    pub current: Option<CurrentAccount>,
}

/// Display the home page.
pub async fn home(OptionalAuth(current): OptionalAuth) -> impl IntoResponse {
    HomeTemplate { current }
}
