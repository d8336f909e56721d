//! Business-logic services for storefront.

pub mod accounts;

pub use accounts::{AccountError, AccountService};
