//! Core types for Copper Paws.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod handle;
pub mod id;
pub mod phone;

pub use email::{Email, EmailError};
pub use handle::{Handle, HandleError};
pub use id::*;
pub use phone::{PhoneNumber, PhoneNumberError};
