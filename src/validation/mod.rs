//! Inbound contact-form handling: markup stripping and schema checks.

pub mod contact;
pub mod sanitize;

pub use contact::{ContactForm, ContactSubmission, FieldError, validate_contact};
pub use sanitize::sanitize;
