use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::sanitize::sanitize;

pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("valid email regex")
});

/// Raw `/api/mail` body. Every field is optional so missing ones become field errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub token: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// Sanitized contact payload that passed the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Sanitize every field, then check it. Errors are reported in field order.
pub fn validate_contact(form: &ContactForm) -> Result<ContactSubmission, Vec<FieldError>> {
    let name = form.name.as_deref().map(sanitize);
    let email = form.email.as_deref().map(sanitize);
    let message = form.message.as_deref().map(sanitize);

    let mut errors = Vec::new();

    match &name {
        None => errors.push(FieldError::new("name", "Required")),
        Some(n) if n.chars().count() < NAME_MIN_CHARS => errors.push(FieldError::new(
            "name",
            format!("Name must be at least {NAME_MIN_CHARS} characters"),
        )),
        Some(_) => {}
    }

    match &email {
        None => errors.push(FieldError::new("email", "Required")),
        Some(e) if !is_valid_email(e) => errors.push(FieldError::new("email", "Invalid email")),
        Some(_) => {}
    }

    match &message {
        None => errors.push(FieldError::new("message", "Required")),
        Some(m) if m.chars().count() < MESSAGE_MIN_CHARS => errors.push(FieldError::new(
            "message",
            format!("Message must be at least {MESSAGE_MIN_CHARS} characters"),
        )),
        Some(_) => {}
    }

    match (name, email, message) {
        (Some(name), Some(email), Some(message)) if errors.is_empty() => Ok(ContactSubmission {
            name,
            email,
            message,
        }),
        _ => Err(errors),
    }
}

pub fn is_valid_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_RE.is_match(value)
}
