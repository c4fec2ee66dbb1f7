use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use thiserror::Error;

use crate::email_address::EmailAddress;

/// `local-part@domain.tld` where every part is free of whitespace and `@`.
pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// A validated message submitted through the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: ContactEmail,
    pub message: ContactMessageContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    #[error("All fields are required")]
    InvalidInput,
    #[error("Invalid email format")]
    InvalidEmailFormat,
}

impl ContactSubmission {
    /// Validates the raw form fields.
    ///
    /// Presence and length of every field is checked before the email
    /// pattern, so a submission with a missing name and a malformed email is
    /// reported as [`ContactValidationError::InvalidInput`]. The verdict only
    /// depends on the three strings.
    pub fn parse(
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<Self, ContactValidationError> {
        let (Ok(name), Ok(message)) = (
            ContactName::try_new(name),
            ContactMessageContent::try_new(message),
        ) else {
            return Err(ContactValidationError::InvalidInput);
        };

        let email = email.trim();
        if email.is_empty() || email.chars().count() > ContactEmail::MAX_LENGTH {
            return Err(ContactValidationError::InvalidInput);
        }
        let email =
            ContactEmail::try_new(email).map_err(|_| ContactValidationError::InvalidEmailFormat)?;

        Ok(Self {
            name,
            email,
            message,
        })
    }

    /// Plain text rendering used as the body of the notification email.
    pub fn render_text(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\nMessage: {}",
            *self.name, *self.email, *self.message
        )
    }
}

/// Whether all three fields contain something other than whitespace.
///
/// This is the cheap check used to enable the submit button while typing.
pub fn all_fields_present(name: &str, email: &str, message: &str) -> bool {
    [name, email, message]
        .into_iter()
        .all(|field| !field.trim().is_empty())
}

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 200),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display, Serialize, Deserialize)
)]
pub struct ContactName(String);

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 254, regex = CONTACT_EMAIL_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display, Serialize, Deserialize)
)]
pub struct ContactEmail(String);

impl ContactEmail {
    pub const MAX_LENGTH: usize = 254;

    /// The address as a mailbox usable for a `Reply-To` header.
    ///
    /// The contact pattern is shallower than RFC 5322, so this fails for some
    /// addresses that pass validation.
    pub fn mailbox(&self) -> Option<EmailAddress> {
        self.parse().ok()
    }
}

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 5000),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display, Serialize, Deserialize)
)]
pub struct ContactMessageContent(String);
