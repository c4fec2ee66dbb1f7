//! Fixtures shared by the tests of the whiteboard crates.

use std::sync::LazyLock;

use whiteboard_models::{contact::ContactSubmission, email_address::EmailAddress};

pub const MAILBOX_ADDRESS: &str = "relay@example.com";

pub static MAILBOX: LazyLock<EmailAddress> = LazyLock::new(|| MAILBOX_ADDRESS.parse().unwrap());

pub const SUBJECT: &str = "New Message from Portfolio Website";

pub const JANE_NAME: &str = "Jane Doe";
pub const JANE_EMAIL: &str = "jane@example.com";
pub const JANE_MESSAGE: &str = "Hello";

/// The well-formed submission used throughout the tests.
pub static JANE: LazyLock<ContactSubmission> =
    LazyLock::new(|| ContactSubmission::parse(JANE_NAME, JANE_EMAIL, JANE_MESSAGE).unwrap());

pub const JANE_TEXT: &str = "Name: Jane Doe\nEmail: jane@example.com\nMessage: Hello";

/// Passes the contact form pattern but is not a valid RFC 5322 mailbox.
pub static SHALLOW: LazyLock<ContactSubmission> = LazyLock::new(|| {
    ContactSubmission::parse("Max Mustermann", "max@exa(mple).de", "Servus!").unwrap()
});
