use std::{future::Future, time::Duration};

use thiserror::Error;
use whiteboard_models::email_address::EmailAddress;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Hand the email to the SMTP server. Resolves once the server accepted or
    /// rejected it.
    fn send(&self, email: Email) -> impl Future<Output = Result<(), EmailSendError>> + Send;

    /// Check that the SMTP server is reachable and accepts our credentials.
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: EmailAddress,
    pub subject: String,
    /// Sent as `text/plain`.
    pub body: String,
    pub reply_to: Option<EmailAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailSendError {
    #[error("Failed to build email: {0}")]
    Message(String),
    #[error("Timed out after {0:?} waiting for the smtp server")]
    Timeout(Duration),
    #[error("Failed to talk to the smtp server: {0}")]
    Connection(String),
    #[error("Smtp server rejected the email (code {})", .code.as_deref().unwrap_or("unknown"))]
    Rejected { code: Option<String> },
    #[error("Smtp server deferred the email (code {})", .code.as_deref().unwrap_or("unknown"))]
    Deferred { code: Option<String> },
}

impl EmailSendError {
    /// Coarse classification that is safe to show to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Timeout(_) => "timeout",
            Self::Connection(_) => "connection",
            Self::Rejected { .. } => "rejected",
            Self::Deferred { .. } => "deferred",
        }
    }

    /// The smtp reply code, if the server sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Rejected { code } | Self::Deferred { code } => code.as_deref(),
            Self::Message(_) | Self::Timeout(_) | Self::Connection(_) => None,
        }
    }
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_send(mut self, email: Email, result: Result<(), EmailSendError>) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_ping(mut self, ok: bool) -> Self {
        self.expect_ping().once().return_once(move || {
            Box::pin(std::future::ready(
                ok.then_some(()).ok_or_else(|| anyhow::anyhow!("ping failed")),
            ))
        });
        self
    }
}
