use std::future::Future;

use thiserror::Error;
use whiteboard_email_contracts::EmailSendError;
use whiteboard_models::contact::ContactSubmission;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Forward a validated submission to the configured mailbox.
    ///
    /// Exactly one dispatch is attempted per call.
    fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<(), ContactSendMessageError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactSendMessageError {
    #[error("Failed to send message: {0}")]
    Send(#[from] EmailSendError),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_send_message(
        mut self,
        submission: ContactSubmission,
        result: Result<(), ContactSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
