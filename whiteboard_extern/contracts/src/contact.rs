use std::{future::Future, time::Duration};

use thiserror::Error;
use whiteboard_models::contact::ContactSubmission;

/// Client side of the relay's `POST /api/contact`.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactApiService: Send + Sync + 'static {
    /// Issue exactly one request. Resolves to `Ok` only if the relay answered
    /// `200` with `success: true`.
    fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<(), ContactApiError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactApiError {
    #[error("Could not reach the contact api: {0}")]
    Network(String),
    #[error("The contact api did not answer within {0:?}")]
    Timeout(Duration),
    #[error("The contact api refused the message ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("The contact api sent an unexpected response: {0}")]
    MalformedResponse(String),
    /// The caller stopped waiting before the contact api answered. Whether the
    /// message was delivered is unknown.
    #[error("The request was abandoned before the contact api answered")]
    Abandoned,
}

#[cfg(feature = "mock")]
impl MockContactApiService {
    pub fn with_send_message(
        mut self,
        submission: ContactSubmission,
        result: Result<(), ContactApiError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
