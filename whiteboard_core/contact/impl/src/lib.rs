use std::sync::Arc;

use tracing::{error, info};
use whiteboard_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use whiteboard_email_contracts::{Email, EmailService};
use whiteboard_models::{contact::ContactSubmission, email_address::EmailAddress};

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Email> {
    email: Email,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Mailbox that receives the notifications. The relay also sends from it.
    pub mailbox: Arc<EmailAddress>,
    pub subject: Arc<str>,
}

impl<Email> ContactFeatureServiceImpl<Email> {
    pub fn new(email: Email, config: ContactFeatureConfig) -> Self {
        Self { email, config }
    }
}

impl<EmailS> ContactFeatureService for ContactFeatureServiceImpl<EmailS>
where
    EmailS: EmailService,
{
    async fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> Result<(), ContactSendMessageError> {
        let email = Email {
            recipient: (*self.config.mailbox).clone(),
            subject: self.config.subject.to_string(),
            body: submission.render_text(),
            reply_to: submission.email.mailbox(),
        };

        self.email.send(email).await.inspect_err(|err| {
            error!(
                kind = err.kind(),
                code = err.code(),
                "Failed to dispatch contact message: {err}"
            )
        })?;

        info!("Dispatched contact message");
        Ok(())
    }
}
