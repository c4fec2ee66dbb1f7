use anyhow::Context;
use whiteboard_config::{EmailConfig, MailboxSecrets};
use whiteboard_email_impl::EmailServiceImpl;

/// Set up the smtp transport for the relay mailbox.
pub fn connect(
    config: &EmailConfig,
    secrets: &MailboxSecrets,
) -> anyhow::Result<EmailServiceImpl> {
    EmailServiceImpl::new(
        &config.smtp_url,
        secrets.user.clone(),
        &secrets.password,
        *config.timeout,
    )
    .with_context(|| format!("Invalid smtp url {:?}", config.smtp_url))
}
