use clap::Subcommand;
use tracing::info;
use whiteboard_config::Config;
use whiteboard_email_contracts::{Email, EmailService};
use whiteboard_models::email_address::EmailAddress;

use crate::email;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test {
        /// Defaults to the relay mailbox itself
        recipient: Option<EmailAddress>,
    },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: Option<EmailAddress>) -> anyhow::Result<()> {
    let secrets = config.email.secrets()?;
    let email_service = email::connect(&config.email, &secrets)?;
    let recipient = recipient.unwrap_or_else(|| secrets.user.clone());

    info!(%recipient, "Sending test email");
    email_service
        .send(Email {
            recipient,
            subject: "Email Deliverability Test".into(),
            body: "Email deliverability seems to be working!".into(),
            reply_to: None,
        })
        .await?;

    info!("Test email accepted by the smtp server");
    Ok(())
}
