use std::sync::Arc;

use anyhow::bail;
use clap::Subcommand;
use url::Url;
use whiteboard_config::Config;
use whiteboard_extern_impl::contact::{ContactApiServiceConfig, ContactApiServiceImpl};
use whiteboard_form::{ContactFormController, SubmitOutcome};
use whiteboard_models::contact::ContactValidationError;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Submit a message through a running relay, the way the website's form
    /// does
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
        /// Contact route of the relay [default: the locally configured port]
        #[arg(long)]
        endpoint: Option<Url>,
        #[arg(long, default_value = "10s")]
        timeout: whiteboard_config::Duration,
    },
}

impl ContactCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            ContactCommand::Send {
                name,
                email,
                message,
                endpoint,
                timeout,
            } => {
                let endpoint = match endpoint {
                    Some(endpoint) => endpoint,
                    None => local_endpoint(&config)?,
                };
                let api = ContactApiServiceImpl::new(ContactApiServiceConfig {
                    endpoint: Arc::new(endpoint),
                    timeout: *timeout,
                })?;

                let form = ContactFormController::new(api);
                form.set_name(name);
                form.set_email(email);
                form.set_message(message);

                match form.submit().await {
                    SubmitOutcome::Sent => {
                        println!("Message sent successfully");
                        Ok(())
                    }
                    SubmitOutcome::Ignored => bail!(ContactValidationError::InvalidInput),
                    SubmitOutcome::Invalid(err) => bail!(err),
                    SubmitOutcome::Failed(err) => Err(err.into()),
                }
            }
        }
    }
}

fn local_endpoint(config: &Config) -> Result<Url, url::ParseError> {
    format!("http://127.0.0.1:{}/api/contact", config.http.port).parse()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn default_endpoint_uses_configured_port() {
        let config = whiteboard_config::load_from(&[] as &[&Path], |key| {
            (key == "PORT").then(|| "5050".to_owned())
        })
        .unwrap();

        assert_eq!(
            local_endpoint(&config).unwrap().as_str(),
            "http://127.0.0.1:5050/api/contact"
        );
    }
}
