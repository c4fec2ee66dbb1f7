use tracing::{error, info, warn};
use whiteboard_config::Config;
use whiteboard_email_contracts::EmailService;

use crate::{email, environment};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!(
        EMAIL_USER = presence(config.email.has_user()),
        EMAIL_PASS = presence(config.email.has_password()),
        "Checking mailbox credentials"
    );
    let secrets = config
        .email
        .secrets()
        .inspect_err(|err| error!("Refusing to start: {err}"))?;

    info!("Connecting to smtp server");
    let email = email::connect(&config.email, &secrets)?;
    if let Err(err) = email.ping().await {
        warn!("Smtp server is not reachable, messages will fail until it is: {err}");
    }

    let server = environment::rest_server(&config, email, secrets.user)?;
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}

fn presence(set: bool) -> &'static str {
    if set {
        "SET"
    } else {
        "MISSING"
    }
}
