//! Wires the concrete services together.

use std::sync::Arc;

use whiteboard_api_rest::RestServerConfig;
use whiteboard_config::Config;
use whiteboard_core_contact_impl::{ContactFeatureConfig, ContactFeatureServiceImpl};
use whiteboard_core_health_impl::{HealthFeatureConfig, HealthFeatureServiceImpl};
use whiteboard_email_impl::EmailServiceImpl;
use whiteboard_models::email_address::EmailAddress;

pub type Email = EmailServiceImpl;
pub type ContactFeature = ContactFeatureServiceImpl<Email>;
pub type HealthFeature = HealthFeatureServiceImpl<Email>;
pub type RestServer = whiteboard_api_rest::RestServer<HealthFeature, ContactFeature>;

pub fn rest_server(
    config: &Config,
    email: Email,
    mailbox: EmailAddress,
) -> anyhow::Result<RestServer> {
    let contact = ContactFeatureServiceImpl::new(
        email.clone(),
        ContactFeatureConfig {
            mailbox: Arc::new(mailbox),
            subject: config.contact.subject.as_str().into(),
        },
    );

    let health = HealthFeatureServiceImpl::new(
        email,
        HealthFeatureConfig {
            cache_ttl: *config.health.cache_ttl,
            email_user: config.email.has_user(),
            email_password: config.email.has_password(),
        },
    );

    let rest_config = RestServerConfig::new(&config.http.allowed_origins)?;

    Ok(RestServer::new(health, contact, rest_config))
}
