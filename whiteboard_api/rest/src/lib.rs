use std::{net::IpAddr, sync::Arc};

use anyhow::Context;
use axum::{http::HeaderValue, Router};
use tokio::net::TcpListener;
use tracing::info;
use whiteboard_core_contact_contracts::ContactFeatureService;
use whiteboard_core_health_contracts::HealthFeatureService;

mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Health, Contact> {
    health: Health,
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    /// Browser origins that may call the api. Requests carrying any other
    /// `Origin` are refused.
    pub allowed_origins: Arc<[HeaderValue]>,
}

impl RestServerConfig {
    pub fn new(allowed_origins: impl IntoIterator<Item = impl AsRef<str>>) -> anyhow::Result<Self> {
        let allowed_origins = allowed_origins
            .into_iter()
            .map(|origin| {
                let origin = origin.as_ref().trim_end_matches('/');
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid allowed origin: {origin:?}"))
            })
            .collect::<anyhow::Result<_>>()?;

        Ok(Self { allowed_origins })
    }
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthFeatureService,
    Contact: ContactFeatureService,
{
    pub fn new(health: Health, contact: Contact, config: RestServerConfig) -> Self {
        Self {
            health,
            contact,
            config,
        }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("Failed to bind to {host}:{port}"))?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener until the process is stopped.
    pub async fn serve_on(self, listener: TcpListener) -> anyhow::Result<()> {
        info!("Listening on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router())
            .await
            .map_err(Into::into)
    }

    pub fn router(self) -> Router<()> {
        let router = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(self.contact.into()))
            .fallback(routes::not_found);

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::cors::add(router, self.config.allowed_origins);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}
