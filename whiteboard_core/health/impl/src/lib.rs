use std::{sync::Arc, time::Duration};

use tokio::{sync::RwLock, time::Instant};
use tracing::error;
use whiteboard_core_health_contracts::{HealthFeatureService, HealthStatus};
use whiteboard_email_contracts::EmailService;

#[derive(Debug, Clone)]
pub struct HealthFeatureServiceImpl<Email> {
    email: Email,
    config: HealthFeatureConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthFeatureConfig {
    /// How long the result of an smtp ping is reused.
    pub cache_ttl: Duration,
    pub email_user: bool,
    pub email_password: bool,
}

#[derive(Debug, Default)]
struct State {
    smtp: RwLock<Option<CachedPing>>,
}

#[derive(Debug)]
struct CachedPing {
    ok: bool,
    timestamp: Instant,
}

impl<Email> HealthFeatureServiceImpl<Email> {
    pub fn new(email: Email, config: HealthFeatureConfig) -> Self {
        Self {
            email,
            config,
            state: Default::default(),
        }
    }
}

impl<Email> HealthFeatureServiceImpl<Email>
where
    Email: EmailService,
{
    async fn smtp_status(&self) -> bool {
        let fresh = |cached: &CachedPing| cached.timestamp.elapsed() < self.config.cache_ttl;

        if let Some(cached) = self.state.smtp.read().await.as_ref().filter(|c| fresh(*c)) {
            return cached.ok;
        }

        let mut guard = self.state.smtp.write().await;
        if let Some(cached) = guard.as_ref().filter(|c| fresh(*c)) {
            return cached.ok;
        }

        let ok = self
            .email
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping smtp server: {err}"))
            .is_ok();

        guard
            .insert(CachedPing {
                ok,
                timestamp: Instant::now(),
            })
            .ok
    }
}

impl<Email> HealthFeatureService for HealthFeatureServiceImpl<Email>
where
    Email: EmailService,
{
    async fn get_status(&self) -> HealthStatus {
        HealthStatus {
            email_user: self.config.email_user,
            email_password: self.config.email_password,
            smtp: self.smtp_status().await,
        }
    }
}
