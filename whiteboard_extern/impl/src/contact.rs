use std::{sync::Arc, time::Duration};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;
use whiteboard_extern_contracts::contact::{ContactApiError, ContactApiService};
use whiteboard_models::contact::{
    ContactEmail, ContactMessageContent, ContactName, ContactSubmission,
};

use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct ContactApiServiceImpl {
    config: ContactApiServiceConfig,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct ContactApiServiceConfig {
    /// Full url of the relay's contact route.
    pub endpoint: Arc<Url>,
    pub timeout: Duration,
}

impl ContactApiServiceImpl {
    pub fn new(config: ContactApiServiceConfig) -> reqwest::Result<Self> {
        Ok(Self {
            config,
            client: HttpClient::new()?,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> ContactApiError {
        if err.is_timeout() {
            ContactApiError::Timeout(self.config.timeout)
        } else {
            ContactApiError::Network(err.to_string())
        }
    }
}

impl ContactApiService for ContactApiServiceImpl {
    async fn send_message(&self, submission: ContactSubmission) -> Result<(), ContactApiError> {
        let response = self
            .client
            .post((*self.config.endpoint).clone())
            .timeout(self.config.timeout)
            .json(&ContactRequest {
                name: &submission.name,
                email: &submission.email,
                message: &submission.message,
            })
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(err))?;
        debug!(%status, "contact api responded");

        let parsed = serde_json::from_slice::<ContactResponse>(&body);
        match (status, parsed) {
            (StatusCode::OK, Ok(ContactResponse { success: true, .. })) => Ok(()),
            (StatusCode::OK, Err(err)) => {
                Err(ContactApiError::MalformedResponse(err.to_string()))
            }
            (status, parsed) => Err(ContactApiError::Rejected {
                status: status.as_u16(),
                message: parsed
                    .ok()
                    .and_then(|response| response.message)
                    .or_else(|| status.canonical_reason().map(Into::into))
                    .unwrap_or_default(),
            }),
        }
    }
}

#[derive(Serialize)]
struct ContactRequest<'a> {
    name: &'a ContactName,
    email: &'a ContactEmail,
    message: &'a ContactMessageContent,
}

#[derive(Deserialize)]
struct ContactResponse {
    success: bool,
    message: Option<String>,
}
