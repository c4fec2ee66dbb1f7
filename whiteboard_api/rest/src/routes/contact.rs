use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde_json::Value;
use tracing::debug;
use whiteboard_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use whiteboard_models::contact::{ContactSubmission, ContactValidationError};

use super::error;
use crate::models::{
    contact::{ApiContactMessage, ApiSendFailure},
    ApiMessage,
};

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route("/api/contact", routing::post(send_message))
        .with_state(service)
}

async fn send_message(
    service: State<Arc<impl ContactFeatureService>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let message = match body {
        Ok(Json(value)) => ApiContactMessage::from_json(value),
        Err(rejection) => {
            debug!("rejected contact body: {rejection}");
            None
        }
    };
    let Some(message) = message else {
        return error(StatusCode::BAD_REQUEST, "Invalid request body");
    };

    let submission = match ContactSubmission::try_from(message) {
        Ok(submission) => submission,
        Err(ContactValidationError::InvalidInput) => {
            return error(StatusCode::BAD_REQUEST, "All fields are required")
        }
        Err(ContactValidationError::InvalidEmailFormat) => {
            return error(StatusCode::BAD_REQUEST, "Invalid email format")
        }
    };

    match service.send_message(submission).await {
        Ok(()) => Json(ApiMessage::success("Message sent successfully")).into_response(),
        Err(ContactSendMessageError::Send(err)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiSendFailure::new("Error sending message", &err)),
        )
            .into_response(),
    }
}
