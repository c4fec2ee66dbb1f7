use std::sync::Arc;

use axum::{extract::State, routing, Json, Router};
use whiteboard_core_health_contracts::HealthFeatureService;

use crate::models::{
    health::{ApiEmailConfig, ApiStatus},
    ApiInfo,
};

pub fn router(service: Arc<impl HealthFeatureService>) -> Router<()> {
    Router::new()
        .route("/", routing::get(root))
        .route("/api/test", routing::get(status))
        .with_state(service)
}

async fn root() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "Backend is running",
    })
}

async fn status(service: State<Arc<impl HealthFeatureService>>) -> Json<ApiStatus> {
    let status = service.get_status().await;
    Json(ApiStatus {
        message: "Backend is running",
        email_config: ApiEmailConfig::new(status.email_user, status.email_password),
        smtp: status.smtp,
    })
}
