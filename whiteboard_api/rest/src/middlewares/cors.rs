//! Cross-origin policy.
//!
//! Requests with an `Origin` outside the allow-list are answered with 403
//! before they reach a handler. Requests without an `Origin` header (curl,
//! server-to-server) pass through untouched.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::routes::error;

pub fn add<S: Clone + Send + Sync + 'static>(
    router: Router<S>,
    allowed_origins: Arc<[HeaderValue]>,
) -> Router<S> {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins.iter().cloned()))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    router
        .layer(cors)
        .layer(from_fn_with_state(allowed_origins, guard))
}

async fn guard(
    State(allowed_origins): State<Arc<[HeaderValue]>>,
    request: Request,
    next: Next,
) -> Response {
    match request.headers().get(header::ORIGIN) {
        Some(origin) if !allowed_origins.contains(origin) => {
            warn!(?origin, "refusing request from disallowed origin");
            error(StatusCode::FORBIDDEN, "Origin not allowed")
        }
        _ => next.run(request).await,
    }
}
