#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use tokio::net::TcpListener;
use whiteboard_api_rest::{RestServer, RestServerConfig};
use whiteboard_core_contact_contracts::MockContactFeatureService;
use whiteboard_core_health_contracts::MockHealthFeatureService;

pub const ALLOWED_ORIGIN: &str = "https://johnclose.ie";
pub const OTHER_ORIGIN: &str = "https://evil.example";

/// Start a server on a random local port and return its base url.
pub async fn spawn(health: MockHealthFeatureService, contact: MockContactFeatureService) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let config = RestServerConfig::new([ALLOWED_ORIGIN, "http://localhost:3000/"]).unwrap();
    let server = RestServer::new(health, contact, config);
    tokio::spawn(server.serve_on(listener));

    format!("http://{addr}")
}

pub async fn spawn_contact(contact: MockContactFeatureService) -> String {
    spawn(MockHealthFeatureService::new(), contact).await
}
