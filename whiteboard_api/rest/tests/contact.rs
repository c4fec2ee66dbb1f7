use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use whiteboard_core_contact_contracts::{ContactSendMessageError, MockContactFeatureService};
use whiteboard_demo::{JANE, JANE_EMAIL, JANE_MESSAGE, JANE_NAME};
use whiteboard_email_contracts::EmailSendError;
use whiteboard_models::contact::ContactSubmission;

mod common;

async fn post(base: &str, body: Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("{base}/api/contact"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

fn jane() -> Value {
    json!({"name": JANE_NAME, "email": JANE_EMAIL, "message": JANE_MESSAGE})
}

#[tokio::test]
async fn ok() {
    // Arrange
    let contact = MockContactFeatureService::new().with_send_message(JANE.clone(), Ok(()));
    let base = common::spawn_contact(contact).await;

    // Act
    let (status, body) = post(&base, jane()).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "message": "Message sent successfully"})
    );
}

#[tokio::test]
async fn fields_are_trimmed_before_dispatch() {
    // Arrange
    let contact = MockContactFeatureService::new().with_send_message(JANE.clone(), Ok(()));
    let base = common::spawn_contact(contact).await;

    // Act
    let (status, _) = post(
        &base,
        json!({"name": "  Jane Doe ", "email": " jane@example.com", "message": "Hello\n"}),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_fields() {
    // Arrange
    let base = common::spawn_contact(MockContactFeatureService::new()).await;

    for body in [
        json!({"name": JANE_NAME, "email": JANE_EMAIL}),
        json!({"name": "   ", "email": JANE_EMAIL, "message": JANE_MESSAGE}),
        json!({"name": JANE_NAME, "email": "", "message": JANE_MESSAGE}),
        json!({"name": JANE_NAME, "email": JANE_EMAIL, "message": 42}),
        json!({}),
    ] {
        // Act
        let (status, response) = post(&base, body).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response,
            json!({"success": false, "message": "All fields are required"})
        );
    }
}

#[tokio::test]
async fn invalid_email_format() {
    // Arrange
    let base = common::spawn_contact(MockContactFeatureService::new()).await;

    for email in ["not-an-email", "jane@example", "jane doe@example.com"] {
        // Act
        let (status, response) = post(
            &base,
            json!({"name": JANE_NAME, "email": email, "message": JANE_MESSAGE}),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response,
            json!({"success": false, "message": "Invalid email format"})
        );
    }
}

#[tokio::test]
async fn invalid_body() {
    // Arrange
    let base = common::spawn_contact(MockContactFeatureService::new()).await;
    let client = reqwest::Client::new();

    for request in [
        client
            .post(format!("{base}/api/contact"))
            .header("content-type", "application/json")
            .body("{\"name\": "),
        client
            .post(format!("{base}/api/contact"))
            .header("content-type", "text/plain")
            .body("name=Jane"),
        client.post(format!("{base}/api/contact")),
        client
            .post(format!("{base}/api/contact"))
            .json(&json!(["Jane", JANE_EMAIL, JANE_MESSAGE])),
    ] {
        // Act
        let response = request.send().await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>().await.unwrap(),
            json!({"success": false, "message": "Invalid request body"})
        );
    }
}

#[tokio::test]
async fn dispatch_failure_then_recovery() {
    // Arrange
    let other = ContactSubmission::parse("John", "john@example.com", "Hi again").unwrap();
    let contact = MockContactFeatureService::new()
        .with_send_message(
            JANE.clone(),
            Err(ContactSendMessageError::Send(EmailSendError::Rejected {
                code: Some("535".into()),
            })),
        )
        .with_send_message(other, Ok(()));
    let base = common::spawn_contact(contact).await;

    // Act
    let (failed_status, failed) = post(&base, jane()).await;
    let (status, _) = post(
        &base,
        json!({"name": "John", "email": "john@example.com", "message": "Hi again"}),
    )
    .await;

    // Assert
    assert_eq!(failed_status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        failed,
        json!({
            "success": false,
            "message": "Error sending message",
            "error": {
                "type": "rejected",
                "message": "The mail server rejected the message (SMTP 535)",
            },
        })
    );
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn dispatch_timeout() {
    // Arrange
    let contact = MockContactFeatureService::new().with_send_message(
        JANE.clone(),
        Err(ContactSendMessageError::Send(EmailSendError::Timeout(
            std::time::Duration::from_secs(15),
        ))),
    );
    let base = common::spawn_contact(contact).await;

    // Act
    let (status, body) = post(&base, jane()).await;

    // Assert
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["type"], "timeout");
}

#[tokio::test]
async fn handler_panic_is_contained() {
    // Arrange
    // No expectation is set, so the mock panics when the handler calls it.
    let base = common::spawn_contact(MockContactFeatureService::new()).await;

    // Act
    let (status, body) = post(&base, jane()).await;
    let health = reqwest::get(format!("{base}/")).await.unwrap();

    // Assert
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"success": false, "message": "Internal server error"})
    );
    assert_eq!(health.status(), StatusCode::OK);
}
