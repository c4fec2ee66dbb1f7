use serde::Serialize;
use serde_json::Value;
use whiteboard_email_contracts::EmailSendError;
use whiteboard_models::contact::{ContactSubmission, ContactValidationError};

/// The raw fields of a contact request. Fields that are absent or not
/// strings are treated as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ApiContactMessage {
    /// Returns `None` unless the body is a json object.
    pub fn from_json(value: Value) -> Option<Self> {
        let Value::Object(object) = value else {
            return None;
        };
        let field = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };

        Some(Self {
            name: field("name"),
            email: field("email"),
            message: field("message"),
        })
    }
}

impl TryFrom<ApiContactMessage> for ContactSubmission {
    type Error = ContactValidationError;

    fn try_from(value: ApiContactMessage) -> Result<Self, Self::Error> {
        ContactSubmission::parse(&value.name, &value.email, &value.message)
    }
}

#[derive(Debug, Serialize)]
pub struct ApiSendFailure {
    pub success: bool,
    pub message: &'static str,
    pub error: ApiSendErrorDetail,
}

/// What went wrong while dispatching, without credentials or server
/// transcripts.
#[derive(Debug, Serialize)]
pub struct ApiSendErrorDetail {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
}

impl ApiSendFailure {
    pub fn new(message: &'static str, err: &EmailSendError) -> Self {
        let detail = match err {
            EmailSendError::Message(_) => "The message could not be composed".to_owned(),
            EmailSendError::Timeout(_) => "The mail server did not respond in time".to_owned(),
            EmailSendError::Connection(_) => "Could not connect to the mail server".to_owned(),
            EmailSendError::Rejected { code } => {
                with_code("The mail server rejected the message", code)
            }
            EmailSendError::Deferred { code } => {
                with_code("The mail server temporarily refused the message", code)
            }
        };

        Self {
            success: false,
            message,
            error: ApiSendErrorDetail {
                kind: err.kind(),
                message: detail,
            },
        }
    }
}

fn with_code(text: &str, code: &Option<String>) -> String {
    match code {
        Some(code) => format!("{text} (SMTP {code})"),
        None => text.to_owned(),
    }
}
