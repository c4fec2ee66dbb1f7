use serde::Serialize;

pub mod contact;
pub mod health;

/// The envelope every contact endpoint answers with.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: &'static str,
}

impl ApiMessage {
    pub fn success(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }

    pub fn failure(message: &'static str) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub message: &'static str,
}
