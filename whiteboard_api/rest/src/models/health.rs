use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatus {
    pub message: &'static str,
    pub email_config: ApiEmailConfig,
    pub smtp: bool,
}

#[derive(Debug, Serialize)]
pub struct ApiEmailConfig {
    pub user: ApiPresence,
    pub pass: ApiPresence,
}

impl ApiEmailConfig {
    pub fn new(user: bool, pass: bool) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiPresence {
    Set,
    Missing,
}

impl From<bool> for ApiPresence {
    fn from(value: bool) -> Self {
        if value {
            Self::Set
        } else {
            Self::Missing
        }
    }
}
