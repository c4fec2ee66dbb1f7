use std::{ops::Deref, sync::LazyLock};

use whiteboard_utils::whiteboard_version;

pub static USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    let homepage = env!("CARGO_PKG_HOMEPAGE");
    let version = whiteboard_version();

    format!("whiteboard-contact/{version} (+{homepage})")
});

const _: () = assert!(!env!("CARGO_PKG_HOMEPAGE").is_empty());

#[derive(Debug, Clone)]
pub struct HttpClient(reqwest::Client);

impl HttpClient {
    pub fn new() -> reqwest::Result<Self> {
        reqwest::Client::builder()
            .user_agent(&*USER_AGENT)
            .build()
            .map(Self)
    }
}

impl Deref for HttpClient {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
