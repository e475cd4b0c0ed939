use std::{ops::Deref, sync::LazyLock};

use crate::folio_version;

pub static USER_AGENT: LazyLock<String> =
    LazyLock::new(|| format!("folio-contact-relay/{}", folio_version()));

/// Shared [`reqwest::Client`] sending the folio `User-Agent`.
#[derive(Debug, Clone)]
pub struct HttpClient(reqwest::Client);

impl Deref for HttpClient {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self(
            reqwest::Client::builder()
                .user_agent(&*USER_AGENT)
                .build()
                .unwrap(),
        )
    }
}
