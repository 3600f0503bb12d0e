use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::{Client, ClientBuilder};

const APP_USER_AGENT: &str = "StudioInstaller/0.1.0";
const CONNECT_TIMEOUT_SECS: u64 = 30;
const IDLE_TIMEOUT_SECS: u64 = 120;

/// Whole-request limit for the small text documents (manifest, changelog).
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(60);

/// Shared client for the manifest, changelog and archive requests.
///
/// `identity` encoding keeps `Content-Length` equal to the bytes on disk,
/// which download progress is computed from.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    client_builder(Duration::from_secs(IDLE_TIMEOUT_SECS)).build()
}

/// No total timeout here: an archive download takes as long as it takes.
/// Only a connection that goes silent for `idle` is dropped.
pub(crate) fn client_builder(idle: Duration) -> ClientBuilder {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .read_timeout(idle)
}
