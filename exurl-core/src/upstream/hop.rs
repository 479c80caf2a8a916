use http::StatusCode;
use serde::Serialize;
use url::Url;

/// One followed redirect: `url` answered `status` and pointed at `location`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectHop {
    pub url: Url,
    pub status: u16,
    pub status_text: String,
    pub location: Url,
}

impl RedirectHop {
    pub fn new(url: Url, status: StatusCode, location: Url) -> Self {
        Self {
            url,
            status: status.as_u16(),
            status_text: status_text(status).to_string(),
            location,
        }
    }
}

/// Canonical reason phrase; HTTP/2 carries none on the wire.
pub fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}
