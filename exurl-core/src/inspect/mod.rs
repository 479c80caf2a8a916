//! Metadata derived from the final upstream response of a redirect chain.


use crate::headers::HeaderBag;
use crate::upstream::{RedirectHop, Resolution, status_text};
use http::{HeaderMap, StatusCode};
use serde::Serialize;
use url::Url;

const IMAGE_PREFIX: &str = "image/";

/// Status and header-derived facts about one response. Never touches the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    pub status: u16,
    pub status_text: String,
    pub headers: HeaderBag,
    pub content_type: Option<String>,
    /// `None` when absent or not a non-negative integer; `Some(0)` is an explicit zero.
    pub content_length: Option<u64>,
    pub is_image: bool,
}

impl ResponseMeta {
    pub fn classify(status: StatusCode, headers: &HeaderMap) -> Self {
        let headers = HeaderBag::from(headers);

        let content_type = headers.get("content-type").map(str::to_string);
        let content_length = headers
            .get("content-length")
            .and_then(|raw| raw.trim().parse::<u64>().ok());
        let is_image = content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with(IMAGE_PREFIX));

        Self {
            status: status.as_u16(),
            status_text: status_text(status).to_string(),
            headers,
            content_type,
            content_length,
            is_image,
        }
    }
}

/// JSON body of a successful inspect call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionResult {
    pub ok: bool,
    pub requested_url: Url,
    pub final_url: Url,
    pub status: u16,
    pub status_text: String,
    pub redirects: Vec<RedirectHop>,
    pub headers: HeaderBag,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub is_image: bool,
}

impl InspectionResult {
    pub fn new(requested_url: Url, final_url: Url, redirects: Vec<RedirectHop>, meta: ResponseMeta) -> Self {
        Self {
            ok: true,
            requested_url,
            final_url,
            status: meta.status,
            status_text: meta.status_text,
            redirects,
            headers: meta.headers,
            content_type: meta.content_type,
            content_length: meta.content_length,
            is_image: meta.is_image,
        }
    }

    /// Consumes the resolution; the unread upstream body is dropped with it.
    pub fn from_resolution(resolution: Resolution) -> Self {
        let meta = ResponseMeta::classify(resolution.status(), resolution.headers());

        Self::new(
            resolution.requested.into_url(),
            resolution.final_url,
            resolution.hops,
            meta,
        )
    }
}
