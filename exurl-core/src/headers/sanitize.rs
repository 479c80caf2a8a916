use crate::headers::{apply_cors, attachment_disposition};
use http::header::{CACHE_CONTROL, CONTENT_DISPOSITION};
use http::{HeaderMap, HeaderValue};
use url::Url;

/// Builds the downstream header set for a proxied upstream body.
///
/// - hop-by-hop headers never cross the proxy
/// - `Cache-Control` is always `no-store`
/// - CORS policy always applies
/// - `download` adds an attachment `Content-Disposition` named after `final_url`
pub fn sanitize(upstream: &HeaderMap, final_url: &Url, download: bool) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(upstream.len() + 5);

    for (name, value) in upstream.iter() {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }

    out.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    apply_cors(&mut out);

    if download {
        out.insert(CONTENT_DISPOSITION, attachment_disposition(final_url));
    }

    out
}

pub fn is_hop_by_hop(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "trailers"
            | "transfer-encoding"
            | "upgrade"
    )
}
