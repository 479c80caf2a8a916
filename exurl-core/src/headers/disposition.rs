use http::HeaderValue;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::Url;

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, as browsers'
/// `encodeURIComponent` does.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const FALLBACK_NAME: &str = "download";

/// File name offered for a download of `url`: the last path segment,
/// percent-encoded as a URI component, or `download` when that segment is empty.
pub fn download_name(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    if segment.is_empty() {
        return FALLBACK_NAME.to_string();
    }

    // The path is already percent-encoded; decode first so it is not encoded twice.
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    utf8_percent_encode(&decoded, URI_COMPONENT).to_string()
}

pub fn attachment_disposition(url: &Url) -> HeaderValue {
    let value = format!("attachment; filename=\"{}\"", download_name(url));

    // The encoded name is pure ASCII without quotes or control characters.
    HeaderValue::from_str(&value).unwrap_or_else(|_| {
        HeaderValue::from_static("attachment; filename=\"download\"")
    })
}
