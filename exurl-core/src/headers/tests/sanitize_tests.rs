use crate::headers::{is_hop_by_hop, sanitize};
use http::{HeaderMap, HeaderValue};
use pretty_assertions::assert_eq;
use url::Url;

fn upstream_headers() -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert("content-type", HeaderValue::from_static("application/pdf"));
    h.insert("content-length", HeaderValue::from_static("1024"));
    h.insert("connection", HeaderValue::from_static("keep-alive"));
    h.insert("keep-alive", HeaderValue::from_static("timeout=5"));
    h.insert("transfer-encoding", HeaderValue::from_static("chunked"));
    h.insert("upgrade", HeaderValue::from_static("h2c"));
    h.insert("proxy-authenticate", HeaderValue::from_static("Basic"));
    h.insert("proxy-authorization", HeaderValue::from_static("Basic Zm9v"));
    h.insert("te", HeaderValue::from_static("trailers"));
    h.insert("trailers", HeaderValue::from_static("expires"));
    h.insert("trailer", HeaderValue::from_static("expires"));
    h.insert("cache-control", HeaderValue::from_static("public, max-age=3600"));
    h.insert("access-control-allow-origin", HeaderValue::from_static("https://a.example"));
    h.append("set-cookie", HeaderValue::from_static("a=1"));
    h.append("set-cookie", HeaderValue::from_static("b=2"));
    h
}

fn final_url() -> Url {
    Url::parse("https://files.example/docs/report.pdf").unwrap()
}

#[test]
fn hop_by_hop_headers_are_dropped() {
    let out = sanitize(&upstream_headers(), &final_url(), false);

    for name in [
        "connection",
        "keep-alive",
        "transfer-encoding",
        "upgrade",
        "proxy-authenticate",
        "proxy-authorization",
        "te",
        "trailers",
        "trailer",
    ] {
        assert!(!out.contains_key(name), "{name} should be stripped");
    }
}

#[test]
fn end_to_end_headers_are_forwarded() {
    let out = sanitize(&upstream_headers(), &final_url(), false);

    assert_eq!(out.get("content-type").unwrap(), "application/pdf");
    assert_eq!(out.get("content-length").unwrap(), "1024");

    let cookies: Vec<_> = out.get_all("set-cookie").iter().collect();
    assert_eq!(cookies.len(), 2);
}

#[test]
fn cache_control_is_always_no_store() {
    let out = sanitize(&upstream_headers(), &final_url(), false);
    assert_eq!(out.get_all("cache-control").iter().count(), 1);
    assert_eq!(out.get("cache-control").unwrap(), "no-store");

    let out = sanitize(&HeaderMap::new(), &final_url(), false);
    assert_eq!(out.get("cache-control").unwrap(), "no-store");
}

#[test]
fn cors_policy_overrides_upstream() {
    let out = sanitize(&upstream_headers(), &final_url(), false);

    assert_eq!(out.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(
        out.get("access-control-allow-methods").unwrap(),
        "GET,HEAD,OPTIONS"
    );
    assert_eq!(
        out.get("access-control-allow-headers").unwrap(),
        "Content-Type, *"
    );
}

#[test]
fn download_sets_attachment_disposition() {
    let out = sanitize(&upstream_headers(), &final_url(), true);
    assert_eq!(
        out.get("content-disposition").unwrap(),
        "attachment; filename=\"report.pdf\""
    );

    let out = sanitize(&upstream_headers(), &final_url(), false);
    assert!(out.get("content-disposition").is_none());
}

#[test]
fn download_replaces_upstream_disposition() {
    let mut headers = upstream_headers();
    headers.insert(
        "content-disposition",
        HeaderValue::from_static("inline; filename=\"other.pdf\""),
    );

    let out = sanitize(&headers, &final_url(), true);
    assert_eq!(out.get_all("content-disposition").iter().count(), 1);
    assert_eq!(
        out.get("content-disposition").unwrap(),
        "attachment; filename=\"report.pdf\""
    );
}

#[test]
fn hop_by_hop_match_ignores_case() {
    assert!(is_hop_by_hop("Connection"));
    assert!(is_hop_by_hop("TRANSFER-ENCODING"));
    assert!(!is_hop_by_hop("content-type"));
    assert!(!is_hop_by_hop("x-connection"));
}
