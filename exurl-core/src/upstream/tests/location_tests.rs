use crate::upstream::{RedirectHop, UpstreamError, next_location};
use http::header::LOCATION;
use http::{HeaderMap, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use url::Url;

fn url(raw: &str) -> Url {
    Url::parse(raw).unwrap()
}

fn with_location(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, HeaderValue::from_static(value));
    headers
}

#[test]
fn non_redirect_status_has_no_next_hop() {
    let headers = with_location("https://elsewhere.example/");

    for status in [StatusCode::OK, StatusCode::NOT_FOUND, StatusCode::CREATED] {
        let next = next_location(&url("https://a.example/"), status, &headers).unwrap();
        assert_eq!(next, None);
    }
}

#[test]
fn redirect_without_location_is_final() {
    let next = next_location(&url("https://a.example/"), StatusCode::FOUND, &HeaderMap::new())
        .unwrap();
    assert_eq!(next, None);

    let next = next_location(
        &url("https://a.example/"),
        StatusCode::FOUND,
        &with_location(""),
    )
    .unwrap();
    assert_eq!(next, None);
}

#[test]
fn not_modified_with_location_counts_as_redirect() {
    let next = next_location(
        &url("https://a.example/"),
        StatusCode::NOT_MODIFIED,
        &with_location("/b"),
    )
    .unwrap();
    assert_eq!(next, Some(url("https://a.example/b")));
}

#[test]
fn absolute_location_is_taken_verbatim() {
    let next = next_location(
        &url("http://a.example/start"),
        StatusCode::MOVED_PERMANENTLY,
        &with_location("https://b.example/landing?x=1"),
    )
    .unwrap();
    assert_eq!(next, Some(url("https://b.example/landing?x=1")));
}

#[test]
fn relative_location_resolves_against_current_hop() {
    let current = url("https://b.example/dir/page?q=1");

    let cases = [
        ("next", "https://b.example/dir/next"),
        ("../up", "https://b.example/up"),
        ("/root", "https://b.example/root"),
        ("?q=2", "https://b.example/dir/page?q=2"),
        ("//c.example/x", "https://c.example/x"),
    ];

    for (location, expected) in cases {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_str(location).unwrap());

        let next = next_location(&current, StatusCode::SEE_OTHER, &headers).unwrap();
        assert_eq!(next, Some(url(expected)), "{location}");
    }
}

#[test]
fn unresolvable_location_is_an_error() {
    let err = next_location(
        &url("https://a.example/"),
        StatusCode::FOUND,
        &with_location("http://[::1"),
    )
    .unwrap_err();

    match err {
        UpstreamError::InvalidLocation { location } => assert_eq!(location, "http://[::1"),
        other => panic!("expected InvalidLocation, got {other:?}"),
    }
}

#[test]
fn non_http_location_is_an_error() {
    let err = next_location(
        &url("https://a.example/"),
        StatusCode::FOUND,
        &with_location("ftp://files.example/a"),
    )
    .unwrap_err();

    assert!(matches!(err, UpstreamError::InvalidLocation { .. }));
}

#[test]
fn hop_serializes_in_camel_case() {
    let hop = RedirectHop::new(
        url("http://a.example/"),
        StatusCode::MOVED_PERMANENTLY,
        url("https://a.example/"),
    );

    let json = serde_json::to_value(&hop).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "url": "http://a.example/",
            "status": 301,
            "statusText": "Moved Permanently",
            "location": "https://a.example/",
        })
    );
}
