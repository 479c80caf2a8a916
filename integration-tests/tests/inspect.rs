use integration_tests::harness::server::free_port;
use integration_tests::harness::{ScriptedUpstream, TestServer};
use pretty_assertions::assert_eq;
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use std::time::{Duration, Instant};

fn inspect(srv: &TestServer, params: &[(&str, &str)]) -> (StatusCode, Value) {
    let res = srv.get_with("/api/inspect", params).send().unwrap();
    let status = res.status();
    (status, res.json().unwrap())
}

#[test]
fn inspect_reports_direct_response() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start();
    let target = upstream.url("/ok");

    let (status, body) = inspect(&srv, &[("url", &target)]);

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["requestedUrl"], json!(target));
    assert_eq!(body["finalUrl"], json!(target));
    assert_eq!(body["status"], json!(200));
    assert_eq!(body["statusText"], json!("OK"));
    assert_eq!(body["redirects"], json!([]));
    assert_eq!(body["contentType"], json!("text/plain"));
    assert_eq!(body["contentLength"], json!(11));
    assert_eq!(body["isImage"], json!(false));
    assert_eq!(body["headers"]["x-upstream"], json!("scripted"));
}

#[test]
fn inspect_follows_relative_redirect_chain() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start();

    let (status, body) = inspect(&srv, &[("url", &upstream.url("/hop/3"))]);

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!(200));
    assert_eq!(body["finalUrl"], json!(upstream.url("/hop/0")));

    let hops = body["redirects"].as_array().unwrap();
    assert_eq!(hops.len(), 3);
    assert_eq!(
        hops[0],
        json!({
            "url": upstream.url("/hop/3"),
            "status": 302,
            "statusText": "Found",
            "location": upstream.url("/hop/2"),
        })
    );
    assert_eq!(hops[2]["location"], json!(upstream.url("/hop/0")));
}

#[test]
fn inspect_follows_absolute_redirect() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start();

    let (_, body) = inspect(&srv, &[("url", &upstream.url("/abs"))]);

    assert_eq!(body["redirects"][0]["status"], json!(301));
    assert_eq!(body["redirects"][0]["statusText"], json!("Moved Permanently"));
    assert_eq!(body["finalUrl"], json!(upstream.url("/ok")));
    assert_eq!(body["status"], json!(200));
}

#[test]
fn exurl_alias_behaves_like_inspect() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start();

    let res = srv
        .get_with("/api/exurl", &[("url", &upstream.url("/hop/1"))])
        .send()
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().unwrap();
    assert_eq!(body["redirects"].as_array().unwrap().len(), 1);
    assert_eq!(body["finalUrl"], json!(upstream.url("/hop/0")));
}

#[test]
fn inspect_stops_at_hop_limit_on_redirect_loop() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start_with("[upstream]\nmax_hops = 3\n");

    let (status, body) = inspect(&srv, &[("url", &upstream.url("/loop"))]);

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirects"].as_array().unwrap().len(), 3);
    assert_eq!(body["status"], json!(302));
    assert_eq!(body["finalUrl"], json!(upstream.url("/loop")));
}

#[test]
fn inspect_redirect_without_location_is_terminal() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start();

    let (status, body) = inspect(&srv, &[("url", &upstream.url("/no-location"))]);

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!(302));
    assert_eq!(body["redirects"], json!([]));
}

#[test]
fn inspect_reports_upstream_error_statuses_as_success() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start();

    let (status, body) = inspect(&srv, &[("url", &upstream.url("/teapot"))]);

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["status"], json!(418));
    assert_eq!(body["statusText"], json!("I'm a teapot"));
}

#[test]
fn inspect_detects_images() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start();

    let (_, body) = inspect(&srv, &[("url", &upstream.url("/image.png"))]);

    assert_eq!(body["isImage"], json!(true));
    assert_eq!(body["contentType"], json!("image/png"));
    assert_eq!(body["contentLength"], json!(8));
}

#[test]
fn inspect_content_length_absent_or_zero() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start();

    let (_, body) = inspect(&srv, &[("url", &upstream.url("/nolength"))]);
    assert_eq!(body["contentLength"], Value::Null);

    let (_, body) = inspect(&srv, &[("url", &upstream.url("/empty"))]);
    assert_eq!(body["contentLength"], json!(0));
    assert_eq!(body["contentType"], Value::Null);
}

#[test]
fn inspect_uses_head_unless_get_requested() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start();
    let target = upstream.url("/ok");

    let (_, body) = inspect(&srv, &[("url", &target)]);
    assert_eq!(body["headers"]["x-seen-method"], json!("HEAD"));

    let (_, body) = inspect(&srv, &[("url", &target), ("method", "get")]);
    assert_eq!(body["headers"]["x-seen-method"], json!("GET"));

    let (_, body) = inspect(&srv, &[("url", &target), ("method", "POST")]);
    assert_eq!(body["headers"]["x-seen-method"], json!("HEAD"));
}

#[test]
fn inspect_rejects_missing_and_invalid_targets() {
    let srv = TestServer::start();

    for params in [
        vec![],
        vec![("url", "")],
        vec![("url", "not a url")],
        vec![("url", "ftp://example.com/file")],
        vec![("url", "/relative/path")],
    ] {
        let (status, body) = inspect(&srv, &params);

        assert_eq!(status, StatusCode::BAD_REQUEST, "params: {params:?}");
        assert_eq!(body["ok"], json!(false));
        assert!(body["error"].is_string());
    }
}

#[test]
fn inspect_non_http_redirect_is_bad_gateway() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start();

    let (status, body) = inspect(&srv, &[("url", &upstream.url("/bad-location"))]);

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["ok"], json!(false));
}

#[test]
fn inspect_unreachable_upstream_is_bad_gateway() {
    let srv = TestServer::start();
    let closed = format!("http://127.0.0.1:{}/", free_port());

    let res = srv.get_with("/api/inspect", &[("url", &closed)]).send().unwrap();
    let request_id = res
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = res.json().unwrap();
    assert_eq!(body["ok"], json!(false));

    let event = srv.completed_event(&request_id);
    assert_eq!(event.field("upstream_failure"), Some("connect"));
    assert_eq!(event.field("status"), Some("502"));
}

#[test]
fn inspect_slow_upstream_times_out() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start_with("[upstream]\nresponse_timeout_ms = 300\n");

    let (status, body) = inspect(&srv, &[("url", &upstream.url("/slow"))]);

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], json!("upstream request timed out"));
}

#[test]
fn inspect_head_returns_headers_only() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start();

    let res = srv
        .request_with(Method::HEAD, "/api/inspect", &[("url", &upstream.url("/ok"))])
        .send()
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/json; charset=utf-8"
    );
    assert!(res.bytes().unwrap().is_empty());
}

#[test]
fn inspect_default_hop_budget_is_ten() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start();

    let (_, body) = inspect(&srv, &[("url", &upstream.url("/hop/25"))]);

    assert_eq!(body["redirects"].as_array().unwrap().len(), 10);
    assert_eq!(body["status"], json!(302));
    assert_eq!(body["finalUrl"], json!(upstream.url("/hop/15")));
}

#[test]
fn inspect_client_disconnect_abandons_slow_upstream() {
    let upstream = ScriptedUpstream::start();
    let srv = TestServer::start();
    let target = upstream.url("/slow");
    let url = srv.api_url("/api/inspect", &[("url", &target)]);

    let started = Instant::now();
    srv.get_and_disconnect(
        &format!("{}?{}", url.path(), url.query().unwrap()),
        Duration::from_millis(100),
    );

    let event = srv.completed_event_where(|e| e.field("target_url") == Some(target.as_str()));

    assert!(started.elapsed() < Duration::from_millis(1500));
    assert_eq!(event.field("client_closed"), Some("true"));
    assert_eq!(event.field("route"), Some("inspect"));
}
