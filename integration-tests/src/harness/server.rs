use crate::harness::{CapturedEvent, init_test_tracing};
use exurl_core::config::ExurlConfig;
use exurl_core::server::build_pingora_server;
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use std::io::Write;
use std::net::{Shutdown, TcpStream};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};
use url::Url;

/// Handle to a running exurl test server.
pub struct TestServer {
    base_url: String,
    client: Client,
}

impl TestServer {
    /// Start an exurl instance with default upstream and identity settings.
    pub fn start() -> Self {
        Self::start_with("")
    }

    /// Start an exurl instance; `extra` is appended to the generated config, so it
    /// may carry `[upstream]` and `[identity]` tables.
    ///
    /// The listen port is allocated dynamically, so servers can run in parallel.
    pub fn start_with(extra: &str) -> Self {
        // Initialize tracing (this must happen first).
        init_test_tracing(events());

        let listen_port = free_port();

        let toml = format!("[server]\nlisten = \"127.0.0.1:{listen_port}\"\n\n{extra}");
        let cfg: ExurlConfig = toml.parse().expect("failed to parse test config");

        let server = build_pingora_server(cfg).expect("failed to build exurl server");

        // Run server in background thread
        thread::spawn(move || {
            server.run_forever();
        });

        let base_url = format!("http://127.0.0.1:{listen_port}");

        // Wait for server to accept connections
        wait_for_server(&base_url);

        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to build client");

        Self { base_url, client }
    }

    /// Absolute URL for `path` with the given query parameters form-encoded.
    pub fn api_url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        Url::parse_with_params(&format!("{}{}", self.base_url, path), params)
            .expect("invalid test url")
    }

    /// Convenience helper for GET requests.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    /// GET `path` with query parameters.
    pub fn get_with(&self, path: &str, params: &[(&str, &str)]) -> RequestBuilder {
        self.client.get(self.api_url(path, params))
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    pub fn request_with(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
    ) -> RequestBuilder {
        self.client.request(method, self.api_url(path, params))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Wait for the per-request log line of `request_id`.
    pub fn completed_event(&self, request_id: &str) -> CapturedEvent {
        self.completed_event_where(|e| e.field("request_id") == Some(request_id))
    }

    /// Wait for the first per-request log line matching `pred`.
    ///
    /// The logging hook runs after the response is flushed, so this polls.
    pub fn completed_event_where(&self, pred: impl Fn(&CapturedEvent) -> bool) -> CapturedEvent {
        let deadline = Instant::now() + Duration::from_secs(5);

        loop {
            let found = events()
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.field("message") == Some("request completed") && pred(e))
                .cloned();

            if let Some(event) = found {
                return event;
            }
            if Instant::now() > deadline {
                panic!("no matching completion log line");
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    /// Send a bare HTTP/1.1 GET for `path_and_query` and hang up without reading
    /// the response.
    pub fn get_and_disconnect(&self, path_and_query: &str, after: Duration) {
        let addr = self.base_url.strip_prefix("http://").unwrap_or(&self.base_url);
        let mut stream = TcpStream::connect(addr).expect("failed to connect to exurl");

        let request = format!("GET {path_and_query} HTTP/1.1\r\nHost: {addr}\r\n\r\n");
        stream
            .write_all(request.as_bytes())
            .expect("failed to send request");

        thread::sleep(after);
        let _ = stream.shutdown(Shutdown::Both);
    }
}

/// Poll until the server responds (or panic).
fn wait_for_server(listen_addr: &str) {
    let addr = listen_addr.strip_prefix("http://").unwrap_or(listen_addr);

    let deadline = Instant::now() + Duration::from_secs(2);

    loop {
        match TcpStream::connect(addr) {
            Ok(_) => return,
            Err(_) => {
                if Instant::now() > deadline {
                    panic!("server failed to start at {}", listen_addr);
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

static EVENTS: OnceLock<Arc<Mutex<Vec<CapturedEvent>>>> = OnceLock::new();

fn events() -> Arc<Mutex<Vec<CapturedEvent>>> {
    EVENTS
        .get_or_init(|| Arc::new(Mutex::new(Vec::new())))
        .clone()
}

/// Allocate a free port on localhost.
/// This is required to avoid port collisions when running tests in parallel.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
