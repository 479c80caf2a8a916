use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

/// Size of the `/big` body.
pub const BIG_BODY_LEN: usize = 256 * 1024;

/// Body of `/chunked`, sent in `CHUNK_SIZE` pieces.
pub const CHUNKED_BODY: &str = "one chunk, then another, then the last one\n";
const CHUNK_SIZE: usize = 7;

/// Plain HTTP/1.1 upstream with a fixed script of paths.
///
/// Every reply closes its connection and echoes the request method in
/// `X-Seen-Method`. Paths:
/// - `/ok`: 200 text/plain "hello world"
/// - `/image.png`: 200 image/png
/// - `/teapot`: 418
/// - `/hop/{n}`: relative 302 to `/hop/{n-1}`, 200 "arrived" at zero
/// - `/loop`: 302 to itself
/// - `/abs`: 301 with an absolute Location to `/ok`
/// - `/no-location`: 302 without Location
/// - `/bad-location`: 302 to an ftp URL
/// - `/nolength`: 200 delimited by connection close
/// - `/chunked`: 200 with `Transfer-Encoding: chunked`, `CHUNKED_BODY` split over several chunks
/// - `/empty`: 200 with an explicit zero length
/// - `/hopheaders`: 200 carrying hop-by-hop and caching headers
/// - `/files/report%20final.pdf`: 200 application/pdf
/// - `/slow`: 200 after two seconds
/// - `/big`: 200 with `BIG_BODY_LEN` bytes
/// - anything else: 404
pub struct ScriptedUpstream {
    port: u16,
}

impl ScriptedUpstream {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind upstream");
        let port = listener.local_addr().expect("upstream address").port();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                thread::spawn(move || serve(stream, port));
            }
        });

        Self { port }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

struct Reply {
    status: u16,
    reason: &'static str,
    headers: Vec<(&'static str, String)>,
    body: Vec<u8>,
    content_length: bool,
    chunked: bool,
    delay: Option<Duration>,
}

impl Reply {
    fn new(status: u16, reason: &'static str) -> Self {
        Self {
            status,
            reason,
            headers: Vec::new(),
            body: Vec::new(),
            content_length: true,
            chunked: false,
            delay: None,
        }
    }

    fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    fn body(mut self, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self.header("Content-Type", content_type)
    }
}

fn serve(mut stream: TcpStream, port: u16) {
    let Some((method, path)) = read_request_head(&stream) else {
        return;
    };

    let reply = route(&path, port).header("X-Seen-Method", method.clone());

    if let Some(delay) = reply.delay {
        thread::sleep(delay);
    }

    let _ = write_reply(&mut stream, &method, &reply);
}

fn read_request_head(stream: &TcpStream) -> Option<(String, String)> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;

    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?;
    let path = target.split('?').next().unwrap_or(target).to_string();

    // Drain the remaining header lines.
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).ok()?;
        if n == 0 || line == "\r\n" || line == "\n" {
            break;
        }
    }

    Some((method, path))
}

fn route(path: &str, port: u16) -> Reply {
    if let Some(n) = path.strip_prefix("/hop/") {
        return match n.parse::<u32>() {
            Ok(0) => Reply::new(200, "OK").body("text/plain", "arrived"),
            Ok(n) => Reply::new(302, "Found").header("Location", format!("/hop/{}", n - 1)),
            Err(_) => Reply::new(404, "Not Found"),
        };
    }

    match path {
        "/ok" => Reply::new(200, "OK")
            .header("X-Upstream", "scripted")
            .body("text/plain", "hello world"),

        "/image.png" => Reply::new(200, "OK").body("image/png", b"\x89PNG\r\n\x1a\n".to_vec()),

        "/teapot" => Reply::new(418, "I'm a teapot").body("text/plain", "short and stout"),

        "/loop" => Reply::new(302, "Found").header("Location", "/loop"),

        "/abs" => Reply::new(301, "Moved Permanently")
            .header("Location", format!("http://127.0.0.1:{port}/ok")),

        "/no-location" => Reply::new(302, "Found"),

        "/bad-location" => Reply::new(302, "Found").header("Location", "ftp://example.com/file"),

        "/nolength" => {
            let mut reply = Reply::new(200, "OK").body("text/plain", "streamed until close");
            reply.content_length = false;
            reply
        }

        "/chunked" => {
            let mut reply = Reply::new(200, "OK").body("text/plain", CHUNKED_BODY);
            reply.content_length = false;
            reply.chunked = true;
            reply
        }

        "/empty" => Reply::new(200, "OK"),

        "/hopheaders" => Reply::new(200, "OK")
            .header("Keep-Alive", "timeout=5")
            .header("Proxy-Authenticate", "Basic")
            .header("Trailer", "X-Checksum")
            .header("Cache-Control", "max-age=3600")
            .header("Access-Control-Allow-Origin", "https://only.example")
            .header("X-Kept", "yes")
            .body("text/plain", "ok"),

        "/files/report%20final.pdf" => Reply::new(200, "OK").body("application/pdf", "%PDF-1.4"),

        "/slow" => {
            let mut reply = Reply::new(200, "OK").body("text/plain", "late");
            reply.delay = Some(Duration::from_secs(2));
            reply
        }

        "/big" => Reply::new(200, "OK").body(
            "application/octet-stream",
            (0..BIG_BODY_LEN).map(|i| (i % 251) as u8).collect::<Vec<u8>>(),
        ),

        _ => Reply::new(404, "Not Found").body("text/plain", "not found"),
    }
}

fn write_reply(stream: &mut TcpStream, method: &str, reply: &Reply) -> std::io::Result<()> {
    let mut head = format!("HTTP/1.1 {} {}\r\n", reply.status, reply.reason);
    for (name, value) in &reply.headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    if reply.content_length {
        head.push_str(&format!("Content-Length: {}\r\n", reply.body.len()));
    }
    if reply.chunked {
        head.push_str("Transfer-Encoding: chunked\r\n");
    }
    head.push_str("Connection: close\r\n\r\n");

    stream.write_all(head.as_bytes())?;
    if method == "HEAD" {
        return stream.flush();
    }

    if reply.chunked {
        for chunk in reply.body.chunks(CHUNK_SIZE) {
            stream.write_all(format!("{:x}\r\n", chunk.len()).as_bytes())?;
            stream.write_all(chunk)?;
            stream.write_all(b"\r\n")?;
            stream.flush()?;
        }
        stream.write_all(b"0\r\n\r\n")?;
    } else {
        stream.write_all(&reply.body)?;
    }
    stream.flush()
}
