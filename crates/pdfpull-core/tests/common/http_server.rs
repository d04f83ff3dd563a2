//! Minimal HTTP/1.1 server for integration tests.
//!
//! Routes are keyed by the last path segment of the request target, so the
//! same server also works as a forward proxy (absolute-form targets). Every
//! request is recorded with its headers.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Route {
    /// 200 with this body.
    Body(Vec<u8>),
    /// Bare status with a short text body.
    Status(u16),
    /// 302 to the given path.
    Redirect(String),
    /// Accept the request, then say nothing for this long.
    Stall(Duration),
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request target exactly as sent (origin-form or absolute-form).
    pub target: String,
    /// Header names lowercased.
    pub headers: HashMap<String, String>,
}

#[derive(Clone)]
pub struct TestServer {
    pub base: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Request targets in arrival order.
    pub fn targets(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.target).collect()
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(name, route)| (name.to_string(), route))
            .collect(),
    );
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let recorded = Arc::clone(&recorded);
            thread::spawn(move || handle(stream, &routes, &recorded));
        }
    });
    TestServer {
        base: format!("http://127.0.0.1:{}/", port),
        requests,
    }
}

/// A URL on a port nothing listens on (connection refused).
pub fn closed_port_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/{}", port, path)
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, Route>,
    recorded: &Mutex<Vec<RecordedRequest>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let head = match read_head(&mut stream) {
        Some(h) => h,
        None => return,
    };
    let request = parse_head(&head);
    let name = request
        .target
        .split('?')
        .next()
        .unwrap_or("")
        .rsplit('/')
        .next()
        .unwrap_or("")
        .to_string();
    recorded.lock().unwrap().push(request);

    match routes.get(&name) {
        Some(Route::Body(body)) => respond(&mut stream, "200 OK", &[], body),
        Some(Route::Status(code)) => {
            let status = format!("{} Error", code);
            respond(&mut stream, &status, &[], b"error page")
        }
        Some(Route::Redirect(location)) => {
            let header = format!("Location: {}", location);
            respond(&mut stream, "302 Found", &[header], b"")
        }
        Some(Route::Stall(d)) => thread::sleep(*d),
        None => respond(&mut stream, "404 Not Found", &[], b"not found"),
    }
}

fn respond(stream: &mut TcpStream, status: &str, extra: &[String], body: &[u8]) {
    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        body.len()
    );
    for line in extra {
        head.push_str(line);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
    }
    String::from_utf8(data).ok()
}

fn parse_head(head: &str) -> RecordedRequest {
    let mut lines = head.lines();
    let target = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("")
        .to_string();
    let headers = lines
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    RecordedRequest { target, headers }
}
