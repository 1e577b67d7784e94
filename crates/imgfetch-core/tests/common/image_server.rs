//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of routes keyed by path. Each connection gets one
//! response and is then closed, so responses without `Content-Length` end at
//! connection close.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How the `Content-Length` header is sent.
#[derive(Debug, Clone, Copy)]
pub enum Length {
    /// Actual body length.
    Actual,
    /// Header omitted; body ends at connection close.
    Omitted,
    /// Declared value regardless of the body.
    Declared(u64),
}

#[derive(Debug, Clone)]
pub struct Route {
    pub status: &'static str,
    pub content_type: Option<&'static str>,
    pub length: Length,
    pub extra_headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Sleep this long after reading the request, before answering.
    pub stall: Option<Duration>,
}

impl Route {
    /// 200 OK with the given content type and body.
    pub fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Route {
            status: "200 OK",
            content_type: Some(content_type),
            length: Length::Actual,
            extra_headers: Vec::new(),
            body,
            stall: None,
        }
    }

    pub fn status(status: &'static str) -> Self {
        Route {
            status,
            content_type: Some("text/html"),
            length: Length::Actual,
            extra_headers: Vec::new(),
            body: b"<html>error</html>".to_vec(),
            stall: None,
        }
    }

    pub fn redirect(location: &str) -> Self {
        Route {
            status: "302 Found",
            content_type: None,
            length: Length::Actual,
            extra_headers: vec![("Location".to_string(), location.to_string())],
            body: Vec::new(),
            stall: None,
        }
    }

    pub fn with_length(mut self, length: Length) -> Self {
        self.length = length;
        self
    }

    pub fn with_stall(mut self, stall: Duration) -> Self {
        self.stall = Some(stall);
        self
    }
}

/// Fake PNG payload of `len` bytes; `seed` varies the content.
pub fn png_bytes(len: usize, seed: u8) -> Vec<u8> {
    let mut v = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    v.extend((0..len.saturating_sub(8)).map(|i| (i as u8).wrapping_add(seed)));
    v.truncate(len);
    v
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// A URL on a port nothing listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/gone.png", port)
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(path) = read_request_path(&mut stream) else {
        return;
    };

    let route = match routes.get(&path) {
        Some(r) => r.clone(),
        None => Route::status("404 Not Found"),
    };

    if let Some(stall) = route.stall {
        thread::sleep(stall);
        return;
    }

    let mut head = format!("HTTP/1.1 {}\r\nConnection: close\r\n", route.status);
    if let Some(ct) = route.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", ct));
    }
    match route.length {
        Length::Actual => head.push_str(&format!("Content-Length: {}\r\n", route.body.len())),
        Length::Declared(n) => head.push_str(&format!("Content-Length: {}\r\n", n)),
        Length::Omitted => {}
    }
    for (k, v) in &route.extra_headers {
        head.push_str(&format!("{}: {}\r\n", k, v));
    }
    head.push_str("\r\n");

    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
    let _ = stream.flush();
}

/// Reads the request head and returns the path without query string.
fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let request = String::from_utf8_lossy(&buf);
    let target = request.lines().next()?.split_whitespace().nth(1)?;
    let path = target.split('?').next().unwrap_or(target);
    Some(path.to_string())
}
