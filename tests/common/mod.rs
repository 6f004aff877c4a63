//! Minimal canned-response HTTP server for exercising the gateway and the
//! CLI end-to-end without a real backend.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread;

pub struct Route {
    pub method: &'static str,
    pub path: &'static str,
    pub status: u16,
    pub body: String,
}

pub struct StubServer {
    pub addr: SocketAddr,
}

impl StubServer {
    /// Base URL shaped like the real deployment, with the /api prefix
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }
}

/// Wrap a payload in the standard response envelope
pub fn envelope(data: serde_json::Value) -> String {
    serde_json::json!({ "success": true, "message": "ok", "data": data }).to_string()
}

pub fn rejection(message: &str) -> String {
    serde_json::json!({ "success": false, "message": message, "data": null }).to_string()
}

/// Start a server answering the given routes; unmatched requests get 404.
/// The listener thread lives for the rest of the test process.
pub fn serve(routes: Vec<Route>) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let Some((method, path)) = read_request(&mut stream) else {
                continue;
            };

            let hit = routes
                .iter()
                .find(|r| r.method == method && r.path == path);
            let (status, body) = match hit {
                Some(r) => (r.status, r.body.clone()),
                None => (404, rejection("not found")),
            };

            let reason = match status {
                200 => "OK",
                201 => "Created",
                400 => "Bad Request",
                401 => "Unauthorized",
                _ => "Error",
            };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    StubServer { addr }
}

/// Read one request (headers plus any declared body), returning method and path
fn read_request(stream: &mut std::net::TcpStream) -> Option<(String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        match stream.read(&mut chunk) {
            Ok(0) => return None,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = find(&buf, b"\r\n\r\n") {
                    break pos;
                }
            }
            Err(_) => return None,
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head.lines().find_map(|line| {
        let lowered = line.to_ascii_lowercase();
        lowered
            .strip_prefix("content-length:")
            .and_then(|v| v.trim().parse::<usize>().ok())
    });

    // Drain the body so the client never blocks mid-write
    if let Some(len) = content_length {
        let mut remaining = len.saturating_sub(buf.len() - (header_end + 4));
        while remaining > 0 {
            match stream.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(n) => remaining = remaining.saturating_sub(n),
            }
        }
    }

    let request_line = head.lines().next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();
    Some((method, path))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
