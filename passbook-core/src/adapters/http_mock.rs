//! Mock balance server for testing
//!
//! A tiny HTTP server answering `GET /accounts/{id}/balance` with a
//! configured response, so the HTTP provider can be tested without a real
//! balance service.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// What the mock server answers with
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 200 with `{"balance": {"amount": <raw>, "currency": "USD"}}`
    Balance(String),
    /// Given status with an error body
    Status(u16),
    /// 200 with a raw body
    Body(String),
}

#[derive(Debug)]
struct MockState {
    response: MockResponse,
    api_key: Mutex<Option<String>>,
    requests: AtomicUsize,
}

/// Mock balance server
pub struct MockBalanceServer {
    port: u16,
    state: Arc<MockState>,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockBalanceServer {
    /// Start a new mock server on a random available port
    pub fn start(response: MockResponse) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let state = Arc::new(MockState {
            response,
            api_key: Mutex::new(None),
            requests: AtomicUsize::new(0),
        });
        let state_clone = state.clone();

        // Set listener to non-blocking for graceful shutdown
        listener.set_nonblocking(true)?;

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let state = state_clone.clone();
                        thread::spawn(move || handle_connection(stream, &state));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            state,
            running,
            thread_handle: Some(thread_handle),
        })
    }

    /// Reject requests whose `x-api-key` header is not `key`
    pub fn require_api_key(self, key: &str) -> Self {
        if let Ok(mut api_key) = self.state.api_key.lock() {
            *api_key = Some(key.to_string());
        }
        self
    }

    /// Get the base URL for this mock server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Number of balance requests served
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockBalanceServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream, state: &MockState) {
    // Accepted sockets inherit non-blocking mode on some platforms
    let _ = stream.set_nonblocking(false);
    let mut buffer = [0; 4096];

    let Ok(n) = stream.read(&mut buffer) else {
        return;
    };
    let request = String::from_utf8_lossy(&buffer[..n]);

    let first_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        send_response(&mut stream, 400, r#"{"error": "Invalid request"}"#);
        return;
    }
    let (method, path) = (parts[0], parts[1]);

    let required_key = state.api_key.lock().ok().and_then(|k| k.clone());
    if let Some(key) = required_key {
        let expected = format!("x-api-key: {}", key.to_lowercase());
        if !request.to_lowercase().contains(&expected) {
            send_response(&mut stream, 401, r#"{"error": "Invalid API key"}"#);
            return;
        }
    }

    if method != "GET" || !path.starts_with("/accounts/") || !path.ends_with("/balance") {
        send_response(&mut stream, 404, r#"{"error": "Endpoint not found"}"#);
        return;
    }

    state.requests.fetch_add(1, Ordering::SeqCst);
    match &state.response {
        MockResponse::Balance(amount) => {
            let body = format!(r#"{{"balance": {{"amount": {}, "currency": "USD"}}}}"#, amount);
            send_response(&mut stream, 200, &body);
        }
        MockResponse::Status(status) => {
            send_response(&mut stream, *status, r#"{"error": "Unavailable"}"#);
        }
        MockResponse::Body(body) => send_response(&mut stream, 200, body),
    }
}

fn send_response(stream: &mut TcpStream, status: u16, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text(status),
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
