use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::process::{Child, Command};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

// Use atomic counter to give each test a unique port
static PORT_COUNTER: AtomicU16 = AtomicU16::new(9400);

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct HealthResponse {
    status: String,
    version: String,
    engine_ready: bool,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct InfoResponse {
    version: String,
    primary_language: String,
    secondary_language: String,
    confidence_threshold: f32,
    max_file_size_bytes: usize,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct ErrorResponse {
    error: String,
    code: String,
    message: String,
}

struct TestServer {
    child: Child,
    port: u16,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with_args(&[]).await
    }

    async fn start_with_args(extra: &[&str]) -> Self {
        let port = PORT_COUNTER.fetch_add(1, Ordering::SeqCst);

        let child = Command::new(env!("CARGO_BIN_EXE_handwriting-ocr-server"))
            .args(["--host", "127.0.0.1", "--port", &port.to_string()])
            .args(extra)
            .spawn()
            .expect("Failed to start server");

        let server = Self { child, port };
        server.wait_until_ready().await;
        server
    }

    // Startup includes the first-run model download, so poll instead of
    // sleeping a fixed time
    async fn wait_until_ready(&self) {
        let client = reqwest::Client::new();
        for _ in 0..240 {
            if let Ok(response) = client
                .get(format!("{}/health", self.base_url()))
                .send()
                .await
            {
                if response.status().is_success() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        panic!("server did not become ready");
    }

    fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

fn file_part(bytes: Vec<u8>) -> Part {
    Part::bytes(bytes)
        .file_name("scan.png")
        .mime_str("image/png")
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let response: HealthResponse = client
        .get(format!("{}/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(response.status, "ok");
    assert!(!response.version.is_empty());
}

#[tokio::test]
async fn test_info_endpoint() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let response: InfoResponse = client
        .get(format!("{}/info", server.base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert!(!response.version.is_empty());
    assert_eq!(response.primary_language, "si");
    assert_eq!(response.secondary_language, "en");
    assert!((response.confidence_threshold - 0.3).abs() < 1e-6);
    assert_eq!(response.max_file_size_bytes, 20 * 1024 * 1024);
}

#[tokio::test]
async fn test_recognize_without_file_is_rejected() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let form = Form::new().text("languages", "si,en");

    let response = client
        .post(format!("{}/recognize", server.base_url()))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: ErrorResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(body.code, "MISSING_FILE");
    assert!(body.message.contains("attach"));
}

#[tokio::test]
async fn test_recognize_oversized_file_is_rejected() {
    let server = TestServer::start_with_args(&["--max-file-size", "1024"]).await;
    let client = reqwest::Client::new();

    let form = Form::new().part("file", file_part(vec![0u8; 4096]));

    let response = client
        .post(format!("{}/recognize", server.base_url()))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 413);
    let body: ErrorResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(body.code, "IMAGE_TOO_LARGE");
}

#[tokio::test]
async fn test_recognize_rejects_malformed_languages() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let form = Form::new()
        .part("file", file_part(vec![1, 2, 3, 4]))
        .text("languages", " , ");

    let response = client
        .post(format!("{}/recognize", server.base_url()))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: ErrorResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(body.code, "INVALID_REQUEST");
}
