//! Structured log records: request lines, business events, panic reports.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing_subscriber::layer::SubscriberExt;

use tasktrack_server::app_state::AppState;
use tasktrack_server::config::ServerConfig;
use tasktrack_server::obs::logging::{install_panic_hook, json_layer};
use tasktrack_server::router::build_router;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn records(&self) -> Vec<Value> {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }
}

fn capture_default() -> (Capture, tracing::subscriber::DefaultGuard) {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::registry().with(json_layer(move || writer.clone()));
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}

fn find<'a>(records: &'a [Value], message: &str) -> Vec<&'a Value> {
    records.iter().filter(|r| r["message"] == message).collect()
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::USER_AGENT, "tasktrack-test/1");
    let body = match body {
        Some(v) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let mut req = req.body(body).unwrap();
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn request_record_carries_the_http_fields() {
    let (capture, _guard) = capture_default();
    let app = build_router(AppState::new(ServerConfig::default()).unwrap());

    let (status, _) = send(&app, Method::POST, "/api/tasks", Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let records = capture.records();
    let http = find(&records, "HTTP Request");
    assert_eq!(http.len(), 1, "records: {records:#?}");
    let r = http[0];
    assert_eq!(r["level"], "INFO");
    assert!(r["timestamp"].is_string());
    assert_eq!(r["method"], "POST");
    assert_eq!(r["path"], "/api/tasks");
    assert_eq!(r["statusCode"], 201);
    assert!(r["duration"].is_u64());
    assert_eq!(r["userAgent"], "tasktrack-test/1");
    assert_eq!(r["ip"], "127.0.0.1");
}

#[tokio::test]
async fn task_lifecycle_emits_business_events() {
    let (capture, _guard) = capture_default();
    let app = build_router(AppState::new(ServerConfig::default()).unwrap());

    let (_, body) = send(&app, Method::POST, "/api/tasks", Some(json!({ "title": "ship it" }))).await;
    let id = serde_json::from_slice::<Value>(&body).unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/tasks/{id}");
    send(&app, Method::PUT, &uri, Some(json!({ "completed": true }))).await;
    send(&app, Method::PUT, &uri, Some(json!({ "completed": false }))).await;
    send(&app, Method::DELETE, &uri, None).await;

    let records = capture.records();
    let events: Vec<(&str, &Value)> = records
        .iter()
        .filter_map(|r| Some((r["businessEvent"].as_str()?, r)))
        .collect();
    let names: Vec<&str> = events.iter().map(|(e, _)| *e).collect();
    assert_eq!(
        names,
        vec!["task_created", "task_completed", "task_reopened", "task_deleted"]
    );
    for (_, r) in &events {
        assert_eq!(r["taskId"], id.as_str());
        assert_eq!(r["level"], "INFO");
    }
    assert_eq!(events[0].1["title"], "ship it");
    assert_eq!(events[1].1["completed"], true);
    assert_eq!(events[2].1["completed"], false);
}

#[test]
fn panic_hook_logs_location_and_backtrace() {
    let (capture, _guard) = capture_default();
    install_panic_hook();
    let caught = std::panic::catch_unwind(|| panic!("handler exploded"));
    let _ = std::panic::take_hook();
    assert!(caught.is_err());

    let records = capture.records();
    let panics = find(&records, "panic in request handling");
    assert_eq!(panics.len(), 1, "records: {records:#?}");
    let r = panics[0];
    assert_eq!(r["level"], "ERROR");
    assert!(r["panic"].as_str().unwrap().contains("handler exploded"));
    assert!(r["location"].as_str().unwrap().contains("log_records.rs"));
    let backtrace = r["backtrace"].as_str().unwrap();
    assert!(!backtrace.is_empty());
    assert_ne!(backtrace, "disabled backtrace");
}
