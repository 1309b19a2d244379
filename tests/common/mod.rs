//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use auth_service::alerts::{AlertClient, AlertError, AlertMessage};
use auth_service::pipeline::ErrorLog;
use auth_service::store::FileRecordSource;
use auth_service::{Collaborators, HttpServer, ServiceConfig};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

/// Alert client that records every message it is asked to send.
#[derive(Default)]
pub struct RecordingAlerts {
    sent: Mutex<Vec<AlertMessage>>,
}

#[async_trait]
impl AlertClient for RecordingAlerts {
    async fn send(&self, message: &AlertMessage) -> Result<(), AlertError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

impl RecordingAlerts {
    pub fn sent(&self) -> Vec<AlertMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Poll until at least `count` alerts arrived or a second has passed.
    pub async fn wait_for(&self, count: usize) -> Vec<AlertMessage> {
        for _ in 0..100 {
            if self.sent.lock().unwrap().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
    }
}

/// A service wired to temporary files and a recording alert client.
pub struct TestService {
    pub dir: TempDir,
    pub alerts: Arc<RecordingAlerts>,
    pub config: ServiceConfig,
}

impl TestService {
    /// Service whose record store holds `records` (a JSON document).
    pub fn with_records(records: &str) -> Self {
        let service = Self::without_store();
        std::fs::write(&service.config.store.records_path, records).unwrap();
        service
    }

    /// Service whose record store file does not exist.
    pub fn without_store() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.store.records_path = dir.path().join("data.json");
        config.error_log.path = dir.path().join("errors.log");

        Self {
            dir,
            alerts: Arc::new(RecordingAlerts::default()),
            config,
        }
    }

    pub fn server(&self) -> HttpServer {
        let collaborators = Collaborators {
            records: Arc::new(FileRecordSource::new(&self.config.store.records_path)),
            alerts: self.alerts.clone(),
            error_log: ErrorLog::new(&self.config.error_log.path),
        };
        HttpServer::new(self.config.clone(), collaborators)
    }

    pub fn router(&self) -> Router {
        self.server().router()
    }

    pub fn log_path(&self) -> PathBuf {
        self.config.error_log.path.clone()
    }

    /// Every entry appended to the error log so far.
    pub fn log_entries(&self) -> Vec<serde_json::Value> {
        std::fs::read_to_string(self.log_path())
            .unwrap_or_default()
            .split("\r\n")
            .filter(|record| !record.trim().is_empty())
            .map(|record| serde_json::from_str(record).unwrap())
            .collect()
    }
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Drive one request through `router` and return status and body text.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}
