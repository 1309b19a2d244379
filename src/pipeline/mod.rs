//! Error pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! handler / middleware / fallback returns Err(Failure)
//!     → failure.rs (placeholder response carrying the Failure)
//!     → layer.rs (route_failures picks it up)
//!     → stages.rs: logging → alerting → classification → default
//!     → response sent to client
//! ```
//!
//! # Design Decisions
//! - Stages run strictly in order within a request
//! - The chain always terminates: only 404 or 500 come out of it
//! - Logging happens before any response leaves the service

pub mod error_log;
pub mod failure;
pub mod layer;
pub mod stages;

use std::sync::Arc;

use axum::response::Response;

use crate::alerts::AlertClient;
use crate::observability::metrics;

pub use error_log::{ErrorLog, LogEntry};
pub use failure::{Classification, Failure, FailureSnapshot};
pub use layer::{panic_failure, route_failures};
pub use stages::{
    AlertTemplate, AlertingStage, ClassificationStage, DefaultStage, Flow, LoggingStage, Stage,
};

/// Ordered chain of error stages.
#[derive(Clone)]
pub struct ErrorPipeline {
    stages: Arc<[Box<dyn Stage>]>,
}

impl ErrorPipeline {
    /// Pipeline over an explicit stage list.
    ///
    /// If no stage terminates, the default 500 response is used.
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self {
            stages: stages.into(),
        }
    }

    /// The production chain: log, alert, classify, default.
    pub fn standard(log: ErrorLog, alerts: Arc<dyn AlertClient>, template: AlertTemplate) -> Self {
        Self::new(vec![
            Box::new(LoggingStage::new(log)),
            Box::new(AlertingStage::new(alerts, template)),
            Box::new(ClassificationStage),
            Box::new(DefaultStage),
        ])
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run a failure through the chain and return the terminal response.
    pub fn run(&self, failure: Failure) -> Response {
        metrics::record_failure(failure.classification());

        for stage in self.stages.iter() {
            match stage.handle(&failure) {
                Flow::Forward => {
                    tracing::trace!(stage = stage.name(), "Failure forwarded");
                }
                Flow::Respond(response) => {
                    tracing::warn!(
                        stage = stage.name(),
                        name = %failure.name(),
                        message = %failure.message(),
                        status = response.status().as_u16(),
                        "Request failed"
                    );
                    return response;
                }
            }
        }

        DefaultStage::respond(&failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertError, AlertMessage};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingAlerts {
        sent: Mutex<Vec<AlertMessage>>,
    }

    #[async_trait]
    impl AlertClient for RecordingAlerts {
        async fn send(&self, message: &AlertMessage) -> Result<(), AlertError> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    struct FailingAlerts;

    #[async_trait]
    impl AlertClient for FailingAlerts {
        async fn send(&self, _message: &AlertMessage) -> Result<(), AlertError> {
            Err(AlertError::Rejected {
                status: 503,
                body: "unavailable".into(),
            })
        }
    }

    fn template() -> AlertTemplate {
        AlertTemplate {
            to: "ops@example.com".into(),
            from: "alerts@example.com".into(),
            subject: "You Experienced an Error".into(),
            html: String::new(),
        }
    }

    fn log_records(log: &ErrorLog) -> usize {
        std::fs::read_to_string(log.path())
            .unwrap_or_default()
            .split(error_log::RECORD_SEPARATOR)
            .filter(|r| !r.is_empty())
            .count()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_standard_stage_order() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ErrorPipeline::standard(
            ErrorLog::new(dir.path().join("errors.log")),
            Arc::new(RecordingAlerts::default()),
            template(),
        );
        assert_eq!(
            pipeline.stage_names(),
            vec!["logging", "alerting", "classification", "default"]
        );
    }

    #[tokio::test]
    async fn test_not_found_is_logged_alerted_and_404() {
        let dir = tempfile::tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("errors.log"));
        let alerts = Arc::new(RecordingAlerts::default());
        let pipeline = ErrorPipeline::standard(log.clone(), alerts.clone(), template());

        let response = pipeline.run(Failure::not_found("Page not found on this path: /x"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Page not found on this path: /x");
        assert_eq!(log_records(&log), 1);

        for _ in 0..50 {
            if !alerts.sent.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let sent = alerts.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.starts_with("Page not found on this path: /x\n"));
    }

    #[tokio::test]
    async fn test_unclassified_is_500_with_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("errors.log"));
        let pipeline =
            ErrorPipeline::standard(log.clone(), Arc::new(RecordingAlerts::default()), template());

        let response = pipeline.run(Failure::unclassified("Error", ""));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, stages::SERVER_FALLBACK);
        assert_eq!(log_records(&log), 1);
    }

    #[tokio::test]
    async fn test_alert_failure_does_not_change_response() {
        let dir = tempfile::tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("errors.log"));
        let pipeline = ErrorPipeline::standard(log.clone(), Arc::new(FailingAlerts), template());

        let response = pipeline.run(Failure::unclassified("Error", "boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "boom");
    }

    #[tokio::test]
    async fn test_each_failure_logged_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("errors.log"));
        let pipeline =
            ErrorPipeline::standard(log.clone(), Arc::new(RecordingAlerts::default()), template());

        pipeline.run(Failure::not_found("a"));
        pipeline.run(Failure::unclassified("Error", "b"));
        pipeline.run(Failure::unclassified("ParseError", "c"));
        assert_eq!(log_records(&log), 3);
    }

    #[test]
    fn test_empty_chain_falls_back_to_500() {
        let pipeline = ErrorPipeline::new(Vec::new());
        let response = pipeline.run(Failure::not_found("x"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
