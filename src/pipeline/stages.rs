//! The four error pipeline stages.
//!
//! # State Transitions
//! ```text
//! Logging → Alerting → Classifying → Responding
//!                           └──────→ Default → Responding
//! ```

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::alerts::{AlertClient, AlertMessage};
use crate::config::AlertConfig;
use crate::observability::metrics;
use crate::pipeline::error_log::{ErrorLog, LogEntry};
use crate::pipeline::failure::{Classification, Failure};

/// Body used for a not-found failure with an empty message.
pub const NOT_FOUND_FALLBACK: &str = "Oops! Resource not found";

/// Body used for a server failure with an empty message.
pub const SERVER_FALLBACK: &str = "Oops! Server failed";

/// Alert text used for a failure with an empty message.
pub const ALERT_FALLBACK: &str = "Oops! Error Occured";

/// What a stage decided to do with a failure.
pub enum Flow {
    /// Hand the unchanged failure to the next stage.
    Forward,
    /// Terminate the chain with this response.
    Respond(Response),
}

/// One step of the error pipeline.
///
/// Stages only read the failure; they never change it.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    fn handle(&self, failure: &Failure) -> Flow;
}

/// Appends every failure to the error log.
pub struct LoggingStage {
    log: ErrorLog,
}

impl LoggingStage {
    pub fn new(log: ErrorLog) -> Self {
        Self { log }
    }
}

impl Stage for LoggingStage {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn handle(&self, failure: &Failure) -> Flow {
        match self.log.append(&LogEntry::new(failure, Utc::now())) {
            Ok(()) => metrics::record_error_log_write("ok"),
            Err(e) => {
                metrics::record_error_log_write("error");
                tracing::error!(
                    path = %self.log.path().display(),
                    error = %e,
                    "Failed to append to error log"
                );
            }
        }
        Flow::Forward
    }
}

/// Fixed parts of every alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertTemplate {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub html: String,
}

impl AlertTemplate {
    /// Message text is the failure message followed by its JSON snapshot.
    pub fn render(&self, failure: &Failure) -> AlertMessage {
        let mut text = failure.message_or(ALERT_FALLBACK).to_string();
        text.push('\n');
        match failure.snapshot().to_pretty_json() {
            Ok(json) => text.push_str(&String::from_utf8_lossy(&json)),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize failure for alert"),
        }

        AlertMessage {
            to: self.to.clone(),
            from: self.from.clone(),
            subject: self.subject.clone(),
            text,
            html: self.html.clone(),
        }
    }
}

impl From<&AlertConfig> for AlertTemplate {
    fn from(config: &AlertConfig) -> Self {
        Self {
            to: config.to.clone(),
            from: config.from.clone(),
            subject: config.subject.clone(),
            html: config.html.clone(),
        }
    }
}

/// Dispatches an alert without waiting for delivery.
pub struct AlertingStage {
    client: Arc<dyn AlertClient>,
    template: AlertTemplate,
}

impl AlertingStage {
    pub fn new(client: Arc<dyn AlertClient>, template: AlertTemplate) -> Self {
        Self { client, template }
    }
}

impl Stage for AlertingStage {
    fn name(&self) -> &'static str {
        "alerting"
    }

    fn handle(&self, failure: &Failure) -> Flow {
        let message = self.template.render(failure);

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(error = %e, "No runtime available, alert not sent");
                metrics::record_alert("skipped");
                return Flow::Forward;
            }
        };

        let client = Arc::clone(&self.client);
        runtime.spawn(async move {
            match client.send(&message).await {
                Ok(()) => {
                    metrics::record_alert("sent");
                    tracing::debug!(to = %message.to, "Alert delivered");
                }
                Err(e) => {
                    metrics::record_alert("failed");
                    tracing::error!(to = %message.to, error = %e, "Alert delivery failed");
                }
            }
        });

        Flow::Forward
    }
}

/// Responds 404 for not-found failures.
pub struct ClassificationStage;

impl Stage for ClassificationStage {
    fn name(&self) -> &'static str {
        "classification"
    }

    fn handle(&self, failure: &Failure) -> Flow {
        match failure.classification() {
            Classification::NotFound => Flow::Respond(
                (
                    StatusCode::NOT_FOUND,
                    failure.message_or(NOT_FOUND_FALLBACK).to_string(),
                )
                    .into_response(),
            ),
            Classification::Unclassified => Flow::Forward,
        }
    }
}

/// Always responds 500.
pub struct DefaultStage;

impl DefaultStage {
    pub fn respond(failure: &Failure) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            failure.message_or(SERVER_FALLBACK).to_string(),
        )
            .into_response()
    }
}

impl Stage for DefaultStage {
    fn name(&self) -> &'static str {
        "default"
    }

    fn handle(&self, failure: &Failure) -> Flow {
        Flow::Respond(Self::respond(failure))
    }
}
