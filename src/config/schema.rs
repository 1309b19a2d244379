//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::alerts::sendgrid::DEFAULT_ENDPOINT;

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// User record store location.
    pub store: StoreConfig,

    /// Error log location.
    pub error_log: ErrorLogConfig,

    /// Alert delivery settings.
    pub alerts: AlertConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Largest request body the validation stage will buffer.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            max_body_bytes: 100 * 1024,
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the JSON document of user records.
    pub records_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            records_path: PathBuf::from("data.json"),
        }
    }
}

/// Error log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorLogConfig {
    /// Append-only file receiving one entry per failure.
    pub path: PathBuf,
}

impl Default for ErrorLogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("errors.log"),
        }
    }
}

/// Alert delivery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Send alerts for pipeline failures.
    pub enabled: bool,

    /// Mail-send endpoint.
    pub endpoint: String,

    /// Recipient address.
    pub to: String,

    /// Sender address.
    pub from: String,

    /// Subject line.
    pub subject: String,

    /// HTML part of the message.
    pub html: String,

    /// API credential. Normally supplied through `SENDGRID_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            to: "ops@example.com".to_string(),
            from: "alerts@example.com".to_string(),
            subject: "You Experienced an Error".to_string(),
            html: "<strong>An unhandled error was recorded by the auth service.</strong>"
                .to_string(),
            api_key: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the pretty format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
