//! Alert delivery collaborator.
//!
//! # Responsibilities
//! - Define the alert message shape and delivery contract
//! - Provide the SendGrid-backed client used in production
//! - Provide a disabled client for deployments without a credential
//!
//! # Design Decisions
//! - Delivery is fire-and-forget from the caller's point of view
//! - No retries: a failed delivery is reported once and dropped

pub mod sendgrid;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use sendgrid::SendGridClient;

/// Alert built from a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Errors returned by alert delivery.
#[derive(Debug, Error)]
pub enum AlertError {
    /// The request never got a response.
    #[error("alert transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("alert rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers alert messages.
#[async_trait]
pub trait AlertClient: Send + Sync {
    async fn send(&self, message: &AlertMessage) -> Result<(), AlertError>;
}

/// Client used when alerting is switched off or has no credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAlerts;

#[async_trait]
impl AlertClient for DisabledAlerts {
    async fn send(&self, message: &AlertMessage) -> Result<(), AlertError> {
        tracing::debug!(subject = %message.subject, "Alerting disabled, dropping alert");
        Ok(())
    }
}
