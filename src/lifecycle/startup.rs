//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a validated config into concrete collaborators
//! - Decide whether alerts go out or are dropped
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Missing alert credential downgrades to disabled alerts, never fails

use std::sync::Arc;

use url::Url;

use crate::alerts::{AlertClient, DisabledAlerts, SendGridClient};
use crate::config::{AlertConfig, ServiceConfig};
use crate::http::Collaborators;
use crate::pipeline::ErrorLog;
use crate::store::FileRecordSource;

/// Build the production collaborators described by `config`.
pub fn collaborators(config: &ServiceConfig) -> Result<Collaborators, url::ParseError> {
    let records = Arc::new(FileRecordSource::new(&config.store.records_path));
    let error_log = ErrorLog::new(&config.error_log.path);
    let alerts = alert_client(&config.alerts)?;

    tracing::info!(
        records_path = %config.store.records_path.display(),
        error_log = %config.error_log.path.display(),
        "Collaborators initialized"
    );

    Ok(Collaborators {
        records,
        alerts,
        error_log,
    })
}

fn alert_client(config: &AlertConfig) -> Result<Arc<dyn AlertClient>, url::ParseError> {
    if !config.enabled {
        tracing::info!("Alerting disabled by configuration");
        return Ok(Arc::new(DisabledAlerts));
    }

    match config.api_key.as_deref() {
        Some(key) => {
            let endpoint = Url::parse(&config.endpoint)?;
            tracing::info!(endpoint = %endpoint, to = %config.to, "Alert delivery enabled");
            Ok(Arc::new(SendGridClient::new(endpoint, key)))
        }
        None => {
            tracing::warn!("No alert API key configured, alerts will be dropped");
            Ok(Arc::new(DisabledAlerts))
        }
    }
}
