//! Validation middleware placed in front of the route handlers.
//!
//! A non-empty error list short-circuits with 422. Anything that is not a
//! client mistake (body or store trouble) becomes a `Failure` for the
//! error pipeline.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::observability::metrics;
use crate::pipeline::Failure;
use crate::store::{RecordSource, StoreError};
use crate::validation::rules::{validate_login, validate_registration, FieldError};
use crate::validation::Credentials;

/// State shared by the validation middleware.
#[derive(Clone)]
pub struct Gate {
    records: Arc<dyn RecordSource>,
    max_body_bytes: usize,
}

impl Gate {
    pub fn new(records: Arc<dyn RecordSource>, max_body_bytes: usize) -> Self {
        Self {
            records,
            max_body_bytes,
        }
    }

    /// Buffer the body, decode credentials, and hand back the pieces needed
    /// to rebuild the request for the next layer.
    async fn read_credentials(
        &self,
        request: Request,
    ) -> Result<(Parts, Credentials, Bytes), Failure> {
        let (parts, body) = request.into_parts();
        let bytes = axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(crate::validation::BodyError::from)?;

        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        let credentials = Credentials::from_body(content_type, &bytes)?;

        Ok((parts, credentials, bytes))
    }
}

/// Registration gate: blocking store read, uniqueness and password checks.
pub async fn registration_gate(
    State(gate): State<Gate>,
    request: Request,
    next: Next,
) -> Result<Response, Failure> {
    let (parts, credentials, body) = gate.read_credentials(request).await?;

    let store = gate.records.load_blocking()?;
    let errors = validate_registration(&credentials, &store);
    if !errors.is_empty() {
        return Ok(reject("register", errors));
    }

    Ok(next.run(Request::from_parts(parts, Body::from(body))).await)
}

/// Login gate: async store read and email lookup.
///
/// A read failure is reported to the client as a field error; a store that
/// reads but does not parse is a server fault.
pub async fn login_gate(
    State(gate): State<Gate>,
    request: Request,
    next: Next,
) -> Result<Response, Failure> {
    let (parts, credentials, body) = gate.read_credentials(request).await?;

    let errors = match gate.records.load().await {
        Ok(store) => validate_login(&credentials, Some(&store)),
        Err(err @ StoreError::Read { .. }) => {
            tracing::error!(error = %err, "Record store unavailable during login");
            validate_login(&credentials, None)
        }
        Err(err @ StoreError::Parse { .. }) => return Err(err.into()),
    };
    if !errors.is_empty() {
        return Ok(reject("login", errors));
    }

    Ok(next.run(Request::from_parts(parts, Body::from(body))).await)
}

fn reject(route: &'static str, errors: Vec<FieldError>) -> Response {
    tracing::debug!(route, errors = errors.len(), "Request rejected by validation");
    metrics::record_validation_rejection(route);
    (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
}
