//! The failure value routed through the error pipeline.
//!
//! # Design Decisions
//! - Classification is an explicit enum, never inferred from the name
//! - The origin trace is captured where the failure is constructed
//! - Handlers return `Result<_, Failure>`; the response carries the failure
//!   as an extension until the pipeline middleware consumes it

use std::backtrace::{Backtrace, BacktraceStatus};
use std::borrow::Cow;
use std::panic::Location;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::store::StoreError;
use crate::validation::BodyError;

/// Tag used as the failure name for not-found failures.
pub const NOT_FOUND_TAG: &str = "404";

/// How the pipeline should classify a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// The requested resource does not exist.
    NotFound,
    /// Any other server-side fault.
    Unclassified,
}

impl Classification {
    /// Metric label for this classification.
    pub fn label(self) -> &'static str {
        match self {
            Classification::NotFound => "not_found",
            Classification::Unclassified => "unclassified",
        }
    }
}

/// A propagating error value.
///
/// Once constructed its classification, name and message never change.
#[derive(Debug, Clone)]
pub struct Failure {
    classification: Classification,
    name: Cow<'static, str>,
    message: String,
    stack: String,
}

impl Failure {
    /// Failure for a path or method with no matching route.
    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::build(
            Classification::NotFound,
            Cow::Borrowed(NOT_FOUND_TAG),
            message.into(),
            Location::caller(),
        )
    }

    /// Server-side failure with the given name.
    #[track_caller]
    pub fn unclassified(name: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::build(
            Classification::Unclassified,
            name.into(),
            message.into(),
            Location::caller(),
        )
    }

    fn build(
        classification: Classification,
        name: Cow<'static, str>,
        message: String,
        origin: &'static Location<'static>,
    ) -> Self {
        let mut stack = format!("{}: {}\n    at {}", name, message, origin);

        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            stack.push('\n');
            stack.push_str(&backtrace.to_string());
        }

        Self {
            classification,
            name,
            message,
            stack,
        }
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Origin trace. Only ever written to the error log and alerts.
    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// The `{name, message, stack}` view shared by the log and alert stages.
    pub fn snapshot(&self) -> FailureSnapshot<'_> {
        FailureSnapshot {
            name: self.name(),
            message: self.message(),
            stack: self.stack(),
        }
    }

    /// Message, or `fallback` when the message is empty.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.message.is_empty() {
            fallback
        } else {
            &self.message
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for Failure {}

/// Serializable projection of a failure.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FailureSnapshot<'a> {
    pub name: &'a str,
    pub message: &'a str,
    pub stack: &'a str,
}

impl FailureSnapshot<'_> {
    /// JSON with a four-space indent.
    pub fn to_pretty_json(&self) -> serde_json::Result<Vec<u8>> {
        to_pretty_json(self)
    }
}

pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

impl IntoResponse for Failure {
    /// Placeholder 500 carrying the failure; the pipeline middleware
    /// replaces it with the real response.
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl From<StoreError> for Failure {
    #[track_caller]
    fn from(err: StoreError) -> Self {
        let name = match &err {
            StoreError::Read { .. } => "StoreReadError",
            StoreError::Parse { .. } => "ParseError",
        };
        Failure::unclassified(name, err.to_string())
    }
}

impl From<BodyError> for Failure {
    #[track_caller]
    fn from(err: BodyError) -> Self {
        let name = match &err {
            BodyError::Read(_) => "BodyReadError",
            BodyError::Json(_) => "BodyParseError",
        };
        Failure::unclassified(name, err.to_string())
    }
}
