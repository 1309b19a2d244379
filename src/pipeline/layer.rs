//! Middleware that hands failures to the error pipeline.

use std::any::Any;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::pipeline::{ErrorPipeline, Failure};

/// Runs the pipeline for any response carrying a `Failure`.
pub async fn route_failures(
    State(pipeline): State<ErrorPipeline>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    match response.extensions_mut().remove::<Failure>() {
        Some(failure) => pipeline.run(failure),
        None => response,
    }
}

/// Converts a caught handler panic into an unclassified failure.
pub fn panic_failure(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    };

    Failure::unclassified("Panic", message).into_response()
}
