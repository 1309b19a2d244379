//! Route handlers.
//!
//! Success handlers only run after their validation gate passed. The
//! remaining handlers are failure sources feeding the error pipeline.

use axum::{http::Uri, response::Response};

use crate::pipeline::Failure;

pub const REGISTERED: &str = "Thank you for registering";
pub const LOGGED_IN: &str = "Successful, You are now Logged In";

/// `POST /register`. Nothing is persisted.
pub async fn register() -> &'static str {
    REGISTERED
}

/// `POST /login`.
pub async fn login() -> &'static str {
    LOGGED_IN
}

/// `GET /panic/sync`: fails before any response is produced.
pub async fn panic_sync() -> Result<Response, Failure> {
    Err(Failure::unclassified("Error", "synchronous error"))
}

/// `GET /panic/async`: fails from deferred work.
///
/// The failure only surfaces once the spawned task settles.
pub async fn panic_async() -> Result<Response, Failure> {
    let deferred = tokio::spawn(async {
        tokio::task::yield_now().await;
        Err::<Response, _>(Failure::unclassified("Error", "asynchronous error"))
    });

    match deferred.await {
        Ok(outcome) => outcome,
        Err(e) => Err(Failure::unclassified("JoinError", e.to_string())),
    }
}

/// Fallback for unknown paths and unsupported methods.
pub async fn not_found(uri: Uri) -> Failure {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    Failure::not_found(format!("Page not found on this path: {}", target))
}
