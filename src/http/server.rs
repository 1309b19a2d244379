//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, panic capture, error pipeline)
//! - Attach validation gates to the register/login routes
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::alerts::AlertClient;
use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::request::{request_id, RequestIdGenerator, X_REQUEST_ID};
use crate::lifecycle::shutdown;
use crate::pipeline::{panic_failure, route_failures, AlertTemplate, ErrorLog, ErrorPipeline};
use crate::store::RecordSource;
use crate::validation::{login_gate, registration_gate, Gate};

/// Collaborators injected into the service at construction.
#[derive(Clone)]
pub struct Collaborators {
    pub records: Arc<dyn RecordSource>,
    pub alerts: Arc<dyn AlertClient>,
    pub error_log: ErrorLog,
}

/// HTTP server for the auth service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig, collaborators: Collaborators) -> Self {
        let router = Self::build_router(&config, collaborators);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, collaborators: Collaborators) -> Router {
        let gate = Gate::new(collaborators.records, config.listener.max_body_bytes);
        let pipeline = ErrorPipeline::standard(
            collaborators.error_log,
            collaborators.alerts,
            AlertTemplate::from(&config.alerts),
        );

        Router::new()
            .route(
                "/register",
                post(handlers::register).route_layer(middleware::from_fn_with_state(
                    gate.clone(),
                    registration_gate,
                )),
            )
            .route(
                "/login",
                post(handlers::login)
                    .route_layer(middleware::from_fn_with_state(gate, login_gate)),
            )
            .route("/panic/sync", get(handlers::panic_sync))
            .route("/panic/async", get(handlers::panic_async))
            .fallback(handlers::not_found)
            .method_not_allowed_fallback(handlers::not_found)
            .layer(CatchPanicLayer::custom(panic_failure))
            .layer(middleware::from_fn_with_state(pipeline, route_failures))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request),
                    )
                }),
            )
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, RequestIdGenerator))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown_rx` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            records_path = %self.config.store.records_path.display(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
