//! Registration and login service with an ordered error pipeline.
//!
//! Requests to `/register` and `/login` pass a validation gate that either
//! rejects them with a 422 field-error list or lets the handler answer.
//! Every other failure, whatever its origin, is logged, alerted and
//! classified by the error pipeline before a 404 or 500 goes out.

pub mod alerts;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod store;
pub mod validation;

pub use config::ServiceConfig;
pub use http::{Collaborators, HttpServer};
pub use lifecycle::Shutdown;
pub use pipeline::{ErrorPipeline, Failure};
