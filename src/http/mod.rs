//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID assigned and echoed)
//!     → validation gate (register/login only)
//!     → handlers.rs (success text, fault injection, not-found fallback)
//!     → error pipeline for any Failure
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::{RequestIdGenerator, X_REQUEST_ID};
pub use server::{Collaborators, HttpServer};
