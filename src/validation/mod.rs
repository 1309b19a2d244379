//! Request validation stage.
//!
//! # Data Flow
//! ```text
//! POST /register | /login
//!     → middleware.rs (buffer body, load store)
//!     → credentials.rs (JSON or form decoding)
//!     → rules.rs (pure checks → [FieldError])
//!     → 422 with the list, or the route handler
//! ```
//!
//! # Design Decisions
//! - Validation rejections never enter the error pipeline
//! - Rules are pure functions of credentials and a store snapshot
//! - The body is replayed to the handler unchanged

pub mod credentials;
pub mod middleware;
pub mod rules;

pub use credentials::{BodyError, Credentials};
pub use middleware::{login_gate, registration_gate, Gate};
pub use rules::{validate_login, validate_registration, FieldError};
