//! hpc Core — transport-agnostic pieces of the `/<service>/<method>` protocol.
//!
//! This crate holds everything both sides of the wire agree on, with **no
//! HTTP framework dependency**:
//!
//! - snake_case → PascalCase name conversion ([`naming`])
//! - request path → `Service.Method` resolution ([`method`])
//! - status-bearing and codec errors ([`error`])
//! - the JSON error body and line encoding ([`types`])
//!
//! The axum codec and dispatcher live in `hpc-server`, the HTTP client in
//! `hpc-client`.

pub mod error;
pub mod method;
pub mod naming;
pub mod types;

// Convenience re-exports
pub use error::{CodecError, ServiceError, StatusError, FALLBACK_STATUS};
pub use method::QualifiedMethod;
pub use types::{Empty, ErrorBody, JSON_CONTENT_TYPE};
