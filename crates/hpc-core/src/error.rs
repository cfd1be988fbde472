//! Core error types for hpc.
//!
//! `StatusError` is the error a service method raises on purpose for API
//! consumers: its status and message are written to the wire verbatim.
//! Any other error a method returns is opaque and only ever surfaces as the
//! standard text of the dispatcher's fallback status.
//!
//! `CodecError` covers failures of the codec itself (routing and decoding).

use serde::Serialize;

/// Error type returned by service methods.
///
/// `StatusError` converts into it with `?` or `.into()`; so does any other
/// `std::error::Error + Send + Sync`.
pub type ServiceError = Box<dyn std::error::Error + Send + Sync>;

/// Status used when an error carries no status of its own.
pub const FALLBACK_STATUS: u16 = 400;

/// An error with an HTTP status code, native to the API and safe to expose
/// in the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct StatusError {
    #[serde(rename = "error")]
    message: String,
    #[serde(skip)]
    status: u16,
}

impl StatusError {
    /// Create a public error with the given status code and message.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("hpc: service name missing")]
    ServiceMissing,

    #[error("hpc: method name missing")]
    MethodMissing,

    #[error("hpc: failed to read request body")]
    Body(#[source] ServiceError),

    #[error("hpc: invalid request body: {0}")]
    Decode(#[from] serde_json::Error),
}
