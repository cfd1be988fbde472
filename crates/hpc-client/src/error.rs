//! Client-side error type.

/// A failed [`Client::call`](crate::Client::call). Each variant is a single
/// failed attempt; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The input could not be serialized; no request was sent.
    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// Connection, timeout or body read failure.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not decode into the output type.
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Non-success status, only returned by
    /// [`Client::call_checked`](crate::Client::call_checked).
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

impl ClientError {
    /// The HTTP status of a [`ClientError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
