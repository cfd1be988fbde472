//! Wire types shared by the codec and the client.
//!
//! Bodies are single JSON documents terminated by a newline.

use serde::{Deserialize, Serialize};

/// Content type of every request and response body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Body of an error response: `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Input or output of a method that carries no data.
///
/// Decodes from any JSON object, ignoring its fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Encode `value` as one JSON document followed by `\n`.
pub fn to_json_line<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = serde_json::to_vec(value)?;
    buf.push(b'\n');
    Ok(buf)
}
