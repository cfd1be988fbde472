//! The `/<service>/<method>` + JSON codec.
//!
//! A [`Codec`] turns each inbound request into a [`CodecRequest`], which the
//! dispatcher then uses to resolve the target method, decode the input,
//! and render the output or the error:
//!
//! ```text
//! Codec::new_request ─▶ method() ─▶ read_input::<I>() ─▶ (invoke)
//!                                                          ├─▶ write_response(&out)
//!                                                          └─▶ write_error(400, &err)
//! ```

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use hpc_core::types::to_json_line;
use hpc_core::{CodecError, ErrorBody, QualifiedMethod, StatusError, JSON_CONTENT_TYPE};

/// HTTP RPC codec over `/<service>/<method>` paths and JSON bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec;

impl Codec {
    pub fn new() -> Self {
        Self
    }

    /// Wrap an inbound request. One `CodecRequest` per request.
    pub fn new_request(&self, request: Request) -> CodecRequest {
        let (parts, body) = request.into_parts();
        CodecRequest {
            path: parts.uri.path().to_owned(),
            body,
        }
    }
}

/// Per-request codec state.
pub struct CodecRequest {
    path: String,
    body: Body,
}

impl CodecRequest {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parse the service name and method from the request path.
    pub fn method(&self) -> Result<QualifiedMethod, CodecError> {
        QualifiedMethod::from_path(&self.path)
    }

    /// Read the whole body and decode it as JSON.
    ///
    /// The body can only be consumed once; a second call sees an empty body
    /// and fails to decode.
    pub async fn read_input<T: DeserializeOwned>(&mut self) -> Result<T, CodecError> {
        let body = std::mem::take(&mut self.body);
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|e| CodecError::Body(Box::new(e)))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write the JSON response body with the default success status.
    pub fn write_response<T: Serialize + ?Sized>(&self, reply: &T) -> Response {
        match to_json_line(reply) {
            Ok(bytes) => json_response(StatusCode::OK, bytes),
            Err(e) => {
                tracing::error!(path = %self.path, "Failed to encode response: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }

    /// Write an error response.
    ///
    /// A [`StatusError`] is written with its own status and message. Any
    /// other error is written with `status` and that status's standard
    /// reason phrase; its message stays in the server log.
    pub fn write_error(&self, status: StatusCode, err: &(dyn std::error::Error + 'static)) -> Response {
        let (status, body) = match err.downcast_ref::<StatusError>() {
            Some(public) => (
                StatusCode::from_u16(public.status()).unwrap_or(status),
                ErrorBody::new(public.message()),
            ),
            None => {
                tracing::warn!(path = %self.path, status = %status, "RPC error: {}", err);
                (status, ErrorBody::new(status.canonical_reason().unwrap_or("")))
            }
        };

        match to_json_line(&body) {
            Ok(bytes) => json_response(status, bytes),
            Err(e) => {
                tracing::error!(path = %self.path, "Failed to encode error body: {}", e);
                status.into_response()
            }
        }
    }
}

fn json_response(status: StatusCode, bytes: Vec<u8>) -> Response {
    let mut response = (status, bytes).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(JSON_CONTENT_TYPE),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct AddInput {
        a: i64,
        b: i64,
    }

    fn post(path: &str, body: &'static str) -> CodecRequest {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri(path)
            .body(Body::from(body))
            .unwrap();
        Codec::new().new_request(request)
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_method_from_uri_path() {
        let req = post("http://localhost:3210/math/get_stats?verbose=1", "");
        assert_eq!(req.path(), "/math/get_stats");
        assert_eq!(req.method().unwrap().to_string(), "Math.GetStats");
    }

    #[test]
    fn test_method_missing() {
        let req = post("/math", "");
        assert!(matches!(req.method(), Err(CodecError::MethodMissing)));
    }

    #[tokio::test]
    async fn test_read_input() {
        let mut req = post("/math/add", r#"{ "a": 5, "b": 10 }"#);
        let input: AddInput = req.read_input().await.unwrap();
        assert_eq!(input, AddInput { a: 5, b: 10 });
    }

    #[tokio::test]
    async fn test_read_input_malformed() {
        let mut req = post("/math/add", r#"{ "a": 5, "b": "#);
        let err = req.read_input::<AddInput>().await.unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[tokio::test]
    async fn test_read_input_shape_mismatch() {
        let mut req = post("/math/add", r#"{ "a": "five" }"#);
        let err = req.read_input::<AddInput>().await.unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[tokio::test]
    async fn test_read_input_consumes_body() {
        let mut req = post("/math/add", r#"{ "a": 1, "b": 2 }"#);
        let _: AddInput = req.read_input().await.unwrap();
        assert!(req.read_input::<AddInput>().await.is_err());
    }

    #[tokio::test]
    async fn test_write_response() {
        let req = post("/math/add", "");
        let response = req.write_response(&serde_json::json!({ "value": 15 }));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            JSON_CONTENT_TYPE
        );
        assert_eq!(body_string(response).await, "{\"value\":15}\n");
    }

    #[tokio::test]
    async fn test_write_response_encode_failure() {
        let req = post("/math/add", "");
        let mut unencodable = std::collections::HashMap::new();
        unencodable.insert((1, 2), 3);
        let response = req.write_response(&unencodable);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_write_status_error() {
        let req = post("/math/error", "");
        let err = StatusError::new(400, "Boom");
        let response = req.write_error(StatusCode::BAD_REQUEST, &err);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            JSON_CONTENT_TYPE
        );
        assert_eq!(body_string(response).await, "{\"error\":\"Boom\"}\n");
    }

    #[tokio::test]
    async fn test_write_status_error_overrides_fallback() {
        let req = post("/users/get", "");
        let err = StatusError::new(404, "User not found");
        let response = req.write_error(StatusCode::BAD_REQUEST, &err);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "{\"error\":\"User not found\"}\n");
    }

    #[tokio::test]
    async fn test_write_status_error_invalid_code_uses_fallback() {
        let req = post("/math/error", "");
        let err = StatusError::new(42, "weird");
        let response = req.write_error(StatusCode::BAD_REQUEST, &err);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, "{\"error\":\"weird\"}\n");
    }

    #[tokio::test]
    async fn test_write_opaque_error_hides_message() {
        let req = post("/math/internal_error", "");
        let err = std::io::Error::other("boom");
        let response = req.write_error(StatusCode::BAD_REQUEST, &err);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_string(response).await;
        assert_eq!(body, "{\"error\":\"Bad Request\"}\n");
        assert!(!body.contains("boom"));
    }

    #[tokio::test]
    async fn test_write_opaque_error_uses_fallback_text() {
        let req = post("/math/internal_error", "");
        let err = std::io::Error::other("db password is hunter2");
        let response = req.write_error(StatusCode::INTERNAL_SERVER_ERROR, &err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_string(response).await,
            "{\"error\":\"Internal Server Error\"}\n"
        );
    }

    #[tokio::test]
    async fn test_write_codec_error_is_opaque() {
        let req = post("/math", "");
        let err = req.method().unwrap_err();
        let response = req.write_error(StatusCode::BAD_REQUEST, &err);
        assert_eq!(body_string(response).await, "{\"error\":\"Bad Request\"}\n");
    }
}
