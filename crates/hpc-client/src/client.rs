//! HTTP client for hpc services.

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;

use hpc_core::{ErrorBody, JSON_CONTENT_TYPE};

use crate::error::ClientError;

/// Configuration for the RPC client.
#[derive(Debug, Clone)]
pub struct Config {
    /// URL end-point for RPC services, e.g. `http://127.0.0.1:3210`.
    pub url: String,
    /// HTTP client used for every call. Timeouts, proxies and TLS settings
    /// are configured here.
    pub http_client: reqwest::Client,
}

impl Config {
    /// Configuration for `url` with a default `reqwest::Client`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Use a pre-configured HTTP client.
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }
}

/// Makes calls to an HTTP RPC end-point.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    config: Config,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Call `service.method` with `input` and decode the response body.
    ///
    /// The HTTP status is not inspected: whatever the server answers is
    /// decoded as `O`, and only a decode failure is reported. An error body
    /// such as `{"error":"Boom"}` therefore succeeds when `O` accepts it
    /// (for example when all of its fields have defaults). Use
    /// [`call_checked`](Self::call_checked) to turn non-2xx responses into
    /// [`ClientError::Status`].
    pub async fn call<I, O>(&self, service: &str, method: &str, input: &I) -> Result<O, ClientError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let res = self.send(service, method, input).await?;
        let bytes = res.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }

    /// Like [`call`](Self::call), but a non-2xx status is returned as
    /// [`ClientError::Status`] carrying the server's `error` message.
    pub async fn call_checked<I, O>(
        &self,
        service: &str,
        method: &str,
        input: &I,
    ) -> Result<O, ClientError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let res = self.send(service, method, input).await?;
        let status = res.status();
        let bytes = res.bytes().await?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(body) => body.error,
                Err(_) => String::from_utf8_lossy(&bytes).trim().to_string(),
            };
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }

    fn url(&self, service: &str, method: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.url.trim_end_matches('/'),
            service,
            method
        )
    }

    async fn send<I>(&self, service: &str, method: &str, input: &I) -> Result<reqwest::Response, ClientError>
    where
        I: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(input).map_err(ClientError::Encode)?;
        let url = self.url(service, method);

        tracing::debug!(url = %url, bytes = body.len(), "Sending RPC call");

        let res = self
            .config
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        tracing::debug!(url = %url, status = %res.status(), "RPC call answered");
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_format() {
        let client = Client::new(Config::new("http://localhost:3210"));
        assert_eq!(
            client.url("math", "get_stats"),
            "http://localhost:3210/math/get_stats"
        );
    }

    #[test]
    fn test_url_trims_slash_and_keeps_casing() {
        let client = Client::new(Config::new("http://localhost:3210/"));
        assert_eq!(
            client.url("Math", "GetStats"),
            "http://localhost:3210/Math/GetStats"
        );
    }

    #[tokio::test]
    async fn test_encode_failure_sends_nothing() {
        // Nothing listens here; an attempted send would be a Transport error.
        let client = Client::new(Config::new("http://127.0.0.1:1"));
        let mut input = std::collections::HashMap::new();
        input.insert((1, 2), 3);

        let err = client
            .call::<_, serde_json::Value>("math", "add", &input)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Encode(_)));
    }

    #[test]
    fn test_status_accessor() {
        let err = ClientError::Status {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }
}
