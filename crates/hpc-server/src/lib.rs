//! hpc Server — HTTP RPC over `/<service>/<method>` and JSON bodies.
//!
//! Provides:
//! - [`Codec`]: method resolution, body decoding, response/error encoding
//! - [`Service`] / [`Dispatcher`]: typed method registry and invocation
//! - [`router`] / [`start_server`]: axum bootstrap
//!
//! ```ignore
//! let dispatcher = Dispatcher::new().with_service(
//!     Service::new("Math").method("Add", add),
//! )?;
//! let addr = hpc_server::start_server(ServerConfig::default(), dispatcher).await?;
//! // POST http://{addr}/math/add  {"a":5,"b":10}  →  {"value":15}
//! ```

pub mod api;
pub mod codec;
pub mod dispatcher;
pub mod service;

use std::net::SocketAddr;

pub use api::router;
pub use codec::{Codec, CodecRequest};
pub use dispatcher::{DispatchError, Dispatcher};
pub use service::Service;

/// Configuration for the hpc server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3210,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}: {1}")]
    InvalidAddress(String, #[source] std::net::AddrParseError),

    #[error("Failed to bind to {0}: {1}")]
    Bind(SocketAddr, #[source] std::io::Error),

    #[error("Failed to get local address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`, defaulting to `hpc_server=info,tower_http=info`. Does
/// nothing if a subscriber is already installed.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hpc_server=info,tower_http=info".into()),
        )
        .try_init();
}

/// Start the HTTP server in a background task.
///
/// Returns the actual address the server is listening on, which differs from
/// the configured one when `port` is `0`.
pub async fn start_server(
    config: ServerConfig,
    dispatcher: Dispatcher,
) -> Result<SocketAddr, ServerError> {
    init_tracing();

    let raw = format!("{}:{}", config.host, config.port);
    let addr: SocketAddr = raw
        .parse()
        .map_err(|e| ServerError::InvalidAddress(raw.clone(), e))?;

    tracing::info!(methods = ?dispatcher.method_list(), "Registered RPC methods");
    let app = router(dispatcher);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(addr, e))?;

    let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    tracing::info!("hpc server listening on {}", local_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(local_addr)
}
