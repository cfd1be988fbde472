//! axum wiring for the dispatcher.
//!
//! Every path is handed to the dispatcher: the codec, not the router, decides
//! which `/<service>/<method>` a request targets.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::response::Response;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::dispatcher::Dispatcher;

/// Build the HTTP router serving all registered services.
pub fn router(dispatcher: Dispatcher) -> Router {
    Router::new()
        .fallback(rpc_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(dispatcher))
}

/// POST /<service>/<method> — one RPC call.
async fn rpc_handler(State(dispatcher): State<Arc<Dispatcher>>, request: Request) -> Response {
    dispatcher.dispatch(request).await
}
