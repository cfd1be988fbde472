//! RPC dispatcher: service registry plus the per-request flow.
//!
//! `Dispatcher` owns the registered services and drives a [`Codec`] for each
//! inbound request. It is intentionally free of any router wiring so it can be
//! mounted anywhere an axum `Request` is available (see [`crate::api`]).

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::Response;

use hpc_core::naming::snake_to_pascal;
use hpc_core::{QualifiedMethod, StatusError, JSON_CONTENT_TYPE};

use crate::codec::Codec;
use crate::service::{MethodHandler, Service};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("rpc: can't find service {0:?}")]
    ServiceNotFound(String),

    #[error("rpc: can't find method {0:?}")]
    MethodNotFound(String),

    #[error("rpc: service already defined: {0:?}")]
    DuplicateService(String),

    #[error("rpc: method already defined: {0:?}")]
    DuplicateMethod(String),

    #[error("rpc: invalid name {0:?}")]
    InvalidName(String),
}

type MethodMap = HashMap<String, Arc<dyn MethodHandler>>;

/// Registry of services and their methods, keyed by PascalCase names.
#[derive(Default)]
pub struct Dispatcher {
    codec: Codec,
    services: HashMap<String, MethodMap>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service and all of its methods.
    ///
    /// Names are normalized to PascalCase, so `Service::new("math")` and
    /// `Service::new("Math")` both answer `/math/...`.
    pub fn register(&mut self, service: Service) -> Result<(), DispatchError> {
        let (name, methods) = service.into_parts();
        let service_name = normalize(&name)?;

        let mut table = MethodMap::new();
        for (method_name, handler) in methods {
            let key = normalize(&method_name)?;
            match table.entry(key) {
                Entry::Occupied(entry) => {
                    return Err(DispatchError::DuplicateMethod(
                        QualifiedMethod::new(&service_name, entry.key()).to_string(),
                    ));
                }
                Entry::Vacant(entry) => {
                    entry.insert(handler);
                }
            }
        }

        match self.services.entry(service_name) {
            Entry::Occupied(entry) => Err(DispatchError::DuplicateService(entry.key().clone())),
            Entry::Vacant(entry) => {
                tracing::debug!(service = %entry.key(), methods = table.len(), "Registered service");
                entry.insert(table);
                Ok(())
            }
        }
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_service(mut self, service: Service) -> Result<Self, DispatchError> {
        self.register(service)?;
        Ok(self)
    }

    /// All registered `Service.Method` names, sorted.
    pub fn method_list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .services
            .iter()
            .flat_map(|(service, methods)| {
                methods
                    .keys()
                    .map(move |method| QualifiedMethod::new(service, method).to_string())
            })
            .collect();
        names.sort();
        names
    }

    fn lookup(&self, method: &QualifiedMethod) -> Result<Arc<dyn MethodHandler>, DispatchError> {
        let methods = self
            .services
            .get(method.service())
            .ok_or_else(|| DispatchError::ServiceNotFound(method.to_string()))?;
        methods
            .get(method.method())
            .cloned()
            .ok_or_else(|| DispatchError::MethodNotFound(method.to_string()))
    }

    /// Handle one inbound request end to end.
    pub async fn dispatch(&self, request: Request) -> Response {
        let mut response = self.serve(request).await;
        response.headers_mut().insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
        response
    }

    async fn serve(&self, request: Request) -> Response {
        if request.method() != Method::POST {
            let err = StatusError::new(
                StatusCode::METHOD_NOT_ALLOWED.as_u16(),
                format!("rpc: POST method required, received {}", request.method()),
            );
            let codec_request = self.codec.new_request(request);
            return codec_request.write_error(StatusCode::METHOD_NOT_ALLOWED, &err);
        }

        if let Some(content_type) = unsupported_content_type(request.headers()) {
            let err = StatusError::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE.as_u16(),
                format!("rpc: unrecognized Content-Type: {}", content_type),
            );
            let codec_request = self.codec.new_request(request);
            return codec_request.write_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, &err);
        }

        let codec_request = self.codec.new_request(request);

        let method = match codec_request.method() {
            Ok(method) => method,
            Err(err) => return codec_request.write_error(StatusCode::BAD_REQUEST, &err),
        };

        let handler = match self.lookup(&method) {
            Ok(handler) => handler,
            Err(err) => return codec_request.write_error(StatusCode::BAD_REQUEST, &err),
        };

        tracing::debug!(method = %method, path = %codec_request.path(), "Dispatching RPC call");
        handler.invoke(codec_request).await
    }
}

fn normalize(name: &str) -> Result<String, DispatchError> {
    let normalized = snake_to_pascal(name);
    if normalized.is_empty() || normalized.contains('.') || normalized.contains('/') {
        return Err(DispatchError::InvalidName(name.to_string()));
    }
    Ok(normalized)
}

/// Returns the offending value when the request declares a Content-Type
/// other than JSON. A missing header is accepted.
fn unsupported_content_type(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::CONTENT_TYPE)?;
    let raw = String::from_utf8_lossy(value.as_bytes());
    let media_type = raw.split(';').next().unwrap_or_default().trim();
    if media_type.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
        None
    } else {
        Some(raw.into_owned())
    }
}
