//! Typed service definitions.
//!
//! A [`Service`] is a named set of async methods. Each method is a plain
//! function from a typed input to a typed output; registration erases the
//! types behind [`MethodHandler`] so the dispatcher can look methods up by
//! name at request time.
//!
//! ```ignore
//! let math = Service::new("Math")
//!     .method("Add", |input: AddInput| async move {
//!         Ok(AddOutput { value: input.a + input.b })
//!     })
//!     .method("Error", |_: Empty| async move {
//!         Err::<Empty, _>(StatusError::new(400, "Boom").into())
//!     });
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;

use hpc_core::{ServiceError, FALLBACK_STATUS};

use crate::codec::CodecRequest;

pub(crate) type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A type-erased method: reads its input from the codec request, runs, and
/// renders the result.
pub(crate) trait MethodHandler: Send + Sync {
    fn invoke(&self, request: CodecRequest) -> BoxFuture<Response>;
}

struct TypedMethod<I, O, F> {
    handler: Arc<F>,
    _types: PhantomData<fn(I) -> O>,
}

impl<I, O, F, Fut> MethodHandler for TypedMethod<I, O, F>
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, ServiceError>> + Send + 'static,
{
    fn invoke(&self, mut request: CodecRequest) -> BoxFuture<Response> {
        let handler = Arc::clone(&self.handler);
        Box::pin(async move {
            let fallback = fallback_status();

            let input: I = match request.read_input().await {
                Ok(input) => input,
                Err(err) => return request.write_error(fallback, &err),
            };

            match handler(input).await {
                Ok(output) => request.write_response(&output),
                Err(err) => request.write_error(fallback, err.as_ref()),
            }
        })
    }
}

fn fallback_status() -> StatusCode {
    StatusCode::from_u16(FALLBACK_STATUS).unwrap_or(StatusCode::BAD_REQUEST)
}

/// A named group of RPC methods.
pub struct Service {
    name: String,
    methods: Vec<(String, Arc<dyn MethodHandler>)>,
}

impl Service {
    /// Start a service definition. The name may be given in PascalCase
    /// (`"Math"`) or snake_case (`"math"`); it is normalized on registration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Add a method. `handler` receives the decoded request body and returns
    /// the value to encode as the response body.
    ///
    /// Return a [`hpc_core::StatusError`] to choose the status code and
    /// message seen by the caller; any other error is reported as
    /// `400 Bad Request`.
    pub fn method<I, O, F, Fut>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ServiceError>> + Send + 'static,
    {
        let method = TypedMethod {
            handler: Arc::new(handler),
            _types: PhantomData,
        };
        self.methods.push((name.into(), Arc::new(method)));
        self
    }

    pub(crate) fn into_parts(self) -> (String, Vec<(String, Arc<dyn MethodHandler>)>) {
        (self.name, self.methods)
    }
}
