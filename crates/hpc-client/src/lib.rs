//! hpc Client — call `/<service>/<method>` endpoints with JSON bodies.
//!
//! # Example
//!
//! ```ignore
//! use hpc_client::{Client, Config};
//!
//! let client = Client::new(Config::new("http://127.0.0.1:3210"));
//! let out: AddOutput = client.call("math", "add", &AddInput { a: 5, b: 10 }).await?;
//! assert_eq!(out.value, 15);
//! ```
//!
//! Service and method names are sent as given; the server converts the
//! snake_case path segments (`get_stats`) to the registered PascalCase names
//! (`GetStats`).

pub mod client;
pub mod error;

pub use client::{Client, Config};
pub use error::ClientError;
