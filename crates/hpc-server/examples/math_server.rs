//! Quick manual check of the codec against a running server.
//!
//! Usage: cargo run -p hpc-server --example math_server

use std::time::Duration;

use serde::{Deserialize, Serialize};

use hpc_core::{Empty, ServiceError, StatusError};
use hpc_server::{Dispatcher, ServerConfig, Service};

#[derive(Deserialize)]
struct AddInput {
    a: i64,
    b: i64,
}

#[derive(Serialize)]
struct AddOutput {
    value: i64,
}

async fn add(input: AddInput) -> Result<AddOutput, ServiceError> {
    Ok(AddOutput {
        value: input.a + input.b,
    })
}

async fn divide(input: AddInput) -> Result<AddOutput, ServiceError> {
    if input.b == 0 {
        return Err(StatusError::new(422, "Division by zero").into());
    }
    let value = input
        .a
        .checked_div(input.b)
        .ok_or_else(|| StatusError::new(422, "Division overflow"))?;
    Ok(AddOutput { value })
}

async fn internal_error(_: Empty) -> Result<Empty, ServiceError> {
    Err("connection to stats backend lost".into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = Dispatcher::new().with_service(
        Service::new("Math")
            .method("Add", add)
            .method("Divide", divide)
            .method("InternalError", internal_error),
    )?;

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0, // random port
    };
    let addr = hpc_server::start_server(config, dispatcher).await?;
    println!("Server started on {}", addr);

    // Give the server a moment to settle
    tokio::time::sleep(Duration::from_millis(200)).await;

    let client = reqwest::Client::new();
    let base = format!("http://{}", addr);

    let calls = [
        ("/math/add", r#"{"a":5,"b":10}"#),
        ("/math/divide", r#"{"a":10,"b":0}"#),
        ("/math/divide", r#"{"a":-9223372036854775808,"b":-1}"#),
        ("/math/internal_error", "{}"),
        ("/math/missing", "{}"),
        ("/math", "{}"),
    ];

    for (path, body) in calls {
        println!("\n=== POST {} {} ===", path, body);
        let res = client
            .post(format!("{}{}", base, path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;
        let status = res.status();
        println!("{} {}", status, res.text().await?.trim_end());
    }

    Ok(())
}
