use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use reqwest::Client;
use serde_json::{Value, json};

use crate::chain::error::{ChainError, ChainErrorKind, protocol, upstream};

/// JSON-RPC application error code both ledger gateways use for "no such
/// record"; mapped to a typed NotFound instead of a protocol failure.
const RPC_NOT_FOUND_CODE: i64 = -32004;

#[derive(Clone)]
pub struct JsonRpcClient {
    client: Client,
    endpoint: String,
    next_id: std::sync::Arc<AtomicU64>,
}

impl JsonRpcClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ChainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| upstream(format!("failed to build http client: {err}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            next_id: std::sync::Arc::new(AtomicU64::new(1)),
        })
    }

    pub async fn call(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let request_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            target: "chain.rpc",
            endpoint = %self.endpoint,
            method = %method,
            request_id,
            "rpc_dispatch"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": request_id,
                "method": method,
                "params": params,
            }))
            .send()
            .await
            .map_err(|err| {
                let kind_hint = if err.is_timeout() { "timeout" } else { "transport" };
                upstream(format!("rpc {method} {kind_hint} failure: {err}"))
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| upstream(format!("rpc {method} body read failure: {err}")))?;

        if !(200..300).contains(&status) {
            return Err(map_http_status(status, method, &body));
        }

        let envelope: Value = serde_json::from_str(&body)
            .map_err(|err| protocol(format!("rpc {method} returned invalid json: {err}")))?;

        if let Some(error) = envelope.get("error").filter(|error| !error.is_null()) {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unspecified rpc error");
            if code == RPC_NOT_FOUND_CODE {
                return Err(ChainError::new(
                    ChainErrorKind::NotFound,
                    format!("rpc {method}: {message}"),
                ));
            }
            return Err(protocol(format!("rpc {method} error {code}: {message}")));
        }

        envelope
            .get("result")
            .cloned()
            .ok_or_else(|| protocol(format!("rpc {method} envelope has no result")))
    }
}

fn map_http_status(status: u16, method: &str, body: &str) -> ChainError {
    let normalized_body = body.chars().take(240).collect::<String>();
    let mut err = if status == 408 || status == 429 || status >= 500 {
        upstream(format!("rpc {method} returned status {status}"))
    } else {
        protocol(format!("rpc {method} returned status {status}")).with_retryable(false)
    };
    if !normalized_body.is_empty() {
        err.message = format!("{}: {}", err.message, normalized_body);
    }
    err
}
