//! JSON-RPC client for read-only contract calls

use std::cell::Cell;

use anyhow::{Context, Result};
use quote_model::Address;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::NetworkConfig;
use crate::error::QueryError;

/// Capability to run a read-only call against a contract
///
/// Takes ABI-encoded call data and returns the raw return bytes.
pub trait ContractQuery {
    fn call(&self, contract: &Address, data: &[u8]) -> Result<Vec<u8>, QueryError>;
}

impl<T: ContractQuery + ?Sized> ContractQuery for &T {
    fn call(&self, contract: &Address, data: &[u8]) -> Result<Vec<u8>, QueryError> {
        (**self).call(contract, data)
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Blocking `eth_call` client bound to one endpoint
pub struct RpcClient {
    http: Client,
    endpoint: String,
    next_id: Cell<u64>,
}

impl RpcClient {
    /// Create an RPC client from the network configuration
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: config.rpc_url.clone(),
            next_id: Cell::new(1),
        })
    }

    fn request(&self, method: &str, params: Value) -> Result<RpcResponse, QueryError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| QueryError::Connection(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Connection(format!("HTTP status {}", status)));
        }

        response
            .json::<RpcResponse>()
            .map_err(|e| QueryError::decoding("JSON-RPC response", e.without_url().to_string()))
    }
}

impl ContractQuery for RpcClient {
    fn call(&self, contract: &Address, data: &[u8]) -> Result<Vec<u8>, QueryError> {
        let params = json!([
            { "to": contract.to_string(), "data": format!("0x{}", hex::encode(data)) },
            "latest",
        ]);

        log::debug!("eth_call to={} data=0x{}", contract, hex::encode(data));
        let response = self.request("eth_call", params)?;

        if let Some(err) = response.error {
            let message = match err.data {
                Some(Value::String(detail)) => format!("{} ({})", err.message, detail),
                _ => err.message,
            };
            return Err(QueryError::RemoteExecution {
                contract: *contract,
                code: err.code,
                message,
            });
        }

        let result = match response.result {
            Some(Value::String(s)) => s,
            other => {
                return Err(QueryError::decoding(
                    "eth_call result",
                    format!("expected hex string, got {:?}", other),
                ))
            }
        };

        let bytes = decode_hex_result(&result)?;
        log::debug!("eth_call to={} returned {} bytes", contract, bytes.len());
        Ok(bytes)
    }
}

fn decode_hex_result(result: &str) -> Result<Vec<u8>, QueryError> {
    let digits = result.strip_prefix("0x").unwrap_or(result);
    hex::decode(digits).map_err(|e| QueryError::decoding("eth_call result", e.to_string()))
}
