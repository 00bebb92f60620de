//! Wallet Gateway RPC Client
//!
//! JSON-RPC 2.0 over HTTP to one or more wallet gateways, with:
//! - Automatic failover on errors
//! - Promotion of the last responsive endpoint to primary
//!
//! The gateway owns NEM transaction serialization and fee computation; the
//! wallet only signs the bytes it is handed.

use anyhow::{anyhow, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::{
    sync::atomic::{AtomicU64, AtomicUsize, Ordering},
    time::{Duration, Instant},
};
use tracing::{debug, warn};

use super::{AnnounceResult, MosaicHolding, MosaicId, TransferPreview};

/// Timeout for RPC requests
const RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC request ID counter
static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    method: String,
    params: Value,
    id: u64,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

/// Single gateway endpoint
#[derive(Debug)]
struct RpcClient {
    url: String,
    client: reqwest::Client,
}

impl RpcClient {
    fn new(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(RPC_TIMEOUT)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = REQUEST_ID.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: method.to_string(),
            params,
            id,
        };

        let start = Instant::now();

        let response = self.client.post(&self.url).json(&request).send().await?;

        debug!(
            "{} {} -> {} in {}ms",
            self.url,
            method,
            response.status(),
            start.elapsed().as_millis()
        );

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {}", response.status()));
        }

        let json_response: JsonRpcResponse<T> = response.json().await?;

        if let Some(error) = json_response.error {
            return Err(anyhow!("RPC error {}: {}", error.code, error.message));
        }

        json_response
            .result
            .ok_or_else(|| anyhow!("Missing result in RPC response"))
    }
}

/// Gateway endpoints with failover
#[derive(Debug)]
pub struct RpcPool {
    clients: Vec<RpcClient>,

    /// Index of the preferred endpoint
    primary: AtomicUsize,
}

impl RpcPool {
    /// Create a pool over `endpoints`, tried in order
    pub fn new(endpoints: &[String]) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(anyhow!("No gateway endpoints configured"));
        }

        let clients = endpoints
            .iter()
            .map(|url| RpcClient::new(url))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            clients,
            primary: AtomicUsize::new(0),
        })
    }

    /// Execute an RPC call with automatic failover
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let primary = self.primary.load(Ordering::Relaxed);
        let order = std::iter::once(primary).chain((0..self.clients.len()).filter(|&i| i != primary));

        let mut last_error = None;
        for idx in order {
            let client = &self.clients[idx];
            match client.call::<T>(method, params.clone()).await {
                Ok(result) => {
                    if idx != primary {
                        debug!("Promoting {} to primary", client.url);
                        self.primary.store(idx, Ordering::Relaxed);
                    }
                    return Ok(result);
                }
                Err(e) => {
                    warn!("Gateway {} failed: {}", client.url, e);
                    last_error = Some(e);
                }
            }
        }

        Err(match last_error {
            Some(e) if self.clients.len() == 1 => e,
            Some(e) => anyhow!("All gateways failed, last error: {}", e),
            None => anyhow!("No gateway endpoints configured"),
        })
    }

    /// Mosaics owned by an address (XEM included as `nem:xem`)
    pub async fn mosaics_owned(&self, address: &str) -> Result<Vec<MosaicHolding>> {
        let result: MosaicsOwned = self
            .call("account_getMosaicsOwned", json!({ "address": address }))
            .await?;
        Ok(result.data)
    }

    /// Have the gateway build an unsigned transfer from `signer`
    pub async fn prepare_transfer(
        &self,
        recipient: &str,
        mosaic: &MosaicId,
        quantity: u64,
        signer: &str,
    ) -> Result<TransferPreview> {
        self.call(
            "transfer_prepare",
            json!({
                "recipient": recipient,
                "mosaic": mosaic,
                "quantity": quantity,
                "signer": signer,
            }),
        )
        .await
    }

    /// Announce a signed transaction
    pub async fn announce(&self, data: &str, signature: &str) -> Result<AnnounceResult> {
        self.call(
            "transaction_announce",
            json!({ "data": data, "signature": signature }),
        )
        .await
    }
}

// Response types for RPC calls

#[derive(Debug, Deserialize)]
struct MosaicsOwned {
    data: Vec<MosaicHolding>,
}
