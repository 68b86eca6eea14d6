//! PXE JSON-RPC client with timeout and failover handling.
//!
//! # Responsibilities
//! - Speak JSON-RPC 2.0 to the PXE over HTTP
//! - Try failover endpoints when the primary is unreachable
//! - Enforce a deadline on every request
//! - Poll for node readiness and transaction receipts

use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::primitives::{TxHash, B256};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::time::{interval, timeout};
use uuid::Uuid;

use crate::account::auth::AuthWitness;
use crate::account::identity::CompleteAddress;
use crate::config::schema::{PxeConfig, WaitConfig};
use crate::contract::artifact::ContractArtifact;
use crate::contract::deploy::ContractInstance;
use crate::observability::metrics;
use crate::pxe::types::{
    AztecAddress, ExtendedPublicLog, FunctionCall, LogFilter, NodeInfo, PxeError, PxeResult,
    TxExecutionRequest, TxReceipt, TxStatus,
};
use crate::resilience::RetryPolicy;

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: Uuid,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// PXE client wrapper with failover support.
#[derive(Clone)]
pub struct PxeClient {
    /// Primary endpoint followed by failovers.
    endpoints: Arc<Vec<url::Url>>,
    http: reqwest::Client,
    /// Per-request deadline.
    timeout_duration: Duration,
    wait: WaitConfig,
}

impl PxeClient {
    /// Create a new client. No network traffic happens here.
    ///
    /// An unparsable primary URL is an error; unparsable failovers are
    /// skipped with a warning.
    pub fn new(config: &PxeConfig) -> PxeResult<Self> {
        let primary: url::Url = config.url.parse().map_err(|e: url::ParseError| PxeError::InvalidUrl {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;

        let mut endpoints = vec![primary];
        for url_str in &config.failover_urls {
            match url_str.parse() {
                Ok(url) => endpoints.push(url),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover PXE URL"),
            }
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| PxeError::Rpc(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoints: Arc::new(endpoints),
            http,
            timeout_duration: Duration::from_secs(config.request_timeout_secs.max(1)),
            wait: WaitConfig::default(),
        })
    }

    /// Client for a single URL with default settings.
    pub fn connect(url: &str) -> PxeResult<Self> {
        Self::new(&PxeConfig {
            url: url.to_string(),
            ..PxeConfig::default()
        })
    }

    /// Replace the readiness and receipt polling settings.
    pub fn with_wait_config(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    pub fn wait_config(&self) -> &WaitConfig {
        &self.wait
    }

    /// Primary endpoint URL.
    pub fn url(&self) -> &url::Url {
        &self.endpoints[0]
    }

    /// Issue one JSON-RPC call, trying each endpoint in order.
    ///
    /// Transport failures and timeouts fall through to the next endpoint. A
    /// JSON-RPC error object is the node's answer and is returned as is.
    async fn call<R: DeserializeOwned>(&self, method: &'static str, params: Value) -> PxeResult<R> {
        let started = Instant::now();
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: Uuid::new_v4(),
            method,
            params,
        };

        let mut response = None;
        for (i, endpoint) in self.endpoints.iter().enumerate() {
            match timeout(self.timeout_duration, self.post(endpoint, &request)).await {
                Ok(Ok(r)) => {
                    response = Some(r);
                    break;
                }
                Ok(Err(e)) => {
                    tracing::warn!(endpoint_idx = i, method, error = %e, "RPC error, trying next endpoint");
                }
                Err(_) => {
                    tracing::warn!(endpoint_idx = i, method, "RPC timeout, trying next endpoint");
                }
            }
        }

        let result = match response {
            Some(response) => Self::decode(method, response),
            None => Err(PxeError::Rpc(format!("All PXE endpoints failed for {}", method))),
        };
        metrics::record_rpc(method, result.is_ok(), started.elapsed());
        result
    }

    async fn post(&self, endpoint: &url::Url, request: &JsonRpcRequest<'_>) -> Result<JsonRpcResponse, reqwest::Error> {
        self.http
            .post(endpoint.clone())
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<JsonRpcResponse>()
            .await
    }

    fn decode<R: DeserializeOwned>(method: &str, response: JsonRpcResponse) -> PxeResult<R> {
        if let Some(error) = response.error {
            return Err(PxeError::Remote {
                code: error.code,
                message: error.message,
            });
        }
        serde_json::from_value(response.result.unwrap_or(Value::Null)).map_err(|e| PxeError::Decode {
            method: method.to_string(),
            reason: e.to_string(),
        })
    }

    /// Get node version and chain identifiers.
    pub async fn get_node_info(&self) -> PxeResult<NodeInfo> {
        self.call("pxe_getNodeInfo", json!([])).await
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> PxeResult<u64> {
        self.call("pxe_getBlockNumber", json!([])).await
    }

    /// Accounts whose keys or identities are registered with this PXE.
    pub async fn get_registered_accounts(&self) -> PxeResult<Vec<CompleteAddress>> {
        self.call("pxe_getRegisteredAccounts", json!([])).await
    }

    /// Pre-funded sandbox accounts whose keys the node manages.
    pub async fn get_test_accounts(&self) -> PxeResult<Vec<CompleteAddress>> {
        self.call("pxe_getTestAccounts", json!([])).await
    }

    /// Register an account identity so the PXE can verify its witnesses.
    pub async fn register_account(&self, account: &CompleteAddress) -> PxeResult<()> {
        self.call("pxe_registerAccount", json!([account])).await
    }

    /// Register a contract instance and its artifact.
    pub async fn register_contract(
        &self,
        instance: &ContractInstance,
        artifact: &ContractArtifact,
    ) -> PxeResult<()> {
        self.call("pxe_registerContract", json!([instance, artifact])).await
    }

    /// Look up a contract instance, `None` if the PXE does not know it.
    pub async fn get_contract_instance(&self, address: AztecAddress) -> PxeResult<Option<ContractInstance>> {
        self.call("pxe_getContractInstance", json!([address])).await
    }

    /// Ask the PXE to authorize `message_hash` for a node-managed account.
    pub async fn create_auth_wit(&self, account: AztecAddress, message_hash: B256) -> PxeResult<AuthWitness> {
        self.call("pxe_createAuthWit", json!([account, message_hash])).await
    }

    /// Simulate a call without submitting anything and return its output.
    pub async fn simulate(&self, origin: AztecAddress, call: &FunctionCall) -> PxeResult<Value> {
        self.call("pxe_simulateTx", json!([origin, call])).await
    }

    /// Prove and submit a transaction.
    pub async fn send_tx(&self, request: &TxExecutionRequest) -> PxeResult<TxHash> {
        let tx_hash: TxHash = self.call("pxe_sendTx", json!([request])).await?;
        tracing::debug!(tx_hash = %tx_hash, origin = %request.origin, "Transaction submitted");
        Ok(tx_hash)
    }

    pub async fn get_tx_receipt(&self, tx_hash: TxHash) -> PxeResult<TxReceipt> {
        self.call("pxe_getTxReceipt", json!([tx_hash])).await
    }

    pub async fn get_public_logs(&self, filter: &LogFilter) -> PxeResult<Vec<ExtendedPublicLog>> {
        self.call("pxe_getPublicLogs", json!([filter])).await
    }

    /// Block until the PXE answers `get_node_info`, backing off between probes.
    pub async fn wait_for_pxe(&self) -> PxeResult<NodeInfo> {
        let policy = RetryPolicy::from_wait_config(&self.wait);
        let result = policy
            .retry(|attempt| async move {
                if attempt > 0 {
                    tracing::info!(url = %self.url(), attempt, "Waiting for PXE");
                }
                self.get_node_info().await
            })
            .await;
        metrics::record_node_ready(result.is_ok());

        match result {
            Ok(info) => {
                tracing::info!(url = %self.url(), node_version = %info.node_version, "PXE is ready");
                Ok(info)
            }
            Err(e) => Err(PxeError::Unavailable {
                attempts: policy.max_attempts,
                last_error: e.to_string(),
            }),
        }
    }

    /// True if the node answers a block number query.
    pub async fn is_healthy(&self) -> bool {
        self.get_block_number().await.is_ok()
    }

    /// Poll until `tx_hash` is mined or the configured deadline passes.
    pub async fn wait_for_tx(&self, tx_hash: TxHash) -> PxeResult<TxReceipt> {
        let timeout_secs = self.wait.tx_timeout_secs;
        let poll_interval = Duration::from_millis(self.wait.tx_poll_interval_ms.max(1));

        let result = timeout(Duration::from_secs(timeout_secs), async {
            let mut ticker = interval(poll_interval);
            loop {
                ticker.tick().await;

                let receipt = self.get_tx_receipt(tx_hash).await?;
                match receipt.status {
                    TxStatus::Pending => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    }
                    TxStatus::Success => return Ok(receipt),
                    TxStatus::Reverted => {
                        return Err(PxeError::TxReverted {
                            tx_hash,
                            reason: receipt.error.unwrap_or_else(|| "unknown reason".to_string()),
                        })
                    }
                    TxStatus::Dropped => return Err(PxeError::TxDropped(tx_hash)),
                }
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(PxeError::TxTimeout {
                tx_hash,
                secs: timeout_secs,
            }),
        }
    }
}

impl std::fmt::Debug for PxeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PxeClient")
            .field("url", &self.url().as_str())
            .field("failovers", &(self.endpoints.len() - 1))
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

/// A submitted transaction that can be awaited.
#[derive(Debug, Clone)]
pub struct SentTx {
    pxe: PxeClient,
    tx_hash: TxHash,
}

impl SentTx {
    pub fn new(pxe: PxeClient, tx_hash: TxHash) -> Self {
        Self { pxe, tx_hash }
    }

    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Wait for the transaction to be mined successfully.
    pub async fn wait(&self) -> PxeResult<TxReceipt> {
        self.pxe.wait_for_tx(self.tx_hash).await
    }
}
