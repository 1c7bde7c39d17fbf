//! JSON-RPC adapter over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{
    parse_hex_u64, Address, Bytes, CallRequest, ReceiptStatus, RpcError, TransactionRequest,
    TxHash, TxReceipt,
};
use crate::ports::{ChainProvider, WalletProvider};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, T: Serialize> {
    jsonrpc: &'static str,
    method: &'a str,
    params: T,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Value,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Wire shape of `eth_getTransactionReceipt`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: TxHash,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    contract_address: Option<Address>,
}

impl RawReceipt {
    fn into_receipt(self) -> Result<TxReceipt, RpcError> {
        let block_number = self
            .block_number
            .as_deref()
            .map(parse_hex_u64)
            .transpose()
            .map_err(|e| RpcError::Parse(format!("blockNumber: {e}")))?;

        // Pre-Byzantium receipts carry no status; treat them as successful.
        let status = match self.status.as_deref().map(parse_hex_u64).transpose() {
            Ok(Some(0)) => ReceiptStatus::Reverted,
            Ok(_) => ReceiptStatus::Success,
            Err(e) => return Err(RpcError::Parse(format!("status: {e}"))),
        };

        Ok(TxReceipt {
            transaction_hash: self.transaction_hash,
            block_number,
            status,
            contract_address: self.contract_address,
        })
    }
}

/// HTTP JSON-RPC client for an Ethereum-compatible node.
pub struct JsonRpcClient {
    http_client: reqwest::Client,
    rpc_url: String,
    request_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(rpc_url: impl Into<String>) -> Result<Self, RpcError> {
        Self::with_timeout(rpc_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Http(e.to_string()))?;

        Ok(Self {
            http_client,
            rpc_url: rpc_url.into(),
            request_id: AtomicU64::new(1),
        })
    }

    /// Send one request and return the raw `result` value.
    async fn request<P: Serialize>(&self, method: &str, params: P) -> Result<Value, RpcError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        debug!(method, id, "rpc request");

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    RpcError::Connection(format!("Cannot connect to {}", self.rpc_url))
                } else {
                    RpcError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Http(format!("status {status}")));
        }

        let rpc_response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::Parse(e.to_string()))?;

        if let Some(error) = rpc_response.error {
            // Revert reasons come back in `data`.
            let message = match error.data {
                Some(Value::String(data)) => format!("{} ({})", error.message, data),
                _ => error.message,
            };
            return Err(RpcError::Rpc {
                code: error.code,
                message,
            });
        }

        Ok(rpc_response.result)
    }

    async fn call_typed<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, RpcError> {
        let value = self.request(method, params).await?;
        if value.is_null() {
            return Err(RpcError::Parse(format!("{method}: missing result")));
        }
        serde_json::from_value(value).map_err(|e| RpcError::Parse(format!("{method}: {e}")))
    }
}

#[async_trait]
impl ChainProvider for JsonRpcClient {
    async fn call(&self, request: &CallRequest) -> Result<Bytes, RpcError> {
        self.call_typed("eth_call", (request, "latest")).await
    }

    async fn send_transaction(&self, request: &TransactionRequest) -> Result<TxHash, RpcError> {
        self.call_typed("eth_sendTransaction", [request]).await
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>, RpcError> {
        let value = self.request("eth_getTransactionReceipt", [hash]).await?;
        if value.is_null() {
            return Ok(None);
        }
        let raw: RawReceipt = serde_json::from_value(value)
            .map_err(|e| RpcError::Parse(format!("eth_getTransactionReceipt: {e}")))?;
        raw.into_receipt().map(Some)
    }

    async fn accounts(&self) -> Result<Vec<Address>, RpcError> {
        self.call_typed("eth_accounts", Vec::<()>::new()).await
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError> {
        match self
            .call_typed("eth_requestAccounts", Vec::<()>::new())
            .await
        {
            Err(e) if e.is_method_not_found() => {
                warn!("eth_requestAccounts unsupported, falling back to eth_accounts");
                self.accounts().await
            }
            other => other,
        }
    }

    async fn chain_id(&self) -> Result<u64, RpcError> {
        let result: String = self.call_typed("eth_chainId", Vec::<()>::new()).await?;
        parse_hex_u64(&result).map_err(|e| RpcError::Parse(format!("eth_chainId: {e}")))
    }
}

#[async_trait]
impl WalletProvider for JsonRpcClient {
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError> {
        ChainProvider::request_accounts(self).await
    }
}

/// Wallet backed by a single configured account.
#[derive(Debug, Clone, Copy)]
pub struct FixedAccount(pub Address);

#[async_trait]
impl WalletProvider for FixedAccount {
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError> {
        Ok(vec![self.0])
    }
}
