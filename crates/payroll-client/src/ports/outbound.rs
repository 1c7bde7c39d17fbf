//! Outbound (driven) ports.
//!
//! The services depend only on these traits. `ChainProvider` is the raw
//! JSON-RPC surface; `PayrollReader` and `PayrollWriter` are the typed
//! contract surface built on top of it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    Address, Bytes, CallRequest, EmployeeRecord, PayrollCall, ReadError, RpcError, SubmitError,
    TokenAmount, TransactionRequest, TxHash, TxReceipt, U256,
};

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Raw node access.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// `eth_call` against the latest block.
    async fn call(&self, request: &CallRequest) -> Result<Bytes, RpcError>;

    /// `eth_sendTransaction`; the node signs with an unlocked account.
    async fn send_transaction(&self, request: &TransactionRequest) -> Result<TxHash, RpcError>;

    /// `eth_getTransactionReceipt`; `None` while the transaction is pending.
    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>, RpcError>;

    /// `eth_accounts`.
    async fn accounts(&self) -> Result<Vec<Address>, RpcError>;

    /// `eth_requestAccounts`, falling back to `eth_accounts` on nodes that
    /// do not implement it.
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError>;

    /// `eth_chainId`.
    async fn chain_id(&self) -> Result<u64, RpcError>;
}

#[async_trait]
impl<T: ChainProvider + ?Sized> ChainProvider for Arc<T> {
    async fn call(&self, request: &CallRequest) -> Result<Bytes, RpcError> {
        (**self).call(request).await
    }

    async fn send_transaction(&self, request: &TransactionRequest) -> Result<TxHash, RpcError> {
        (**self).send_transaction(request).await
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>, RpcError> {
        (**self).transaction_receipt(hash).await
    }

    async fn accounts(&self) -> Result<Vec<Address>, RpcError> {
        (**self).accounts().await
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError> {
        (**self).request_accounts().await
    }

    async fn chain_id(&self) -> Result<u64, RpcError> {
        (**self).chain_id().await
    }
}

/// Typed reads against the payroll contract and its token.
#[async_trait]
pub trait PayrollReader: Send + Sync {
    async fn employee_count(&self) -> Result<U256, ReadError>;

    async fn employee_address(&self, index: U256) -> Result<Address, ReadError>;

    async fn employee(&self, wallet: Address) -> Result<EmployeeRecord, ReadError>;

    /// Token balance held by the payroll contract.
    async fn contract_balance(&self) -> Result<TokenAmount, ReadError>;
}

/// Typed writes against the payroll contract.
#[async_trait]
pub trait PayrollWriter: Send + Sync {
    /// Submit `call` from `from`. Success means the node accepted the
    /// transaction, not that it was mined.
    async fn submit(&self, from: Address, call: PayrollCall) -> Result<TxHash, SubmitError>;

    async fn receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>, ReadError>;
}

/// Source of the connected account.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError>;
}

/// Time source for notice expiry and transaction ages.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Manually advanced clock.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct MockTimeSource {
    time: std::sync::atomic::AtomicU64,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: std::sync::atomic::AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.time.fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set(&self, time: Timestamp) {
        self.time.store(time, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(std::sync::atomic::Ordering::SeqCst)
    }
}
