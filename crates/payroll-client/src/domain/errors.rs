//! # Error Types
//!
//! All error types for the payroll client, grouped by the stage that
//! produces them: input validation, ABI decoding, transport, reads, writes.

use thiserror::Error;

// =============================================================================
// INPUT VALIDATION
// =============================================================================

/// User input rejected before any request is dispatched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("address checksum mismatch: {0}")]
    BadChecksum(String),

    #[error("salary is required")]
    MissingSalary,

    #[error("invalid salary: {0}")]
    InvalidSalary(#[from] AmountError),
}

/// Fixed-point amount parsing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("not a decimal number: {0}")]
    NotDecimal(String),

    #[error("too many decimal places: {found} > {max}")]
    TooManyDecimals { found: usize, max: u32 },

    #[error("amount does not fit in uint256")]
    Overflow,
}

// =============================================================================
// ABI
// =============================================================================

/// Return data could not be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("return data too short: expected {expected} bytes, got {actual}")]
    ShortData { expected: usize, actual: usize },

    #[error("address word has non-zero high bytes")]
    DirtyAddress,

    #[error("bool word is neither 0 nor 1")]
    InvalidBool,
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// JSON-RPC error code used by EIP-1193 wallets when the user declines.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Errors talking to the JSON-RPC node.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl RpcError {
    pub fn is_method_not_found(&self) -> bool {
        matches!(self, RpcError::Rpc { code: -32601, .. })
    }

    fn is_revert(&self) -> bool {
        match self {
            RpcError::Rpc { code, message } => *code == 3 || message.contains("revert"),
            _ => false,
        }
    }
}

// =============================================================================
// READS AND WRITES
// =============================================================================

/// A contract read failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("transport: {0}")]
    Transport(RpcError),

    #[error("call reverted: {0}")]
    Reverted(String),

    #[error("decode: {0}")]
    Decode(#[from] AbiError),

    #[error("employee count {0} exceeds the roster limit")]
    CountOutOfRange(String),
}

impl From<RpcError> for ReadError {
    fn from(e: RpcError) -> Self {
        if e.is_revert() {
            ReadError::Reverted(e.to_string())
        } else {
            ReadError::Transport(e)
        }
    }
}

/// A write never produced a transaction hash.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("wallet is not connected")]
    NotConnected,

    #[error("rejected by wallet: {0}")]
    Rejected(String),

    #[error("node error: {0}")]
    Node(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl From<RpcError> for SubmitError {
    fn from(e: RpcError) -> Self {
        match e {
            RpcError::Rpc {
                code: USER_REJECTED_CODE,
                message,
            } => SubmitError::Rejected(message),
            other => SubmitError::Node(other.to_string()),
        }
    }
}

/// Contract deployment failures.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("bytecode is empty")]
    EmptyBytecode,

    #[error("failed to read artifact {path}: {source}")]
    Artifact {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact is not valid hex or a Hardhat JSON artifact")]
    MalformedArtifact,

    #[error("failed to read chain id: {0}")]
    ChainId(#[source] RpcError),

    #[error("node reports chain {actual}, expected {expected}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Receipt(#[from] ReadError),

    #[error("deployment transaction {0} reverted")]
    Reverted(String),

    #[error("receipt for {0} carries no contract address")]
    MissingContractAddress(String),
}
