//! Adapters implementing the outbound ports.

pub mod contract;
pub mod rpc;

pub use contract::PayrollContract;
pub use rpc::{FixedAccount, JsonRpcClient, DEFAULT_TIMEOUT};
