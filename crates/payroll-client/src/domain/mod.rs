//! Domain layer: pure types and codecs with no I/O.

pub mod abi;
pub mod amount;
pub mod entities;
pub mod errors;
pub mod network;
pub mod types;

pub use amount::{format_units, parse_units, TokenAmount, TOKEN_DECIMALS, TOKEN_SYMBOL};
pub use entities::*;
pub use errors::*;
pub use network::{Network, UnknownNetwork, PAYROLL_CONTRACT, SEPOLIA_RPC_ENV, UI_TOKEN};
pub use types::{
    is_address, keccak256, parse_hex_u64, Address, Bytes, CallRequest, TransactionRequest,
    TxHash, U256,
};
