//! Compiled-in deployment targets and contract addresses.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::types::Address;

/// The deployed payroll contract the client talks to.
pub const PAYROLL_CONTRACT: Address = Address::from_bytes([
    0xca, 0xf8, 0x71, 0xe7, 0x5f, 0xb2, 0x04, 0x0b, 0xd1, 0x85, 0xb3, 0x50, 0x31, 0xbb, 0x7b, 0x1c,
    0xeb, 0x1b, 0x24, 0x86,
]);

/// Token whose balance the funds panel displays.
pub const UI_TOKEN: Address = Address::from_bytes([
    0x36, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
]);

const SEPOLIA_TOKEN: Address = Address::from_bytes([
    0x1c, 0x7d, 0x4b, 0x19, 0x6c, 0xb0, 0xc7, 0xb0, 0x1d, 0x74, 0x3f, 0xbc, 0x61, 0x16, 0xa9, 0x02,
    0x37, 0x9c, 0x72, 0x38,
]);

const BSC_TESTNET_TOKEN: Address = Address::from_bytes([
    0x6b, 0x90, 0x69, 0x42, 0x0a, 0x3d, 0x4c, 0x6d, 0x98, 0x73, 0x80, 0x7f, 0xd8, 0xa5, 0xd4, 0x6c,
    0x86, 0x5e, 0x66, 0x99,
]);

/// Environment variable holding the Sepolia RPC endpoint.
pub const SEPOLIA_RPC_ENV: &str = "SEPOLIA_RPC_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Sepolia,
    ArcTestnet,
    BscTestnet,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Sepolia, Network::ArcTestnet, Network::BscTestnet];

    pub fn name(&self) -> &'static str {
        match self {
            Network::Sepolia => "sepolia",
            Network::ArcTestnet => "arc-testnet",
            Network::BscTestnet => "bsc-testnet",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Sepolia => 11_155_111,
            Network::ArcTestnet => 5_042_002,
            Network::BscTestnet => 97,
        }
    }

    /// Default RPC endpoint. Sepolia has none compiled in and reads
    /// `SEPOLIA_RPC_URL` instead.
    pub fn default_rpc_url(&self) -> Option<String> {
        match self {
            Network::Sepolia => std::env::var(SEPOLIA_RPC_ENV).ok(),
            Network::ArcTestnet => Some("https://rpc.testnet.arc.network".to_string()),
            Network::BscTestnet => {
                Some("https://data-seed-prebsc-1-s1.binance.org:8545/".to_string())
            }
        }
    }

    /// Token the payroll contract is constructed with on this network.
    pub fn token_address(&self) -> Address {
        match self {
            Network::Sepolia => SEPOLIA_TOKEN,
            Network::ArcTestnet => UI_TOKEN,
            Network::BscTestnet => BSC_TESTNET_TOKEN,
        }
    }

    /// Prefix printed before the deployed address.
    pub fn deploy_label(&self) -> &'static str {
        match self {
            Network::Sepolia => "",
            Network::ArcTestnet => "ARC ",
            Network::BscTestnet => "BNB ",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown network '{0}' (expected sepolia, arc-testnet or bsc-testnet)")]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sepolia" => Ok(Network::Sepolia),
            "arc-testnet" | "arctestnet" | "arc" => Ok(Network::ArcTestnet),
            "bsc-testnet" | "bsctestnet" | "bsc" => Ok(Network::BscTestnet),
            _ => Err(UnknownNetwork(s.to_string())),
        }
    }
}
