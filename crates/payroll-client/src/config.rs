//! Client configuration with compiled-in defaults and environment overrides.

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::adapters::DEFAULT_TIMEOUT;
use crate::domain::{Address, Network, UnknownNetwork, ValidationError, PAYROLL_CONTRACT, UI_TOKEN};
use crate::service::DEFAULT_NOTICE_MS;

/// Default receipt poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Network(#[from] UnknownNetwork),

    #[error("{var}: {source}")]
    Address {
        var: &'static str,
        #[source]
        source: ValidationError,
    },

    #[error("{var}: expected milliseconds, got '{value}'")]
    Duration { var: &'static str, value: String },

    #[error("no RPC URL for {0}; set PAYROLL_RPC_URL or SEPOLIA_RPC_URL")]
    MissingRpcUrl(Network),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollConfig {
    pub network: Network,
    /// Overrides the network's default endpoint.
    pub rpc_url: Option<String>,
    pub payroll_contract: Address,
    /// Token whose balance the funds panel shows.
    pub token: Address,
    /// Use this account instead of asking the node.
    pub account: Option<Address>,
    pub poll_interval: Duration,
    pub notice_duration: Duration,
    pub request_timeout: Duration,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            network: Network::ArcTestnet,
            rpc_url: None,
            payroll_contract: PAYROLL_CONTRACT,
            token: UI_TOKEN,
            account: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            notice_duration: Duration::from_millis(DEFAULT_NOTICE_MS),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl PayrollConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PAYROLL_NETWORK`: sepolia, arc-testnet or bsc-testnet (default: arc-testnet)
    /// - `PAYROLL_RPC_URL`: RPC endpoint override
    /// - `PAYROLL_CONTRACT`: payroll contract address
    /// - `PAYROLL_TOKEN`: token shown in the funds panel
    /// - `PAYROLL_ACCOUNT`: sending account
    /// - `PAYROLL_POLL_INTERVAL_MS`: receipt poll interval (default: 2000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(network) = lookup("PAYROLL_NETWORK") {
            config.network = network.parse()?;
        }
        config.rpc_url = lookup("PAYROLL_RPC_URL").filter(|url| !url.trim().is_empty());

        let address = |var: &'static str| -> Result<Option<Address>, ConfigError> {
            lookup(var)
                .map(|v| {
                    v.trim()
                        .parse()
                        .map_err(|source| ConfigError::Address { var, source })
                })
                .transpose()
        };
        if let Some(contract) = address("PAYROLL_CONTRACT")? {
            config.payroll_contract = contract;
        }
        if let Some(token) = address("PAYROLL_TOKEN")? {
            config.token = token;
        }
        config.account = address("PAYROLL_ACCOUNT")?;

        if let Some(value) = lookup("PAYROLL_POLL_INTERVAL_MS") {
            let ms: u64 = value.trim().parse().map_err(|_| ConfigError::Duration {
                var: "PAYROLL_POLL_INTERVAL_MS",
                value: value.clone(),
            })?;
            config.poll_interval = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// The endpoint to use: the override, else the network default.
    pub fn resolved_rpc_url(&self) -> Result<String, ConfigError> {
        self.rpc_url
            .clone()
            .or_else(|| self.network.default_rpc_url())
            .ok_or(ConfigError::MissingRpcUrl(self.network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PayrollConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PayrollConfig::default());
        assert_eq!(config.network, Network::ArcTestnet);
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.notice_duration, Duration::from_secs(4));
        assert_eq!(
            config.resolved_rpc_url().unwrap(),
            "https://rpc.testnet.arc.network"
        );
    }

    #[test]
    fn test_overrides() {
        let config = PayrollConfig::from_lookup(lookup(&[
            ("PAYROLL_NETWORK", "bsc-testnet"),
            ("PAYROLL_RPC_URL", "http://localhost:8545"),
            ("PAYROLL_ACCOUNT", "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"),
            ("PAYROLL_POLL_INTERVAL_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(config.network, Network::BscTestnet);
        assert_eq!(config.resolved_rpc_url().unwrap(), "http://localhost:8545");
        assert!(config.account.is_some());
        assert_eq!(config.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            PayrollConfig::from_lookup(lookup(&[("PAYROLL_NETWORK", "mainnet")])),
            Err(ConfigError::Network(_))
        ));
        assert!(matches!(
            PayrollConfig::from_lookup(lookup(&[("PAYROLL_CONTRACT", "0x12")])),
            Err(ConfigError::Address {
                var: "PAYROLL_CONTRACT",
                ..
            })
        ));
        assert!(matches!(
            PayrollConfig::from_lookup(lookup(&[("PAYROLL_POLL_INTERVAL_MS", "soon")])),
            Err(ConfigError::Duration { .. })
        ));
    }
}
