//! Wallet connection state.

use tracing::info;

use crate::domain::{Address, RpcError};
use crate::ports::WalletProvider;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalletSession {
    #[default]
    Disconnected,
    Connected {
        account: Address,
    },
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("wallet exposed no accounts")]
    NoAccounts,

    #[error(transparent)]
    Provider(#[from] RpcError),
}

impl WalletSession {
    /// Ask the provider for accounts and take the first.
    pub async fn connect(provider: &dyn WalletProvider) -> Result<Self, ConnectError> {
        let accounts = provider.request_accounts().await?;
        let account = accounts.first().copied().ok_or(ConnectError::NoAccounts)?;
        info!(account = %account, "wallet connected");
        Ok(WalletSession::Connected { account })
    }

    pub fn account(&self) -> Option<Address> {
        match self {
            WalletSession::Connected { account } => Some(*account),
            WalletSession::Disconnected => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.account().is_some()
    }
}
