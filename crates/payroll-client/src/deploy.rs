//! Payroll contract deployment.
//!
//! The constructor takes the payout token address, which is fixed per
//! network and appended to the creation bytecode.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::domain::abi::{encode_args, Token};
use crate::domain::{
    Address, Bytes, DeployError, Network, ReadError, SubmitError, TransactionRequest, TxHash,
};
use crate::ports::ChainProvider;

/// A mined deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub network: Network,
    pub address: Address,
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
}

impl Deployment {
    pub fn message(&self) -> String {
        deployment_message(self.network, self.address)
    }
}

/// Line printed once the contract is live.
pub fn deployment_message(network: Network, address: Address) -> String {
    format!(
        "Payroll contract deployed to: {}{}",
        network.deploy_label(),
        address
    )
}

/// Creation bytecode followed by the ABI-encoded constructor argument.
pub fn creation_data(bytecode: &Bytes, token: Address) -> Result<Bytes, DeployError> {
    if bytecode.is_empty() {
        return Err(DeployError::EmptyBytecode);
    }
    let mut data = bytecode.as_slice().to_vec();
    data.extend_from_slice(&encode_args(&[Token::Address(token)]));
    Ok(Bytes(data))
}

/// Load creation bytecode from a hex file or a Hardhat artifact JSON.
pub fn load_bytecode(path: &Path) -> Result<Bytes, DeployError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DeployError::Artifact {
        path: path.display().to_string(),
        source,
    })?;
    parse_bytecode(&raw)
}

fn parse_bytecode(raw: &str) -> Result<Bytes, DeployError> {
    let raw = raw.trim();
    let hex = if raw.starts_with('{') {
        let artifact: serde_json::Value =
            serde_json::from_str(raw).map_err(|_| DeployError::MalformedArtifact)?;
        artifact
            .get("bytecode")
            .and_then(|v| v.as_str())
            .ok_or(DeployError::MalformedArtifact)?
            .to_string()
    } else {
        raw.to_string()
    };

    let bytes = Bytes::from_hex(&hex).map_err(|_| DeployError::MalformedArtifact)?;
    if bytes.is_empty() {
        return Err(DeployError::EmptyBytecode);
    }
    Ok(bytes)
}

/// Deploy to `network` from `from` and wait for the receipt.
///
/// There is no overall timeout: the receipt is polled every
/// `poll_interval` until the node returns one.
pub async fn deploy(
    provider: &dyn ChainProvider,
    network: Network,
    from: Address,
    bytecode: &Bytes,
    poll_interval: Duration,
) -> Result<Deployment, DeployError> {
    let chain_id = provider.chain_id().await.map_err(DeployError::ChainId)?;
    if chain_id != network.chain_id() {
        return Err(DeployError::ChainMismatch {
            expected: network.chain_id(),
            actual: chain_id,
        });
    }

    let token = network.token_address();
    let request = TransactionRequest {
        from,
        to: None,
        data: creation_data(bytecode, token)?,
    };

    info!(network = %network, token = %token, from = %from, "deploying payroll contract");

    let hash = provider
        .send_transaction(&request)
        .await
        .map_err(SubmitError::from)?;

    info!(tx_hash = %hash, "deployment submitted");

    let receipt = loop {
        let polled = provider
            .transaction_receipt(hash)
            .await
            .map_err(ReadError::from)?;
        match polled {
            Some(receipt) => break receipt,
            None => {
                debug!(tx_hash = %hash, "deployment pending");
                tokio::time::sleep(poll_interval).await;
            }
        }
    };

    if !receipt.succeeded() {
        return Err(DeployError::Reverted(hash.to_string()));
    }
    let address = receipt
        .contract_address
        .ok_or_else(|| DeployError::MissingContractAddress(hash.to_string()))?;

    info!(address = %address, block = ?receipt.block_number, "payroll contract deployed");

    Ok(Deployment {
        network,
        address,
        transaction_hash: hash,
        block_number: receipt.block_number,
    })
}
