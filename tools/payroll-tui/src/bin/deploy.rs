//! payroll-deploy: deploy the payroll contract to a supported network.
//!
//! ```bash
//! payroll-deploy --network arc-testnet --bytecode artifacts/SimplePayroll.json
//! ```
//!
//! The constructor receives the network's payroll token address. On
//! success the deployed address is printed to stdout.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use payroll_client::{
    deploy, load_bytecode, Address, ChainProvider, JsonRpcClient, Network, SEPOLIA_RPC_ENV,
};
use payroll_telemetry::{init_logging, TelemetryConfig};
use tracing::info;

/// Deploy the payroll contract
#[derive(Parser, Debug)]
#[command(name = "payroll-deploy")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Target network (sepolia, arc-testnet, bsc-testnet)
    #[arg(long)]
    network: Network,

    /// Compiled contract: raw hex or a JSON artifact with a "bytecode" field
    #[arg(long)]
    bytecode: PathBuf,

    /// JSON-RPC endpoint URL (defaults to the network's public endpoint)
    #[arg(long)]
    rpc_url: Option<String>,

    /// Deployer account (defaults to the node's first account)
    #[arg(long)]
    from: Option<Address>,

    /// Receipt poll interval in milliseconds
    #[arg(long, default_value = "2000")]
    poll_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&TelemetryConfig::from_env("payroll-deploy"))
        .context("failed to initialize logging")?;

    let rpc_url = match args.rpc_url.or_else(|| args.network.default_rpc_url()) {
        Some(url) => url,
        None => bail!(
            "no RPC endpoint for {}: pass --rpc-url or set {}",
            args.network,
            SEPOLIA_RPC_ENV
        ),
    };
    let rpc = JsonRpcClient::new(rpc_url.clone())?;

    let from = match args.from {
        Some(from) => from,
        None => *rpc
            .accounts()
            .await
            .context("failed to list node accounts")?
            .first()
            .context("node has no unlocked accounts; pass --from")?,
    };

    let bytecode = load_bytecode(&args.bytecode)
        .with_context(|| format!("failed to load {}", args.bytecode.display()))?;

    info!(
        network = %args.network,
        rpc_url = %rpc_url,
        from = %from,
        token = %args.network.token_address(),
        "deploying payroll contract"
    );

    let deployment = deploy(
        &rpc,
        args.network,
        from,
        &bytecode,
        Duration::from_millis(args.poll_ms),
    )
    .await?;

    println!("{}", deployment.message());
    Ok(())
}
