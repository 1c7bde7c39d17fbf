//! payroll-tui: single-page terminal client for the payroll contract.
//!
//! Connects a wallet account, shows the contract's token balance and the
//! employee roster, and submits add/remove/pay transactions. All chain
//! access goes through the node's JSON-RPC endpoint.
//!
//! ## Usage
//!
//! ```bash
//! # Arc testnet with the deployed contract (default)
//! payroll-tui
//!
//! # Local node, fixed sender account
//! payroll-tui --rpc-url http://localhost:8545 --account 0x...
//! ```
//!
//! Logs go to `payroll-tui.log` unless `PAYROLL_LOG_FILE` says otherwise.

mod app;
mod ui;
mod worker;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use payroll_client::{
    Address, DashboardSnapshot, FixedAccount, JsonRpcClient, Network, PayrollConfig,
    PayrollContract, PayrollDashboard, SystemTimeSource, WalletProvider,
};
use payroll_telemetry::{init_logging, TelemetryConfig};
use ratatui::prelude::*;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use app::App;
use worker::Command;

/// Payroll terminal client
#[derive(Parser, Debug)]
#[command(name = "payroll-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Network to use (sepolia, arc-testnet, bsc-testnet)
    #[arg(long)]
    network: Option<Network>,

    /// JSON-RPC endpoint URL (defaults to the network's public endpoint)
    #[arg(long)]
    rpc_url: Option<String>,

    /// Payroll contract address
    #[arg(long)]
    contract: Option<Address>,

    /// Payroll token address
    #[arg(long)]
    token: Option<Address>,

    /// Sender account instead of asking the node
    #[arg(long)]
    account: Option<Address>,

    /// Receipt and refresh interval in milliseconds
    #[arg(long)]
    poll_ms: Option<u64>,
}

impl Args {
    /// Flags win over `PAYROLL_*` variables.
    fn apply(self, mut config: PayrollConfig) -> PayrollConfig {
        if let Some(network) = self.network {
            config.network = network;
        }
        if self.rpc_url.is_some() {
            config.rpc_url = self.rpc_url;
        }
        if let Some(contract) = self.contract {
            config.payroll_contract = contract;
        }
        if let Some(token) = self.token {
            config.token = token;
        }
        if self.account.is_some() {
            config.account = self.account;
        }
        if let Some(ms) = self.poll_ms {
            config.poll_interval = Duration::from_millis(ms);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let telemetry = TelemetryConfig::from_env("payroll-tui").with_default_file("payroll-tui.log");
    init_logging(&telemetry).context("failed to initialize logging")?;

    let config = args.apply(PayrollConfig::from_env()?);
    let rpc_url = config.resolved_rpc_url()?;
    info!(
        network = %config.network,
        rpc_url = %rpc_url,
        contract = %config.payroll_contract,
        "starting payroll-tui"
    );

    let rpc = Arc::new(JsonRpcClient::with_timeout(rpc_url, config.request_timeout)?);
    let contract = Arc::new(PayrollContract::new(
        Arc::clone(&rpc),
        config.payroll_contract,
        config.token,
    ));
    let wallet: Arc<dyn WalletProvider> = match config.account {
        Some(account) => Arc::new(FixedAccount(account)),
        None => rpc,
    };

    let dashboard = PayrollDashboard::new(
        contract.clone(),
        contract,
        wallet,
        Arc::new(SystemTimeSource),
    )
    .with_notice_duration(config.notice_duration.as_millis() as u64);
    let snapshots = dashboard.subscribe();

    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let worker = tokio::spawn(worker::run(dashboard, cmd_rx, config.poll_interval));

    // Setup terminal with panic hook for cleanup
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.network, config.payroll_contract);
    let result = run_app(&mut terminal, &mut app, snapshots, &cmd_tx).await;

    let _ = cmd_tx.send(Command::Shutdown).await;
    if let Err(e) = worker.await {
        error!(error = %e, "worker task failed");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        error!(error = %e, "terminal loop failed");
        eprintln!("Error: {}", e);
    }

    Ok(())
}

/// Main application loop.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut snapshots: watch::Receiver<DashboardSnapshot>,
    commands: &mpsc::Sender<Command>,
) -> Result<()> {
    let poll_timeout = Duration::from_millis(100);

    loop {
        if snapshots.has_changed().unwrap_or(false) {
            app.sync(snapshots.borrow_and_update().clone());
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(poll_timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(command) = app.on_key(key.code) {
                        commands
                            .send(command)
                            .await
                            .context("worker stopped unexpectedly")?;
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
