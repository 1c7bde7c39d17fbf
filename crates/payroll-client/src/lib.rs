//! # Payroll Client
//!
//! Client library for a fixed on-chain payroll contract: add and remove
//! employees, pay all salaries in one transaction, and read the roster
//! and the contract's token balance.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      PayrollDashboard                         │
//! │   WalletSession · Query<balance> · Query<count> · notice      │
//! ├───────────────────────┬──────────────────────────────────────┤
//! │     RosterFetcher     │        TransactionTracker            │
//! │ count → addresses →   │   hash → pending watch (keyed)       │
//! │ records (per-slot)    │   latest() follows newest submit     │
//! ├───────────────────────┴──────────────────────────────────────┤
//! │        PayrollReader / PayrollWriter / WalletProvider         │
//! ├──────────────────────────────────────────────────────────────┤
//! │   PayrollContract<P> (ABI codec)  ──▶  JsonRpcClient (HTTP)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read Pipeline
//!
//! | Stage | Call | Gate |
//! |-------|------|------|
//! | 1 | `getEmployeeCount()` | wallet connected |
//! | 2 | `employeeAddresses(i)` for `i in 0..count` | count > 0 |
//! | 3 | `employees(addr)` per resolved address | stage 2 settled |
//!
//! A confirmed write marks the balance and the count stale; the next tick
//! refetches both and the count drives the rest of the pipeline.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use payroll_client::{JsonRpcClient, PayrollContract, PayrollDashboard, SystemTimeSource};
//!
//! let rpc = Arc::new(JsonRpcClient::new("https://rpc.testnet.arc.network")?);
//! let contract = Arc::new(PayrollContract::new(rpc.clone(), PAYROLL_CONTRACT, UI_TOKEN));
//! let mut dashboard = PayrollDashboard::new(contract.clone(), contract, rpc, Arc::new(SystemTimeSource));
//! dashboard.connect().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod config;
pub mod deploy;
pub mod domain;
pub mod ports;
pub mod service;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use adapters::{FixedAccount, JsonRpcClient, PayrollContract};
pub use config::{ConfigError, PayrollConfig};
pub use deploy::{deploy, deployment_message, load_bytecode, Deployment};
pub use domain::*;
pub use ports::{
    ChainProvider, PayrollReader, PayrollWriter, SystemTimeSource, TimeSource, Timestamp,
    WalletProvider,
};
pub use service::*;
pub use validation::{AddEmployeeForm, ValidatedEmployee};
