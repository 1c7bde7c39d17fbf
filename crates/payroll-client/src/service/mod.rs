//! Application services driven by the terminal UI.

pub mod dashboard;
pub mod query;
pub mod roster;
pub mod tracker;
pub mod wallet;

pub use dashboard::{
    DashboardSnapshot, PayrollDashboard, RosterRow, RowState, DEFAULT_NOTICE_MS,
    INVALID_INPUT_ALERT, SUCCESS_NOTICE,
};
pub use query::Query;
pub use roster::{RosterFetcher, MAX_ROSTER_SIZE};
pub use tracker::{SettledTransaction, TrackedTransaction, TrackerStats, TransactionTracker};
pub use wallet::{ConnectError, WalletSession};
