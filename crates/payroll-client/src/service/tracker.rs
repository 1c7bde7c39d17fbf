//! Keyed transaction tracker.
//!
//! Every submitted hash gets its own watch entry, so a second write issued
//! while the first is still confirming does not replace it. Entries leave
//! the map when a receipt settles them.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::domain::{ActionKind, ReceiptStatus, TxHash, TxReceipt};
use crate::ports::Timestamp;

/// A submitted transaction awaiting its receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedTransaction {
    pub hash: TxHash,
    pub action: ActionKind,
    pub submitted_at: Timestamp,
}

/// A transaction whose receipt has been observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettledTransaction {
    pub hash: TxHash,
    pub action: ActionKind,
    pub status: ReceiptStatus,
    pub block_number: Option<u64>,
}

#[derive(Debug, Default)]
pub struct TrackerStats {
    pub total_tracked: AtomicU64,
    pub total_confirmed: AtomicU64,
    pub total_reverted: AtomicU64,
}

#[derive(Debug, Default)]
pub struct TransactionTracker {
    pending: DashMap<TxHash, TrackedTransaction>,
    /// Most recent submission, regardless of whether it is still pending.
    latest: RwLock<Option<TxHash>>,
    stats: TrackerStats,
}

impl TransactionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `hash`. It becomes the latest submission.
    pub fn track(&self, hash: TxHash, action: ActionKind, now: Timestamp) {
        let entry = TrackedTransaction {
            hash,
            action,
            submitted_at: now,
        };
        if self.pending.insert(hash, entry).is_some() {
            warn!(tx_hash = %hash, "transaction was already tracked");
        } else {
            self.stats.total_tracked.fetch_add(1, Ordering::Relaxed);
        }
        *self.latest.write() = Some(hash);

        debug!(
            tx_hash = %hash,
            action = ?action,
            pending = self.pending.len(),
            "tracking transaction"
        );
    }

    /// The most recent submission, if it is still awaiting a receipt.
    pub fn latest(&self) -> Option<TrackedTransaction> {
        let hash = (*self.latest.read())?;
        self.pending.get(&hash).map(|entry| *entry)
    }

    /// All pending transactions, oldest first.
    pub fn pending(&self) -> Vec<TrackedTransaction> {
        let mut all: Vec<_> = self.pending.iter().map(|entry| *entry.value()).collect();
        all.sort_by_key(|tx| tx.submitted_at);
        all
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, hash: &TxHash) -> bool {
        self.pending.contains_key(hash)
    }

    /// True while any transaction of `action` awaits its receipt.
    pub fn is_confirming(&self, action: ActionKind) -> bool {
        self.pending.iter().any(|entry| entry.action == action)
    }

    /// Record the receipt for a tracked hash and stop watching it.
    ///
    /// Returns `None` for hashes that are not tracked.
    pub fn settle(&self, receipt: &TxReceipt) -> Option<SettledTransaction> {
        let (hash, tracked) = self.pending.remove(&receipt.transaction_hash)?;

        match receipt.status {
            ReceiptStatus::Success => {
                self.stats.total_confirmed.fetch_add(1, Ordering::Relaxed);
                info!(
                    tx_hash = %hash,
                    action = ?tracked.action,
                    block = ?receipt.block_number,
                    "transaction confirmed"
                );
            }
            ReceiptStatus::Reverted => {
                self.stats.total_reverted.fetch_add(1, Ordering::Relaxed);
                warn!(
                    tx_hash = %hash,
                    action = ?tracked.action,
                    block = ?receipt.block_number,
                    "transaction reverted"
                );
            }
        }

        Some(SettledTransaction {
            hash,
            action: tracked.action,
            status: receipt.status,
            block_number: receipt.block_number,
        })
    }

    pub fn stats(&self) -> &TrackerStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(hash: TxHash, status: ReceiptStatus) -> TxReceipt {
        TxReceipt {
            transaction_hash: hash,
            block_number: Some(1),
            status,
            contract_address: None,
        }
    }

    #[test]
    fn test_two_writes_are_tracked_independently() {
        let tracker = TransactionTracker::new();
        let first = TxHash::from_low_u64(1);
        let second = TxHash::from_low_u64(2);

        tracker.track(first, ActionKind::AddEmployee, 100);
        tracker.track(second, ActionKind::PaySalaries, 200);

        assert_eq!(tracker.latest().map(|tx| tx.hash), Some(second));
        assert_eq!(tracker.pending_count(), 2);

        // The first confirmation is still observed after the second was sent.
        let settled = tracker
            .settle(&receipt(first, ReceiptStatus::Success))
            .unwrap();
        assert_eq!(settled.action, ActionKind::AddEmployee);
        assert_eq!(tracker.latest().map(|tx| tx.hash), Some(second));

        tracker.settle(&receipt(second, ReceiptStatus::Success)).unwrap();
        assert!(tracker.latest().is_none());
        assert_eq!(tracker.stats().total_confirmed.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_pending_is_oldest_first() {
        let tracker = TransactionTracker::new();
        tracker.track(TxHash::from_low_u64(9), ActionKind::PaySalaries, 300);
        tracker.track(TxHash::from_low_u64(8), ActionKind::AddEmployee, 100);
        let order: Vec<_> = tracker.pending().iter().map(|tx| tx.submitted_at).collect();
        assert_eq!(order, vec![100, 300]);
    }

    #[test]
    fn test_is_confirming_per_action() {
        let tracker = TransactionTracker::new();
        tracker.track(TxHash::from_low_u64(1), ActionKind::PaySalaries, 0);
        assert!(tracker.is_confirming(ActionKind::PaySalaries));
        assert!(!tracker.is_confirming(ActionKind::AddEmployee));
    }

    #[test]
    fn test_reverted_receipt_settles() {
        let tracker = TransactionTracker::new();
        let hash = TxHash::from_low_u64(5);
        tracker.track(hash, ActionKind::RemoveEmployee, 0);

        let settled = tracker
            .settle(&receipt(hash, ReceiptStatus::Reverted))
            .unwrap();
        assert_eq!(settled.status, ReceiptStatus::Reverted);
        assert!(!tracker.is_pending(&hash));
        assert_eq!(tracker.stats().total_reverted.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_unknown_receipt_ignored() {
        let tracker = TransactionTracker::new();
        assert!(tracker
            .settle(&receipt(TxHash::from_low_u64(1), ReceiptStatus::Success))
            .is_none());
    }
}
