//! Three-stage roster read: count, then addresses, then records.
//!
//! Each stage only starts once the previous one has settled. Within a stage
//! every read runs concurrently and yields its own [`SlotResult`], so one
//! failing slot never hides the others.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{AddressSlot, ReadError, RecordSlot, Roster, SlotResult, U256};
use crate::ports::PayrollReader;

/// Largest employee count the address stage will fan out over.
pub const MAX_ROSTER_SIZE: u64 = 10_000;

pub struct RosterFetcher {
    reader: Arc<dyn PayrollReader>,
}

impl RosterFetcher {
    pub fn new(reader: Arc<dyn PayrollReader>) -> Self {
        Self { reader }
    }

    /// Stage 1: the employee counter.
    pub async fn fetch_count(&self) -> Result<U256, ReadError> {
        let count = self.reader.employee_count().await?;
        debug!(count = %count, "employee count");
        Ok(count)
    }

    /// Stage 2: one `employeeAddresses(i)` read per index in `[0, count)`.
    ///
    /// A zero count issues no reads. Counts above [`MAX_ROSTER_SIZE`] are
    /// rejected before any read is issued.
    pub async fn fetch_addresses(&self, count: U256) -> Result<Vec<AddressSlot>, ReadError> {
        if count > U256::from(MAX_ROSTER_SIZE) {
            warn!(count = %count, limit = MAX_ROSTER_SIZE, "employee count over roster limit");
            return Err(ReadError::CountOutOfRange(count.to_string()));
        }
        let count = count.as_u64();

        let reads = (0..count).map(|index| {
            let reader = Arc::clone(&self.reader);
            async move {
                let result = reader.employee_address(U256::from(index)).await;
                if let Err(e) = &result {
                    warn!(index, error = %e, "employee address read failed");
                }
                AddressSlot {
                    index,
                    result: result.into(),
                }
            }
        });

        Ok(join_all(reads).await)
    }

    /// Stage 3: one `employees(addr)` read per resolved address.
    pub async fn fetch_records(&self, addresses: &[AddressSlot]) -> Vec<RecordSlot> {
        let reads = addresses
            .iter()
            .filter_map(|slot| slot.result.ok().copied())
            .map(|address| {
                let reader = Arc::clone(&self.reader);
                async move {
                    let result = reader.employee(address).await;
                    if let Err(e) = &result {
                        warn!(address = %address, error = %e, "employee record read failed");
                    }
                    RecordSlot {
                        address,
                        result: SlotResult::from(result),
                    }
                }
            });

        join_all(reads).await
    }

    /// All three stages in order.
    pub async fn fetch(&self) -> Result<Roster, ReadError> {
        let count = self.fetch_count().await?;
        let addresses = self.fetch_addresses(count).await?;
        let records = self.fetch_records(&addresses).await;
        Ok(Roster {
            count,
            addresses,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockChain;

    fn wallet(n: u8) -> crate::domain::Address {
        crate::domain::Address::from_bytes([n; 20])
    }

    #[tokio::test]
    async fn test_zero_count_issues_no_address_reads() {
        let chain = Arc::new(MockChain::new());
        let fetcher = RosterFetcher::new(chain.clone());

        let roster = fetcher.fetch().await.unwrap();
        assert!(roster.count.is_zero());
        assert!(roster.addresses.is_empty());
        assert!(roster.records.is_empty());
        assert_eq!(chain.address_reads(), 0);
        assert_eq!(chain.record_reads(), 0);
    }

    #[tokio::test]
    async fn test_one_read_per_index_and_per_resolved_address() {
        let chain = Arc::new(MockChain::new());
        for n in 1..=3 {
            chain.add_employee(wallet(n), 1_000_000 * n as u64);
        }
        chain.fail_address_index(1);

        let fetcher = RosterFetcher::new(chain.clone());
        let roster = fetcher.fetch().await.unwrap();

        assert_eq!(roster.count, U256::from(3));
        assert_eq!(chain.address_reads(), 3);
        assert_eq!(roster.addresses.len(), 3);
        assert!(!roster.addresses[1].result.is_resolved());

        // Only the two resolved addresses get a record read.
        assert_eq!(chain.record_reads(), 2);
        assert_eq!(roster.records.len(), 2);
        assert_eq!(roster.resolved_addresses(), vec![wallet(1), wallet(3)]);
    }

    #[tokio::test]
    async fn test_failed_record_does_not_block_others() {
        let chain = Arc::new(MockChain::new());
        chain.add_employee(wallet(1), 1_000_000);
        chain.add_employee(wallet(2), 2_000_000);
        chain.fail_record(wallet(1));

        let roster = RosterFetcher::new(chain.clone()).fetch().await.unwrap();

        assert!(matches!(roster.records[0].result, SlotResult::Failed(_)));
        let employees = roster.employees();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].wallet, wallet(2));
        assert_eq!(employees[0].monthly_salary.to_string(), "2");
    }

    #[tokio::test]
    async fn test_count_failure_propagates() {
        let chain = Arc::new(MockChain::new());
        chain.fail_count(true);
        let err = RosterFetcher::new(chain).fetch().await.unwrap_err();
        assert!(matches!(err, ReadError::Transport(_)));
    }

    #[tokio::test]
    async fn test_count_over_limit_rejected_without_reads() {
        let chain = Arc::new(MockChain::new());
        let fetcher = RosterFetcher::new(chain.clone());

        for count in [
            U256::from(MAX_ROSTER_SIZE + 1),
            U256::from(1u64 << 40),
            U256::MAX,
        ] {
            let err = fetcher.fetch_addresses(count).await.unwrap_err();
            assert!(matches!(err, ReadError::CountOutOfRange(_)));
        }
        assert_eq!(chain.address_reads(), 0);
    }

    #[tokio::test]
    async fn test_count_at_limit_is_read() {
        let chain = Arc::new(MockChain::new());
        let slots = RosterFetcher::new(chain.clone())
            .fetch_addresses(U256::from(MAX_ROSTER_SIZE))
            .await
            .unwrap();
        assert_eq!(slots.len() as u64, MAX_ROSTER_SIZE);
        assert_eq!(chain.address_reads() as u64, MAX_ROSTER_SIZE);
    }
}
