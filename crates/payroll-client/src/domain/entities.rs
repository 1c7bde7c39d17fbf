//! Domain entities: employee records, roster slots, writes and receipts.

use super::amount::TokenAmount;
use super::types::{Address, TxHash, U256};

/// One employee as stored by the contract.
///
/// Records are never deleted; removal clears `is_currently_employed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub wallet: Address,
    pub monthly_salary: TokenAmount,
    pub is_currently_employed: bool,
}

/// A state-changing call against the payroll contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayrollCall {
    AddEmployee {
        wallet: Address,
        monthly_salary: TokenAmount,
    },
    RemoveEmployee {
        wallet: Address,
    },
    PaySalaries,
}

impl PayrollCall {
    pub fn kind(&self) -> ActionKind {
        match self {
            PayrollCall::AddEmployee { .. } => ActionKind::AddEmployee,
            PayrollCall::RemoveEmployee { .. } => ActionKind::RemoveEmployee,
            PayrollCall::PaySalaries => ActionKind::PaySalaries,
        }
    }
}

/// Which user action produced a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    AddEmployee,
    RemoveEmployee,
    PaySalaries,
}

impl ActionKind {
    /// Button label while the transaction awaits its receipt.
    pub fn confirming_label(&self) -> &'static str {
        match self {
            ActionKind::PaySalaries => "Paying...",
            _ => "Confirming...",
        }
    }

    /// Button label while idle.
    pub fn idle_label(&self) -> &'static str {
        match self {
            ActionKind::AddEmployee => "Add Employee",
            ActionKind::RemoveEmployee => "Remove",
            ActionKind::PaySalaries => "PAY ALL SALARIES",
        }
    }
}

/// Per-item outcome of a batched read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotResult<T> {
    Resolved(T),
    Failed(String),
}

impl<T> SlotResult<T> {
    pub fn ok(&self) -> Option<&T> {
        match self {
            SlotResult::Resolved(v) => Some(v),
            SlotResult::Failed(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, SlotResult::Resolved(_))
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for SlotResult<T> {
    fn from(r: Result<T, E>) -> Self {
        match r {
            Ok(v) => SlotResult::Resolved(v),
            Err(e) => SlotResult::Failed(e.to_string()),
        }
    }
}

/// Result of reading `employeeAddresses(index)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSlot {
    pub index: u64,
    pub result: SlotResult<Address>,
}

/// Result of reading `employees(address)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSlot {
    pub address: Address,
    pub result: SlotResult<EmployeeRecord>,
}

/// Fully staged roster read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub count: U256,
    pub addresses: Vec<AddressSlot>,
    pub records: Vec<RecordSlot>,
}

impl Roster {
    /// Addresses that resolved, in index order.
    pub fn resolved_addresses(&self) -> Vec<Address> {
        self.addresses
            .iter()
            .filter_map(|slot| slot.result.ok().copied())
            .collect()
    }

    /// Records that resolved, in index order.
    pub fn employees(&self) -> Vec<EmployeeRecord> {
        self.records
            .iter()
            .filter_map(|slot| slot.result.ok().copied())
            .collect()
    }
}

/// What the roster panel should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterView {
    LoadingCount,
    LoadingAddresses,
    Empty,
    Ready,
}

impl RosterView {
    /// Loading is told apart from empty by which stage is still in flight.
    /// With neither stage in flight, a missing count means the count read
    /// failed and the roster reads as empty.
    pub fn derive(count_loading: bool, addresses_loading: bool, count: Option<U256>) -> Self {
        if count_loading {
            return RosterView::LoadingCount;
        }
        if addresses_loading {
            return RosterView::LoadingAddresses;
        }
        match count {
            Some(c) if !c.is_zero() => RosterView::Ready,
            _ => RosterView::Empty,
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            RosterView::LoadingCount => Some("Loading employee count..."),
            RosterView::LoadingAddresses => Some("Fetching employee list..."),
            RosterView::Empty => Some("No employees have been added yet."),
            RosterView::Ready => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Inclusion receipt for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub status: ReceiptStatus,
    pub contract_address: Option<Address>,
}

impl TxReceipt {
    pub fn succeeded(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_view_derivation() {
        assert_eq!(RosterView::derive(true, false, None), RosterView::LoadingCount);
        assert_eq!(
            RosterView::derive(false, true, Some(U256::from(3))),
            RosterView::LoadingAddresses
        );
        assert_eq!(RosterView::derive(false, false, Some(U256::zero())), RosterView::Empty);
        assert_eq!(RosterView::derive(false, false, None), RosterView::Empty);
        assert_eq!(RosterView::derive(false, false, Some(U256::from(2))), RosterView::Ready);
    }

    #[test]
    fn test_roster_filters_failures() {
        let a = Address::from_bytes([1; 20]);
        let roster = Roster {
            count: U256::from(2),
            addresses: vec![
                AddressSlot {
                    index: 0,
                    result: SlotResult::Resolved(a),
                },
                AddressSlot {
                    index: 1,
                    result: SlotResult::Failed("boom".into()),
                },
            ],
            records: vec![],
        };
        assert_eq!(roster.resolved_addresses(), vec![a]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ActionKind::PaySalaries.confirming_label(), "Paying...");
        assert_eq!(ActionKind::AddEmployee.confirming_label(), "Confirming...");
        assert_eq!(ActionKind::PaySalaries.idle_label(), "PAY ALL SALARIES");
    }
}
