//! In-memory payroll chain for service tests.
//!
//! `MockChain` implements the reader, writer and wallet ports. Submitted
//! calls sit in a mempool until `mine()` applies them, so tests control
//! exactly when receipts appear.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{
    Address, EmployeeRecord, PayrollCall, ReadError, ReceiptStatus, RpcError, SubmitError,
    TokenAmount, TxHash, TxReceipt, U256,
};
use crate::ports::{PayrollReader, PayrollWriter, WalletProvider};

#[derive(Default)]
struct ChainState {
    order: Vec<Address>,
    employees: HashMap<Address, EmployeeRecord>,
    balance: TokenAmount,
    accounts: Vec<Address>,

    fail_count: bool,
    fail_balance: bool,
    failing_indices: HashSet<u64>,
    failing_records: HashSet<Address>,
    fail_receipts: bool,
    reject_submissions: bool,

    mempool: Vec<(TxHash, PayrollCall)>,
    receipts: HashMap<TxHash, TxReceipt>,
    next_hash: u64,
    block: u64,
}

impl ChainState {
    /// Apply a call the way the contract would. `false` means revert.
    fn apply(&mut self, call: PayrollCall) -> bool {
        match call {
            PayrollCall::AddEmployee {
                wallet,
                monthly_salary,
            } => {
                if wallet.is_zero() || self.employees.contains_key(&wallet) {
                    return false;
                }
                self.order.push(wallet);
                self.employees.insert(
                    wallet,
                    EmployeeRecord {
                        wallet,
                        monthly_salary,
                        is_currently_employed: true,
                    },
                );
                true
            }
            PayrollCall::RemoveEmployee { wallet } => match self.employees.get_mut(&wallet) {
                Some(record) if record.is_currently_employed => {
                    record.is_currently_employed = false;
                    true
                }
                _ => false,
            },
            PayrollCall::PaySalaries => {
                let total = self
                    .employees
                    .values()
                    .filter(|r| r.is_currently_employed)
                    .fold(TokenAmount::ZERO, |acc, r| acc.saturating_add(r.monthly_salary));
                if total > self.balance {
                    return false;
                }
                self.balance = self.balance.saturating_sub(total);
                true
            }
        }
    }
}

#[derive(Default)]
pub struct MockChain {
    state: Mutex<ChainState>,
    count_reads: AtomicUsize,
    address_reads: AtomicUsize,
    record_reads: AtomicUsize,
    balance_reads: AtomicUsize,
    submissions: AtomicUsize,
}

fn injected(what: &str) -> ReadError {
    ReadError::Transport(RpcError::Connection(format!("injected {what} failure")))
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, account: Address) -> Self {
        self.state.lock().accounts.push(account);
        self
    }

    /// Seed an active employee directly, bypassing the mempool.
    pub fn add_employee(&self, wallet: Address, salary_units: u64) {
        self.state.lock().apply(PayrollCall::AddEmployee {
            wallet,
            monthly_salary: TokenAmount::from_base_units(salary_units),
        });
    }

    pub fn set_balance(&self, units: u64) {
        self.state.lock().balance = TokenAmount::from_base_units(units);
    }

    pub fn fail_count(&self, fail: bool) {
        self.state.lock().fail_count = fail;
    }

    pub fn fail_balance(&self, fail: bool) {
        self.state.lock().fail_balance = fail;
    }

    pub fn fail_address_index(&self, index: u64) {
        self.state.lock().failing_indices.insert(index);
    }

    pub fn fail_record(&self, wallet: Address) {
        self.state.lock().failing_records.insert(wallet);
    }

    pub fn fail_receipts(&self, fail: bool) {
        self.state.lock().fail_receipts = fail;
    }

    pub fn reject_submissions(&self, reject: bool) {
        self.state.lock().reject_submissions = reject;
    }

    /// Include every queued transaction in a new block.
    pub fn mine(&self) -> Vec<TxHash> {
        self.mine_with(false)
    }

    /// Include every queued transaction, reverting all of them.
    pub fn mine_reverted(&self) -> Vec<TxHash> {
        self.mine_with(true)
    }

    fn mine_with(&self, force_revert: bool) -> Vec<TxHash> {
        let mut state = self.state.lock();
        state.block += 1;
        let block = state.block;
        let queued = std::mem::take(&mut state.mempool);

        let mut mined = Vec::with_capacity(queued.len());
        for (hash, call) in queued {
            let ok = !force_revert && state.apply(call);
            state.receipts.insert(
                hash,
                TxReceipt {
                    transaction_hash: hash,
                    block_number: Some(block),
                    status: if ok {
                        ReceiptStatus::Success
                    } else {
                        ReceiptStatus::Reverted
                    },
                    contract_address: None,
                },
            );
            mined.push(hash);
        }
        mined
    }

    pub fn count_reads(&self) -> usize {
        self.count_reads.load(Ordering::SeqCst)
    }

    pub fn address_reads(&self) -> usize {
        self.address_reads.load(Ordering::SeqCst)
    }

    pub fn record_reads(&self) -> usize {
        self.record_reads.load(Ordering::SeqCst)
    }

    pub fn balance_reads(&self) -> usize {
        self.balance_reads.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PayrollReader for MockChain {
    async fn employee_count(&self) -> Result<U256, ReadError> {
        self.count_reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock();
        if state.fail_count {
            return Err(injected("count"));
        }
        Ok(U256::from(state.order.len()))
    }

    async fn employee_address(&self, index: U256) -> Result<Address, ReadError> {
        self.address_reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock();
        if state.failing_indices.contains(&index.low_u64()) {
            return Err(injected("address"));
        }
        state
            .order
            .get(index.low_u64() as usize)
            .copied()
            .ok_or_else(|| ReadError::Reverted("index out of bounds".into()))
    }

    async fn employee(&self, wallet: Address) -> Result<EmployeeRecord, ReadError> {
        self.record_reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock();
        if state.failing_records.contains(&wallet) {
            return Err(injected("record"));
        }
        // Unknown keys read as the zero struct, like a Solidity mapping.
        Ok(state.employees.get(&wallet).copied().unwrap_or(EmployeeRecord {
            wallet: Address::ZERO,
            monthly_salary: TokenAmount::ZERO,
            is_currently_employed: false,
        }))
    }

    async fn contract_balance(&self) -> Result<TokenAmount, ReadError> {
        self.balance_reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock();
        if state.fail_balance {
            return Err(injected("balance"));
        }
        Ok(state.balance)
    }
}

#[async_trait]
impl PayrollWriter for MockChain {
    async fn submit(&self, _from: Address, call: PayrollCall) -> Result<TxHash, SubmitError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        if state.reject_submissions {
            return Err(SubmitError::Rejected("User rejected the request.".into()));
        }
        state.next_hash += 1;
        let hash = TxHash::from_low_u64(state.next_hash);
        state.mempool.push((hash, call));
        Ok(hash)
    }

    async fn receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>, ReadError> {
        let state = self.state.lock();
        if state.fail_receipts {
            return Err(injected("receipt"));
        }
        Ok(state.receipts.get(&hash).cloned())
    }
}

#[async_trait]
impl WalletProvider for MockChain {
    async fn request_accounts(&self) -> Result<Vec<Address>, RpcError> {
        Ok(self.state.lock().accounts.clone())
    }
}
