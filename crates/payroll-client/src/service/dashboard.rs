//! Dashboard state: wallet session, reads, writes and confirmations.
//!
//! `PayrollDashboard` is owned by a single task. Every mutation publishes a
//! fresh [`DashboardSnapshot`] on a watch channel so a renderer can observe
//! each stage of a refresh without holding the dashboard.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::query::Query;
use super::roster::RosterFetcher;
use super::tracker::{SettledTransaction, TrackedTransaction, TransactionTracker};
use super::wallet::{ConnectError, WalletSession};
use crate::domain::{
    ActionKind, Address, AddressSlot, EmployeeRecord, PayrollCall, ReceiptStatus, RosterView,
    SlotResult, SubmitError, TokenAmount, TxHash, TOKEN_SYMBOL, U256,
};
use crate::ports::{PayrollReader, PayrollWriter, TimeSource, Timestamp, WalletProvider};
use crate::validation::AddEmployeeForm;

pub const SUCCESS_NOTICE: &str = "Transaction Successful! Updating list...";
pub const INVALID_INPUT_ALERT: &str = "Invalid address or salary.";
pub const AWAITING_WALLET_LABEL: &str = "Check Wallet...";
pub const DISCONNECTED_ROSTER: &str = "Connect your wallet to see the roster.";
pub const UNKNOWN_BALANCE: &str = "0.00";

/// Default lifetime of the success notice.
pub const DEFAULT_NOTICE_MS: u64 = 4_000;

/// Per-row record state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowState {
    Loading,
    Loaded(EmployeeRecord),
    Failed(String),
}

impl From<SlotResult<EmployeeRecord>> for RowState {
    fn from(result: SlotResult<EmployeeRecord>) -> Self {
        match result {
            SlotResult::Resolved(record) => RowState::Loaded(record),
            SlotResult::Failed(reason) => RowState::Failed(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub address: Address,
    pub state: RowState,
}

impl RosterRow {
    pub fn loading_text(&self) -> String {
        format!("Loading details for {}...", self.address.short(8))
    }

    pub fn salary_text(&self) -> Option<String> {
        match &self.state {
            RowState::Loaded(record) => {
                Some(format!("{} {} / month", record.monthly_salary, TOKEN_SYMBOL))
            }
            _ => None,
        }
    }

    /// Loaded and no longer employed.
    pub fn is_removed(&self) -> bool {
        matches!(&self.state, RowState::Loaded(r) if !r.is_currently_employed)
    }

    /// Only active employees can be removed.
    pub fn is_removable(&self) -> bool {
        matches!(&self.state, RowState::Loaded(r) if r.is_currently_employed)
    }
}

/// Immutable view of the dashboard for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub account: Option<Address>,
    pub balance: Option<TokenAmount>,
    pub roster_view: RosterView,
    pub rows: Vec<RosterRow>,
    /// Address slots that failed to resolve.
    pub failed_slots: usize,
    pub awaiting_wallet: Option<ActionKind>,
    pub pending: Vec<TrackedTransaction>,
    pub latest: Option<TrackedTransaction>,
    pub notice: Option<String>,
    pub alert: Option<String>,
    pub last_error: Option<String>,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self {
            account: None,
            balance: None,
            roster_view: RosterView::LoadingCount,
            rows: Vec::new(),
            failed_slots: 0,
            awaiting_wallet: None,
            pending: Vec::new(),
            latest: None,
            notice: None,
            alert: None,
            last_error: None,
        }
    }
}

impl DashboardSnapshot {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn funds_display(&self) -> String {
        self.balance
            .map(|b| b.to_string())
            .unwrap_or_else(|| UNKNOWN_BALANCE.to_string())
    }

    /// Label for the button that issues `action`.
    pub fn button_label(&self, action: ActionKind) -> &'static str {
        if self.awaiting_wallet.is_some() {
            AWAITING_WALLET_LABEL
        } else if self.latest.is_some() {
            action.confirming_label()
        } else {
            action.idle_label()
        }
    }

    /// Write controls are locked while the wallet prompt is open or the
    /// latest submission is confirming.
    pub fn writes_disabled(&self) -> bool {
        self.awaiting_wallet.is_some() || self.latest.is_some()
    }

    /// Placeholder line for the roster panel, if any.
    pub fn roster_placeholder(&self) -> Option<&'static str> {
        if !self.is_connected() {
            return Some(DISCONNECTED_ROSTER);
        }
        match self.roster_view {
            RosterView::Ready if self.rows.is_empty() => RosterView::Empty.placeholder(),
            view => view.placeholder(),
        }
    }
}

struct Notice {
    message: &'static str,
    shown_at: Timestamp,
}

pub struct PayrollDashboard {
    reader: Arc<dyn PayrollReader>,
    writer: Arc<dyn PayrollWriter>,
    wallet: Arc<dyn WalletProvider>,
    clock: Arc<dyn TimeSource>,
    roster: RosterFetcher,
    tracker: TransactionTracker,
    notice_duration_ms: u64,

    session: WalletSession,
    balance: Query<TokenAmount>,
    count: Query<U256>,
    addresses_loading: bool,
    addresses: Vec<AddressSlot>,
    records: HashMap<Address, RowState>,

    awaiting_wallet: Option<ActionKind>,
    notice: Option<Notice>,
    alert: Option<String>,
    last_error: Option<String>,

    updates: watch::Sender<DashboardSnapshot>,
}

impl PayrollDashboard {
    pub fn new(
        reader: Arc<dyn PayrollReader>,
        writer: Arc<dyn PayrollWriter>,
        wallet: Arc<dyn WalletProvider>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        let (updates, _) = watch::channel(DashboardSnapshot::default());
        Self {
            roster: RosterFetcher::new(Arc::clone(&reader)),
            reader,
            writer,
            wallet,
            clock,
            tracker: TransactionTracker::new(),
            notice_duration_ms: DEFAULT_NOTICE_MS,
            session: WalletSession::Disconnected,
            balance: Query::new(),
            count: Query::new(),
            addresses_loading: false,
            addresses: Vec::new(),
            records: HashMap::new(),
            awaiting_wallet: None,
            notice: None,
            alert: None,
            last_error: None,
            updates,
        }
    }

    pub fn with_notice_duration(mut self, ms: u64) -> Self {
        self.notice_duration_ms = ms;
        self
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        let rx = self.updates.subscribe();
        self.publish();
        rx
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn session(&self) -> WalletSession {
        self.session
    }

    pub fn tracker(&self) -> &TransactionTracker {
        &self.tracker
    }

    pub fn balance(&self) -> &Query<TokenAmount> {
        &self.balance
    }

    pub fn count(&self) -> &Query<U256> {
        &self.count
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The success notice, while its window is open.
    pub fn notice(&self) -> Option<&'static str> {
        let notice = self.notice.as_ref()?;
        let age = self.clock.now().saturating_sub(notice.shown_at);
        (age < self.notice_duration_ms).then_some(notice.message)
    }

    /// An unsettled count reads as loading, not as empty.
    pub fn roster_view(&self) -> RosterView {
        RosterView::derive(
            self.count.is_loading() || self.count.is_pending(),
            self.addresses_loading,
            self.count.value().copied(),
        )
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let account = self.session.account();
        let connected = account.is_some();

        let rows = if connected {
            self.addresses
                .iter()
                .filter_map(|slot| slot.result.ok().copied())
                .map(|address| RosterRow {
                    address,
                    state: self
                        .records
                        .get(&address)
                        .cloned()
                        .unwrap_or(RowState::Loading),
                })
                .collect()
        } else {
            Vec::new()
        };

        DashboardSnapshot {
            account,
            balance: self.balance.value().copied().filter(|_| connected),
            roster_view: self.roster_view(),
            rows,
            failed_slots: self
                .addresses
                .iter()
                .filter(|slot| !slot.result.is_resolved())
                .count(),
            awaiting_wallet: self.awaiting_wallet,
            pending: self.tracker.pending(),
            latest: self.tracker.latest(),
            notice: self.notice().map(str::to_string),
            alert: self.alert.clone(),
            last_error: self.last_error.clone(),
        }
    }

    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect the wallet and load balance and roster.
    pub async fn connect(&mut self) -> Result<Address, ConnectError> {
        match WalletSession::connect(self.wallet.as_ref()).await {
            Ok(session) => {
                self.session = session;
                self.balance.invalidate();
                self.count.invalidate();
                self.publish();
                self.refresh_stale().await;
                session.account().ok_or(ConnectError::NoAccounts)
            }
            Err(e) => {
                warn!(error = %e, "wallet connection failed");
                self.last_error = Some(e.to_string());
                self.publish();
                Err(e)
            }
        }
    }

    /// Forget the account and every cached read. Tracked transactions keep
    /// being watched.
    pub fn disconnect(&mut self) {
        info!("wallet disconnected");
        self.session = WalletSession::Disconnected;
        self.balance.reset();
        self.count.reset();
        self.addresses_loading = false;
        self.addresses.clear();
        self.records.clear();
        self.awaiting_wallet = None;
        self.publish();
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn refresh_balance(&mut self) {
        if !self.session.is_connected() {
            return;
        }
        self.balance.begin();
        self.publish();

        match self.reader.contract_balance().await {
            Ok(balance) => {
                debug!(balance = %balance, "contract balance");
                self.balance.resolve(balance);
            }
            Err(e) => {
                warn!(error = %e, "balance read failed");
                self.balance.fail(&e);
            }
        }
        self.publish();
    }

    /// Run the count, address and record stages in order, publishing after
    /// each one. Previously loaded rows stay visible while refetching.
    pub async fn refresh_roster(&mut self) {
        if !self.session.is_connected() {
            return;
        }
        self.count.begin();
        self.publish();

        let count = match self.roster.fetch_count().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "employee count read failed");
                self.count.fail(&e);
                self.publish();
                return;
            }
        };

        let count_changed = self.count.value() != Some(&count);
        self.count.resolve(count);

        if count.is_zero() {
            self.addresses.clear();
            self.records.clear();
            self.addresses_loading = false;
            self.publish();
            return;
        }

        if count_changed {
            self.addresses_loading = true;
        }
        self.publish();

        let slots = match self.roster.fetch_addresses(count).await {
            Ok(slots) => slots,
            Err(e) => {
                warn!(error = %e, "employee address stage failed");
                self.addresses_loading = false;
                self.last_error = Some(e.to_string());
                self.publish();
                return;
            }
        };

        let resolved: HashSet<Address> = slots
            .iter()
            .filter_map(|slot| slot.result.ok().copied())
            .collect();
        self.records.retain(|address, _| resolved.contains(address));
        for address in &resolved {
            self.records.entry(*address).or_insert(RowState::Loading);
        }
        self.addresses = slots;
        self.addresses_loading = false;
        self.publish();

        let records = self.roster.fetch_records(&self.addresses).await;
        for slot in records {
            self.records.insert(slot.address, slot.result.into());
        }
        debug!(
            count = %count,
            rows = self.records.len(),
            "roster refreshed"
        );
        self.publish();
    }

    /// Refetch whatever has been marked stale.
    pub async fn refresh_stale(&mut self) {
        if !self.session.is_connected() {
            return;
        }
        if self.balance.needs_fetch() {
            self.refresh_balance().await;
        }
        if self.count.needs_fetch() {
            self.refresh_roster().await;
        }
    }

    /// Mark both reads stale and refetch them.
    pub async fn refresh_all(&mut self) {
        self.balance.invalidate();
        self.count.invalidate();
        self.refresh_stale().await;
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Validate the form and submit `addEmployee`. Invalid input raises the
    /// blocking alert and never reaches the writer.
    pub async fn add_employee(&mut self, form: &AddEmployeeForm) -> Result<TxHash, SubmitError> {
        let employee = match form.validate() {
            Ok(employee) => employee,
            Err(e) => {
                debug!(error = %e, "add employee form rejected");
                self.alert = Some(INVALID_INPUT_ALERT.to_string());
                self.publish();
                return Err(e.into());
            }
        };
        self.submit(employee.into_call()).await
    }

    pub async fn remove_employee(&mut self, wallet: Address) -> Result<TxHash, SubmitError> {
        self.submit(PayrollCall::RemoveEmployee { wallet }).await
    }

    pub async fn pay_salaries(&mut self) -> Result<TxHash, SubmitError> {
        self.submit(PayrollCall::PaySalaries).await
    }

    async fn submit(&mut self, call: PayrollCall) -> Result<TxHash, SubmitError> {
        let account = self.session.account().ok_or(SubmitError::NotConnected)?;
        let action = call.kind();

        self.awaiting_wallet = Some(action);
        self.last_error = None;
        self.publish();

        let result = self.writer.submit(account, call).await;
        self.awaiting_wallet = None;

        match &result {
            Ok(hash) => self.tracker.track(*hash, action, self.clock.now()),
            Err(e) => {
                warn!(error = %e, action = ?action, "write not submitted");
                self.last_error = Some(e.to_string());
            }
        }
        self.publish();
        result
    }

    pub fn dismiss_alert(&mut self) {
        if self.alert.take().is_some() {
            self.publish();
        }
    }

    // =========================================================================
    // Confirmations
    // =========================================================================

    /// Poll a receipt for every tracked hash. Errors leave the watch in
    /// place for the next poll.
    pub async fn poll_transactions(&mut self) -> Vec<SettledTransaction> {
        let pending = self.tracker.pending();
        if pending.is_empty() {
            return Vec::new();
        }

        let polls = pending.iter().map(|tx| {
            let writer = Arc::clone(&self.writer);
            let hash = tx.hash;
            async move { (hash, writer.receipt(hash).await) }
        });

        let mut settled = Vec::new();
        for (hash, result) in join_all(polls).await {
            match result {
                Ok(Some(receipt)) => {
                    if let Some(done) = self.tracker.settle(&receipt) {
                        self.on_settled(&done);
                        settled.push(done);
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(tx_hash = %hash, error = %e, "receipt poll failed"),
            }
        }

        if !settled.is_empty() {
            self.publish();
        }
        settled
    }

    fn on_settled(&mut self, tx: &SettledTransaction) {
        match tx.status {
            ReceiptStatus::Success => {
                // A notice already on screen keeps its original window.
                if self.notice().is_none() {
                    self.notice = Some(Notice {
                        message: SUCCESS_NOTICE,
                        shown_at: self.clock.now(),
                    });
                }
                self.balance.invalidate();
                self.count.invalidate();
            }
            ReceiptStatus::Reverted => {
                self.last_error = Some(format!("Transaction {} reverted", tx.hash.short()));
            }
        }
    }

    /// Clear the notice once its window has passed.
    pub fn expire_notice(&mut self) -> bool {
        if self.notice.is_some() && self.notice().is_none() {
            self.notice = None;
            self.publish();
            return true;
        }
        false
    }

    /// One turn of the background loop.
    pub async fn tick(&mut self) {
        self.poll_transactions().await;
        self.expire_notice();
        self.refresh_stale().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReadError;
    use crate::ports::MockTimeSource;
    use crate::testing::MockChain;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    const EMPLOYEE: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    fn owner() -> Address {
        Address::from_bytes([0x0a; 20])
    }

    fn setup() -> (Arc<MockChain>, Arc<MockTimeSource>, PayrollDashboard) {
        let chain = Arc::new(MockChain::new().with_account(owner()));
        let clock = Arc::new(MockTimeSource::new(1_000));
        let dashboard =
            PayrollDashboard::new(chain.clone(), chain.clone(), chain.clone(), clock.clone());
        (chain, clock, dashboard)
    }

    #[tokio::test]
    async fn test_connect_loads_empty_roster() {
        let (chain, _, mut dashboard) = setup();
        chain.set_balance(5_000_000);

        assert_eq!(dashboard.connect().await.unwrap(), owner());

        let snap = dashboard.snapshot();
        assert_eq!(snap.roster_view, RosterView::Empty);
        assert_eq!(
            snap.roster_placeholder(),
            Some("No employees have been added yet.")
        );
        assert_eq!(snap.funds_display(), "5");
        assert_eq!(chain.address_reads(), 0);
    }

    /// Reader that records the published roster placeholder whenever the
    /// balance is read.
    struct PlaceholderRecorder {
        chain: Arc<MockChain>,
        updates: Mutex<Option<watch::Receiver<DashboardSnapshot>>>,
        seen: Mutex<Vec<Option<&'static str>>>,
    }

    #[async_trait]
    impl PayrollReader for PlaceholderRecorder {
        async fn employee_count(&self) -> Result<U256, ReadError> {
            self.chain.employee_count().await
        }

        async fn employee_address(&self, index: U256) -> Result<Address, ReadError> {
            self.chain.employee_address(index).await
        }

        async fn employee(&self, wallet: Address) -> Result<EmployeeRecord, ReadError> {
            self.chain.employee(wallet).await
        }

        async fn contract_balance(&self) -> Result<TokenAmount, ReadError> {
            let placeholder = self
                .updates
                .lock()
                .as_ref()
                .map(|rx| rx.borrow().roster_placeholder());
            if let Some(placeholder) = placeholder {
                self.seen.lock().push(placeholder);
            }
            self.chain.contract_balance().await
        }
    }

    #[tokio::test]
    async fn test_roster_loading_until_count_settles() {
        let chain = Arc::new(MockChain::new().with_account(owner()));
        chain.add_employee(EMPLOYEE.parse().unwrap(), 1_000_000);
        let recorder = Arc::new(PlaceholderRecorder {
            chain: chain.clone(),
            updates: Mutex::new(None),
            seen: Mutex::new(Vec::new()),
        });
        let mut dashboard = PayrollDashboard::new(
            recorder.clone(),
            chain.clone(),
            chain.clone(),
            Arc::new(MockTimeSource::new(0)),
        );
        *recorder.updates.lock() = Some(dashboard.subscribe());
        assert_eq!(dashboard.roster_view(), RosterView::LoadingCount);

        dashboard.connect().await.unwrap();

        assert_eq!(
            *recorder.seen.lock(),
            vec![Some("Loading employee count...")]
        );
        assert_eq!(dashboard.snapshot().roster_view, RosterView::Ready);
    }

    #[tokio::test]
    async fn test_failed_count_reads_as_empty() {
        let (chain, _, mut dashboard) = setup();
        chain.add_employee(Address::from_bytes([1; 20]), 1);
        chain.fail_count(true);

        dashboard.connect().await.unwrap();
        assert_eq!(dashboard.roster_view(), RosterView::Empty);
        assert!(dashboard.count().needs_fetch());

        chain.fail_count(false);
        dashboard.tick().await;
        assert_eq!(dashboard.roster_view(), RosterView::Ready);
        assert_eq!(dashboard.snapshot().rows.len(), 1);
    }

    #[tokio::test]
    async fn test_balance_failure_falls_back_and_retries() {
        let (chain, _, mut dashboard) = setup();
        chain.set_balance(7_000_000);
        chain.fail_balance(true);

        dashboard.connect().await.unwrap();
        assert_eq!(dashboard.snapshot().funds_display(), UNKNOWN_BALANCE);
        assert!(dashboard.balance().needs_fetch());

        chain.fail_balance(false);
        dashboard.tick().await;
        assert_eq!(dashboard.snapshot().funds_display(), "7");
        assert!(!dashboard.balance().needs_fetch());

        // A failed refetch keeps the last known value on screen.
        chain.fail_balance(true);
        dashboard.refresh_all().await;
        assert_eq!(dashboard.snapshot().funds_display(), "7");
        assert!(dashboard.balance().needs_fetch());

        let reads = chain.balance_reads();
        dashboard.tick().await;
        assert_eq!(chain.balance_reads(), reads + 1);
    }

    #[tokio::test]
    async fn test_disconnected_snapshot() {
        let (_, _, dashboard) = setup();
        let snap = dashboard.snapshot();
        assert!(!snap.is_connected());
        assert_eq!(snap.funds_display(), UNKNOWN_BALANCE);
        assert_eq!(snap.roster_placeholder(), Some(DISCONNECTED_ROSTER));
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_writer() {
        let (chain, _, mut dashboard) = setup();
        dashboard.connect().await.unwrap();

        let err = dashboard
            .add_employee(&AddEmployeeForm::new("0xnope", "100"))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(_)));
        assert_eq!(dashboard.alert(), Some(INVALID_INPUT_ALERT));
        assert_eq!(chain.submissions(), 0);

        dashboard.dismiss_alert();
        assert!(dashboard.alert().is_none());
    }

    #[tokio::test]
    async fn test_confirmation_refreshes_and_shows_notice_for_four_seconds() {
        let (chain, clock, mut dashboard) = setup();
        dashboard.connect().await.unwrap();
        let balance_reads = chain.balance_reads();
        let count_reads = chain.count_reads();

        let hash = dashboard
            .add_employee(&AddEmployeeForm::new(EMPLOYEE, "1234.56"))
            .await
            .unwrap();
        let snap = dashboard.snapshot();
        assert_eq!(snap.latest.map(|tx| tx.hash), Some(hash));
        assert_eq!(snap.button_label(ActionKind::AddEmployee), "Confirming...");
        assert!(snap.writes_disabled());

        // Not mined yet: nothing settles.
        assert!(dashboard.poll_transactions().await.is_empty());

        chain.mine();
        let settled = dashboard.poll_transactions().await;
        assert_eq!(settled.len(), 1);
        assert_eq!(dashboard.notice(), Some(SUCCESS_NOTICE));
        assert!(dashboard.balance().is_stale());
        assert!(dashboard.count().is_stale());

        dashboard.refresh_stale().await;
        assert_eq!(chain.balance_reads(), balance_reads + 1);
        assert_eq!(chain.count_reads(), count_reads + 1);

        let snap = dashboard.snapshot();
        assert_eq!(snap.rows.len(), 1);
        assert_eq!(snap.rows[0].address.to_checksum(), EMPLOYEE);
        assert_eq!(
            snap.rows[0].salary_text().as_deref(),
            Some("1234.56 USDC / month")
        );
        assert_eq!(snap.button_label(ActionKind::AddEmployee), "Add Employee");

        clock.advance(3_999);
        assert!(!dashboard.expire_notice());
        assert_eq!(dashboard.notice(), Some(SUCCESS_NOTICE));

        clock.advance(1);
        assert!(dashboard.expire_notice());
        assert!(dashboard.notice().is_none());
        assert!(dashboard.snapshot().notice.is_none());
    }

    #[tokio::test]
    async fn test_two_writes_in_flight() {
        let (chain, _, mut dashboard) = setup();
        chain.set_balance(10_000_000);
        dashboard.connect().await.unwrap();

        let first = dashboard
            .add_employee(&AddEmployeeForm::new(EMPLOYEE, "1"))
            .await
            .unwrap();
        let second = dashboard.pay_salaries().await.unwrap();

        let snap = dashboard.snapshot();
        assert_eq!(snap.latest.map(|tx| tx.hash), Some(second));
        assert_eq!(snap.button_label(ActionKind::PaySalaries), "Paying...");
        assert_eq!(snap.pending.len(), 2);

        chain.mine();
        let settled: Vec<TxHash> = dashboard
            .poll_transactions()
            .await
            .iter()
            .map(|tx| tx.hash)
            .collect();
        assert!(settled.contains(&first));
        assert!(settled.contains(&second));
        assert_eq!(dashboard.tracker().pending_count(), 0);
    }

    #[tokio::test]
    async fn test_second_confirmation_keeps_notice_window() {
        let (chain, clock, mut dashboard) = setup();
        chain.set_balance(10_000_000);
        dashboard.connect().await.unwrap();

        dashboard
            .add_employee(&AddEmployeeForm::new(EMPLOYEE, "1"))
            .await
            .unwrap();
        chain.mine();
        dashboard.poll_transactions().await;
        assert_eq!(dashboard.notice(), Some(SUCCESS_NOTICE));

        clock.advance(3_000);
        dashboard.pay_salaries().await.unwrap();
        chain.mine();
        assert_eq!(dashboard.poll_transactions().await.len(), 1);

        clock.advance(1_000);
        assert!(dashboard.expire_notice());
        assert!(dashboard.notice().is_none());

        // Once the window has closed, the next confirmation opens a new one.
        dashboard.remove_employee(EMPLOYEE.parse().unwrap()).await.unwrap();
        chain.mine();
        dashboard.poll_transactions().await;
        assert_eq!(dashboard.notice(), Some(SUCCESS_NOTICE));
    }

    #[tokio::test]
    async fn test_reverted_transaction_shows_no_notice() {
        let (chain, _, mut dashboard) = setup();
        dashboard.connect().await.unwrap();

        dashboard.pay_salaries().await.unwrap();
        chain.mine_reverted();
        let settled = dashboard.poll_transactions().await;

        assert_eq!(settled[0].status, ReceiptStatus::Reverted);
        assert!(dashboard.notice().is_none());
        assert!(dashboard.last_error().unwrap().contains("reverted"));
        assert!(!dashboard.balance().is_stale());
    }

    #[tokio::test]
    async fn test_rejected_submission_is_not_tracked() {
        let (chain, _, mut dashboard) = setup();
        dashboard.connect().await.unwrap();
        chain.reject_submissions(true);

        let err = dashboard.pay_salaries().await.unwrap_err();
        assert!(matches!(err, SubmitError::Rejected(_)));
        assert_eq!(dashboard.tracker().pending_count(), 0);
        assert!(dashboard.last_error().is_some());
        assert!(!dashboard.snapshot().writes_disabled());
    }

    #[tokio::test]
    async fn test_write_requires_connection() {
        let (chain, _, mut dashboard) = setup();
        let err = dashboard.pay_salaries().await.unwrap_err();
        assert_eq!(err, SubmitError::NotConnected);
        assert_eq!(chain.submissions(), 0);
    }

    #[tokio::test]
    async fn test_receipt_poll_error_keeps_watch() {
        let (chain, _, mut dashboard) = setup();
        dashboard.connect().await.unwrap();
        let hash = dashboard.pay_salaries().await.unwrap();

        chain.mine();
        chain.fail_receipts(true);
        assert!(dashboard.poll_transactions().await.is_empty());
        assert!(dashboard.tracker().is_pending(&hash));

        chain.fail_receipts(false);
        assert_eq!(dashboard.poll_transactions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_marks_row_removed() {
        let (chain, _, mut dashboard) = setup();
        let wallet: Address = EMPLOYEE.parse().unwrap();
        chain.add_employee(wallet, 3_000_000);
        dashboard.connect().await.unwrap();
        assert!(dashboard.snapshot().rows[0].is_removable());

        dashboard.remove_employee(wallet).await.unwrap();
        chain.mine();
        dashboard.tick().await;

        let row = &dashboard.snapshot().rows[0];
        assert!(row.is_removed());
        assert!(!row.is_removable());
    }

    #[tokio::test]
    async fn test_failed_record_row() {
        let (chain, _, mut dashboard) = setup();
        let a = Address::from_bytes([1; 20]);
        let b = Address::from_bytes([2; 20]);
        chain.add_employee(a, 1_000_000);
        chain.add_employee(b, 1_000_000);
        chain.fail_record(a);

        dashboard.connect().await.unwrap();
        let snap = dashboard.snapshot();
        assert_eq!(snap.roster_view, RosterView::Ready);
        assert!(matches!(snap.rows[0].state, RowState::Failed(_)));
        assert!(matches!(snap.rows[1].state, RowState::Loaded(_)));
    }

    #[tokio::test]
    async fn test_all_addresses_failed_reads_as_empty() {
        let (chain, _, mut dashboard) = setup();
        chain.add_employee(Address::from_bytes([1; 20]), 1);
        chain.fail_address_index(0);

        dashboard.connect().await.unwrap();
        let snap = dashboard.snapshot();
        assert_eq!(snap.failed_slots, 1);
        assert_eq!(
            snap.roster_placeholder(),
            Some("No employees have been added yet.")
        );
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let (chain, _, mut dashboard) = setup();
        chain.set_balance(2_000_000);
        let mut rx = dashboard.subscribe();

        dashboard.connect().await.unwrap();
        assert!(rx.has_changed().unwrap());
        let snap = rx.borrow_and_update().clone();
        assert_eq!(snap.funds_display(), "2");
    }

    #[tokio::test]
    async fn test_disconnect_clears_reads() {
        let (chain, _, mut dashboard) = setup();
        chain.add_employee(Address::from_bytes([1; 20]), 1);
        dashboard.connect().await.unwrap();
        dashboard.disconnect();

        let snap = dashboard.snapshot();
        assert!(snap.rows.is_empty());
        assert!(snap.balance.is_none());
        assert!(dashboard.count().value().is_none());
    }

    #[test]
    fn test_row_loading_text() {
        let row = RosterRow {
            address: EMPLOYEE.parse().unwrap(),
            state: RowState::Loading,
        };
        assert_eq!(row.loading_text(), "Loading details for 0x5aAeb6...");
        assert!(row.salary_text().is_none());
    }
}
