//! Background task that owns the dashboard.
//!
//! The render loop sends [`Command`]s in and reads snapshots from the
//! dashboard's watch channel. Receipts and stale reads are handled on the
//! poll interval. The notice is expired on a short timer so it disappears
//! on time regardless of the poll interval.

use std::time::Duration;

use payroll_client::{AddEmployeeForm, Address, PayrollDashboard};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

const NOTICE_CHECK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub enum Command {
    Connect,
    Disconnect,
    AddEmployee(AddEmployeeForm),
    RemoveEmployee(Address),
    PaySalaries,
    Refresh,
    DismissAlert,
    Shutdown,
}

pub async fn run(
    mut dashboard: PayrollDashboard,
    mut commands: mpsc::Receiver<Command>,
    poll_interval: Duration,
) {
    let mut poll = interval(poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut notice = interval(NOTICE_CHECK_INTERVAL);
    notice.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(poll_ms = poll_interval.as_millis() as u64, "worker started");

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                None | Some(Command::Shutdown) => break,
                Some(command) => handle(&mut dashboard, command).await,
            },
            _ = poll.tick() => dashboard.tick().await,
            _ = notice.tick() => {
                dashboard.expire_notice();
            }
        }
    }

    info!("worker stopped");
}

/// Failures are recorded on the dashboard; nothing to do with them here.
async fn handle(dashboard: &mut PayrollDashboard, command: Command) {
    debug!(?command, "handling command");
    match command {
        Command::Connect => {
            let _ = dashboard.connect().await;
        }
        Command::Disconnect => dashboard.disconnect(),
        Command::AddEmployee(form) => {
            let _ = dashboard.add_employee(&form).await;
        }
        Command::RemoveEmployee(wallet) => {
            let _ = dashboard.remove_employee(wallet).await;
        }
        Command::PaySalaries => {
            let _ = dashboard.pay_salaries().await;
        }
        Command::Refresh => dashboard.refresh_all().await,
        Command::DismissAlert => dashboard.dismiss_alert(),
        Command::Shutdown => {}
    }
}
