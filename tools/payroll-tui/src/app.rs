//! UI state and key handling.
//!
//! The app never talks to the chain. Keys turn into [`Command`]s for the
//! worker, and the worker's snapshots drive what is drawn.

use crossterm::event::KeyCode;
use payroll_client::{ActionKind, AddEmployeeForm, Address, DashboardSnapshot, Network};

use crate::worker::Command;

/// Which widget receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Roster,
    Address,
    Salary,
}

pub struct App {
    pub network: Network,
    pub contract: Address,

    /// Latest state published by the worker.
    pub snapshot: DashboardSnapshot,

    pub form: AddEmployeeForm,
    pub focus: Focus,

    /// Selected roster row.
    pub selected: usize,

    pub should_quit: bool,
}

impl App {
    pub fn new(network: Network, contract: Address) -> Self {
        Self {
            network,
            contract,
            snapshot: DashboardSnapshot::default(),
            form: AddEmployeeForm::default(),
            focus: Focus::Roster,
            selected: 0,
            should_quit: false,
        }
    }

    /// Take a new snapshot and keep the selection in range.
    pub fn sync(&mut self, snapshot: DashboardSnapshot) {
        self.snapshot = snapshot;
        let max = self.snapshot.rows.len().saturating_sub(1);
        self.selected = self.selected.min(max);
        if !self.snapshot.is_connected() {
            self.focus = Focus::Roster;
        }
    }

    pub fn add_button_label(&self) -> &'static str {
        self.snapshot.button_label(ActionKind::AddEmployee)
    }

    pub fn pay_button_label(&self) -> &'static str {
        self.snapshot.button_label(ActionKind::PaySalaries)
    }

    pub fn on_key(&mut self, key: KeyCode) -> Option<Command> {
        // The alert blocks everything until acknowledged.
        if self.snapshot.alert.is_some() {
            return match key {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Command::DismissAlert),
                _ => None,
            };
        }

        match self.focus {
            Focus::Address | Focus::Salary => self.on_form_key(key),
            Focus::Roster => self.on_roster_key(key),
        }
    }

    fn on_form_key(&mut self, key: KeyCode) -> Option<Command> {
        match key {
            KeyCode::Esc => self.focus = Focus::Roster,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Address => Focus::Salary,
                    _ => Focus::Address,
                };
            }
            KeyCode::Backspace => {
                self.field_mut().pop();
            }
            KeyCode::Enter => {
                if self.snapshot.writes_disabled() {
                    return None;
                }
                return Some(Command::AddEmployee(self.form.clone()));
            }
            KeyCode::Char(c) => {
                if self.snapshot.writes_disabled() {
                    return None;
                }
                // The salary field behaves like a numeric input.
                let accept = match self.focus {
                    Focus::Salary => c.is_ascii_digit() || c == '.',
                    _ => !c.is_whitespace(),
                };
                if accept {
                    self.field_mut().push(c);
                }
            }
            _ => {}
        }
        None
    }

    fn on_roster_key(&mut self, key: KeyCode) -> Option<Command> {
        let connected = self.snapshot.is_connected();
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('c') if !connected => Some(Command::Connect),
            KeyCode::Char('x') if connected => Some(Command::Disconnect),
            KeyCode::Char('r') | KeyCode::Char('R') if connected => Some(Command::Refresh),
            KeyCode::Char('a') | KeyCode::Tab if connected => {
                self.focus = Focus::Address;
                None
            }
            KeyCode::Char('s') if connected => {
                self.focus = Focus::Salary;
                None
            }
            KeyCode::Char('p') if connected && !self.snapshot.writes_disabled() => {
                Some(Command::PaySalaries)
            }
            KeyCode::Char('d') | KeyCode::Delete if !self.snapshot.writes_disabled() => {
                let row = self.snapshot.rows.get(self.selected)?;
                row.is_removable()
                    .then_some(Command::RemoveEmployee(row.address))
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.snapshot.rows.len().saturating_sub(1);
                if self.selected < max {
                    self.selected += 1;
                }
                None
            }
            _ => None,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            Focus::Salary => &mut self.form.salary,
            _ => &mut self.form.address,
        }
    }
}
