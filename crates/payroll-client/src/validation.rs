//! Add-employee form validation.
//!
//! Runs synchronously before any write is dispatched. A form that fails here
//! never reaches the write port.

use crate::domain::{Address, PayrollCall, TokenAmount, ValidationError};

/// Raw form input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddEmployeeForm {
    pub address: String,
    pub salary: String,
}

/// A form that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedEmployee {
    pub wallet: Address,
    pub monthly_salary: TokenAmount,
}

impl ValidatedEmployee {
    pub fn into_call(self) -> PayrollCall {
        PayrollCall::AddEmployee {
            wallet: self.wallet,
            monthly_salary: self.monthly_salary,
        }
    }
}

impl AddEmployeeForm {
    pub fn new(address: impl Into<String>, salary: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            salary: salary.into(),
        }
    }

    pub fn validate(&self) -> Result<ValidatedEmployee, ValidationError> {
        let wallet: Address = self.address.trim().parse()?;

        if self.salary.trim().is_empty() {
            return Err(ValidationError::MissingSalary);
        }
        let monthly_salary = TokenAmount::parse(&self.salary)?;

        Ok(ValidatedEmployee {
            wallet,
            monthly_salary,
        })
    }
}
