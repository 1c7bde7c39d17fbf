//! Minimal Solidity ABI codec for the payroll contract surface.
//!
//! Only static types are needed: every argument and return value is one
//! 32-byte word (`address`, `uint256`, `bool`), so there is no head/tail
//! offset handling.

use super::amount::TokenAmount;
use super::entities::{EmployeeRecord, PayrollCall};
use super::errors::AbiError;
use super::types::{keccak256, Address, Bytes, U256};

pub const WORD: usize = 32;

// Payroll contract
pub const GET_EMPLOYEE_COUNT: &str = "getEmployeeCount()";
pub const EMPLOYEE_ADDRESSES: &str = "employeeAddresses(uint256)";
pub const EMPLOYEES: &str = "employees(address)";
pub const ADD_EMPLOYEE: &str = "addEmployee(address,uint256)";
pub const REMOVE_EMPLOYEE: &str = "removeEmployee(address)";
pub const PAY_SALARIES: &str = "paySalaries()";
pub const OWNER: &str = "owner()";
pub const USDC_TOKEN: &str = "usdcToken()";

// ERC-20
pub const BALANCE_OF: &str = "balanceOf(address)";

/// First four bytes of the keccak hash of a canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// A static ABI argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Uint(U256),
    Bool(bool),
}

impl Token {
    fn to_word(self) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        match self {
            Token::Address(a) => word[12..].copy_from_slice(a.as_bytes()),
            Token::Uint(v) => v.to_big_endian(&mut word),
            Token::Bool(b) => word[WORD - 1] = b as u8,
        }
        word
    }
}

/// Encode arguments without a selector (constructor arguments).
pub fn encode_args(args: &[Token]) -> Vec<u8> {
    let mut out = Vec::with_capacity(args.len() * WORD);
    for arg in args {
        out.extend_from_slice(&arg.to_word());
    }
    out
}

/// Encode a function call: selector followed by the argument words.
pub fn encode_call(signature: &str, args: &[Token]) -> Bytes {
    let mut out = Vec::with_capacity(4 + args.len() * WORD);
    out.extend_from_slice(&selector(signature));
    out.extend_from_slice(&encode_args(args));
    Bytes(out)
}

fn word_at(data: &[u8], index: usize) -> Result<&[u8], AbiError> {
    let start = index * WORD;
    let end = start + WORD;
    data.get(start..end).ok_or(AbiError::ShortData {
        expected: end,
        actual: data.len(),
    })
}

pub fn decode_uint(data: &[u8], index: usize) -> Result<U256, AbiError> {
    Ok(U256::from_big_endian(word_at(data, index)?))
}

pub fn decode_address(data: &[u8], index: usize) -> Result<Address, AbiError> {
    let word = word_at(data, index)?;
    if word[..12].iter().any(|b| *b != 0) {
        return Err(AbiError::DirtyAddress);
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[12..]);
    Ok(Address::from_bytes(bytes))
}

pub fn decode_bool(data: &[u8], index: usize) -> Result<bool, AbiError> {
    match decode_uint(data, index)? {
        v if v.is_zero() => Ok(false),
        v if v == U256::one() => Ok(true),
        _ => Err(AbiError::InvalidBool),
    }
}

/// Decode the `employees(address)` getter tuple.
pub fn decode_employee(data: &[u8]) -> Result<EmployeeRecord, AbiError> {
    Ok(EmployeeRecord {
        wallet: decode_address(data, 0)?,
        monthly_salary: TokenAmount::from_raw(decode_uint(data, 1)?),
        is_currently_employed: decode_bool(data, 2)?,
    })
}

impl PayrollCall {
    /// Calldata for this write.
    pub fn encode(&self) -> Bytes {
        match self {
            PayrollCall::AddEmployee {
                wallet,
                monthly_salary,
            } => encode_call(
                ADD_EMPLOYEE,
                &[Token::Address(*wallet), Token::Uint(monthly_salary.raw())],
            ),
            PayrollCall::RemoveEmployee { wallet } => {
                encode_call(REMOVE_EMPLOYEE, &[Token::Address(*wallet)])
            }
            PayrollCall::PaySalaries => encode_call(PAY_SALARIES, &[]),
        }
    }
}
