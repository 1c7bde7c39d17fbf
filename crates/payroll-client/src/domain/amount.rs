//! Fixed-point token amounts.
//!
//! The payroll token uses 6 decimal places: `"1234.56"` is stored on chain
//! as `1234560000`.

use std::fmt;

use super::errors::AmountError;
use super::types::U256;

/// Decimal places of the payroll token.
pub const TOKEN_DECIMALS: u32 = 6;

/// Display symbol of the payroll token.
pub const TOKEN_SYMBOL: &str = "USDC";

/// Parse a human-readable decimal string into base units.
///
/// Accepts `"12"`, `"12.5"`, `".5"` and `"12."`. Signs, exponents and more
/// fractional digits than `decimals` are rejected.
pub fn parse_units(input: &str, decimals: u32) -> Result<U256, AmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, fraction) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(AmountError::NotDecimal(input.to_string()));
    }

    if fraction.len() > decimals as usize {
        return Err(AmountError::TooManyDecimals {
            found: fraction.len(),
            max: decimals,
        });
    }

    let padded = format!("{}{:0<width$}", whole, fraction, width = decimals as usize);
    let digits = padded.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }

    U256::from_dec_str(digits).map_err(|_| AmountError::Overflow)
}

/// Format base units as a decimal string, trimming trailing zeros.
pub fn format_units(value: U256, decimals: u32) -> String {
    let divisor = U256::exp10(decimals as usize);
    let whole = value / divisor;
    let fraction = value % divisor;

    if fraction.is_zero() {
        return whole.to_string();
    }

    let fraction = format!(
        "{:0>width$}",
        fraction.to_string(),
        width = decimals as usize
    );
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// An amount of the payroll token in base units.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenAmount(U256);

impl TokenAmount {
    pub const ZERO: TokenAmount = TokenAmount(U256([0; 4]));

    pub fn from_raw(raw: U256) -> Self {
        TokenAmount(raw)
    }

    pub fn from_base_units(units: u64) -> Self {
        TokenAmount(U256::from(units))
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn parse(input: &str) -> Result<Self, AmountError> {
        parse_units(input, TOKEN_DECIMALS).map(TokenAmount)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        TokenAmount(self.0.saturating_sub(other.0))
    }

    pub fn saturating_add(self, other: Self) -> Self {
        TokenAmount(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_units(self.0, TOKEN_DECIMALS))
    }
}

impl fmt::Debug for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenAmount({} {})", self, TOKEN_SYMBOL)
    }
}
