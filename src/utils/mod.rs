//! Shared helpers and the in-memory data source

pub mod memory_source;

pub use memory_source::*;

use bigdecimal::rounding::RoundingMode;
use bigdecimal::BigDecimal;

/// Round a monetary amount to two decimal places, banker's rounding.
pub fn round2(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfEven)
}

/// Tolerance for debit/credit and opening-balance comparisons: 0.01.
pub fn imbalance_tolerance() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(100)
}

/// Trim an account code and reject the "no account" placeholders.
///
/// Journal rows use "0" or an empty field to mean "no leg on this side".
pub fn clean_account_code(raw: &str) -> Option<&str> {
    let code = raw.trim();
    if code.is_empty() || code == "0" {
        None
    } else {
        Some(code)
    }
}
