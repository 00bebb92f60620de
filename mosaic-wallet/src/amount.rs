//! Amount parsing and formatting
//!
//! Mosaic and XEM quantities travel as integer micro-units; users type and
//! read them as decimals with up to six fractional digits.

use crate::error::WalletError;

/// Micro-units per whole token (XEM and the mosaic share divisibility 6)
pub const MICRO_PER_UNIT: u64 = 1_000_000;

/// Maximum fractional digits accepted in an amount
pub const MAX_DECIMALS: usize = 6;

/// Format micro-units as a plain decimal, without trailing zeros.
pub fn format_amount(micro: u64) -> String {
    let whole = micro / MICRO_PER_UNIT;
    let frac = micro % MICRO_PER_UNIT;
    if frac == 0 {
        return whole.to_string();
    }

    let digits = format!("{:06}", frac);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// Parse a user supplied decimal amount into micro-units.
///
/// Accepts `12`, `12.5`, `.5` and `0.000001`. Rejects empty input, signs,
/// exponents, NaN/infinity, zero, and more than six fractional digits.
pub fn parse_amount(input: &str) -> Result<u64, WalletError> {
    let input = input.trim();
    let (whole, frac) = match input.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (input, ""),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty())
        || !all_digits(whole)
        || !all_digits(frac)
        || frac.len() > MAX_DECIMALS
    {
        return Err(WalletError::InvalidAmount);
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| WalletError::InvalidAmount)?
    };
    let frac_micro: u64 = if frac.is_empty() {
        0
    } else {
        format!("{:0<6}", frac)
            .parse()
            .map_err(|_| WalletError::InvalidAmount)?
    };

    let micro = whole
        .checked_mul(MICRO_PER_UNIT)
        .and_then(|m| m.checked_add(frac_micro))
        .ok_or(WalletError::InvalidAmount)?;

    if micro == 0 {
        return Err(WalletError::InvalidAmount);
    }

    Ok(micro)
}
