//! Fixed-point (10^18) adapter between on-chain integer words and [`Decimal`].
//!
//! Share amounts arrive on the wire as unsigned 256-bit integers scaled by
//! 10^18 and rendered as 32-byte hex words. This module converts those words
//! to decimals and back (the reverse direction is mostly useful for building
//! test fixtures).

use super::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal as RustDecimal;
use thiserror::Error;

/// Number of fractional digits in the on-chain fixed-point representation.
pub const FIXED_SCALE: u32 = 18;

/// Hex digits in one 32-byte data word.
pub const WORD_HEX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixedPointError {
    #[error("invalid hex word: {0}")]
    InvalidHex(String),
    #[error("value does not fit the supported numeric range: {0}")]
    Overflow(String),
    #[error("value has more than {FIXED_SCALE} fractional digits: {0}")]
    ExcessPrecision(String),
    #[error("cannot encode negative value: {0}")]
    Negative(String),
}

/// Parse a hex word (with or without 0x prefix) as an unsigned integer.
pub fn parse_hex_uint(word: &str) -> Result<u128, FixedPointError> {
    let digits = word.strip_prefix("0x").unwrap_or(word);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FixedPointError::InvalidHex(word.to_string()));
    }
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    if significant.len() > 32 {
        return Err(FixedPointError::Overflow(word.to_string()));
    }
    u128::from_str_radix(significant, 16)
        .map_err(|_| FixedPointError::InvalidHex(word.to_string()))
}

/// Decode a fixed-point hex word into a decimal share/price value.
pub fn unfix(word: &str) -> Result<Decimal, FixedPointError> {
    let raw = parse_hex_uint(word)?;
    if raw > i128::MAX as u128 {
        return Err(FixedPointError::Overflow(word.to_string()));
    }
    RustDecimal::try_from_i128_with_scale(raw as i128, FIXED_SCALE)
        .map(Decimal::new)
        .map_err(|_| FixedPointError::Overflow(word.to_string()))
}

/// Encode a non-negative decimal as a zero-padded 32-byte fixed-point word.
pub fn fix_to_word(value: Decimal) -> Result<String, FixedPointError> {
    if value.is_negative() {
        return Err(FixedPointError::Negative(value.to_string()));
    }
    let scale = RustDecimal::from(1_000_000_000_000_000_000u64);
    let scaled = value
        .inner()
        .checked_mul(scale)
        .ok_or_else(|| FixedPointError::Overflow(value.to_string()))?;
    if !scaled.fract().is_zero() {
        return Err(FixedPointError::ExcessPrecision(value.to_string()));
    }
    let raw = scaled
        .trunc()
        .to_u128()
        .ok_or_else(|| FixedPointError::Overflow(value.to_string()))?;
    Ok(uint_to_word(raw))
}

/// Render an unsigned integer as a zero-padded 32-byte hex word.
pub fn uint_to_word(value: u128) -> String {
    format!("{:0>width$x}", value, width = WORD_HEX_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_unfix_one_share() {
        // 10^18 == 0xde0b6b3a7640000
        let word = uint_to_word(1_000_000_000_000_000_000);
        assert_eq!(unfix(&word).unwrap(), d("1"));
    }

    #[test]
    fn test_unfix_fractional() {
        let word = uint_to_word(1_500_000_000_000_000_000);
        assert_eq!(unfix(&word).unwrap(), d("1.5"));
    }

    #[test]
    fn test_unfix_zero() {
        assert_eq!(unfix(&uint_to_word(0)).unwrap(), Decimal::zero());
    }

    #[test]
    fn test_unfix_accepts_0x_prefix() {
        assert_eq!(unfix("0xde0b6b3a7640000").unwrap(), d("1"));
    }

    #[test]
    fn test_unfix_rejects_garbage() {
        assert!(matches!(
            unfix("0xzz"),
            Err(FixedPointError::InvalidHex(_))
        ));
        assert!(matches!(unfix(""), Err(FixedPointError::InvalidHex(_))));
    }

    #[test]
    fn test_fix_roundtrip() {
        for s in ["0", "1", "1.5", "42.123456789", "100000"] {
            let word = fix_to_word(d(s)).unwrap();
            assert_eq!(word.len(), WORD_HEX_LEN);
            assert_eq!(unfix(&word).unwrap(), d(s));
        }
    }

    #[test]
    fn test_fix_rejects_negative() {
        assert!(matches!(
            fix_to_word(d("-1")),
            Err(FixedPointError::Negative(_))
        ));
    }

    #[test]
    fn test_parse_hex_uint() {
        assert_eq!(parse_hex_uint("0x1e").unwrap(), 30);
        assert_eq!(parse_hex_uint(&uint_to_word(7)).unwrap(), 7);
        assert_eq!(parse_hex_uint("0x0").unwrap(), 0);
    }
}
