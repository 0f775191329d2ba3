//! Conversions between integers, strings and field elements

use num_bigint::{BigInt, BigUint, Sign};
use starknet_types_core::felt::Felt;

use crate::FeltError;

/// The field modulus `P = 2^251 + 17 * 2^192 + 1`
pub fn field_modulus() -> BigUint {
    Felt::MAX.to_biguint() + 1u8
}

/// Convert an unsigned integer into a field element.
///
/// Unlike `Felt::from(BigUint)`, values `>= P` are rejected instead of
/// being silently reduced.
pub fn felt_from_biguint(value: &BigUint) -> Result<Felt, FeltError> {
    if *value > Felt::MAX.to_biguint() {
        return Err(FeltError::OutOfRange(value.to_string()));
    }
    let bytes = value.to_bytes_be();
    let mut buf = [0u8; 32];
    buf[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(Felt::from_bytes_be(&buf))
}

/// Convert a signed integer into a field element, rejecting negatives
pub fn felt_from_bigint(value: &BigInt) -> Result<Felt, FeltError> {
    if value.sign() == Sign::Minus {
        return Err(FeltError::Negative(value.to_string()));
    }
    felt_from_biguint(value.magnitude())
}

/// Field element as an unsigned integer
pub fn felt_to_biguint(felt: &Felt) -> BigUint {
    felt.to_biguint()
}

/// Minimal `0x`-prefixed lowercase hex representation
pub fn felt_to_hex(felt: &Felt) -> String {
    format!("0x{}", felt.to_biguint().to_str_radix(16))
}

/// Parse a hex string (with or without `0x`)
pub fn parse_felt_hex(s: &str) -> Result<Felt, FeltError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.is_empty() {
        return Err(FeltError::InvalidHex(s.to_string()));
    }
    let value = BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| FeltError::InvalidHex(s.to_string()))?;
    felt_from_biguint(&value)
}

/// Parse a decimal string; a leading `-` is reported as [`FeltError::Negative`]
pub fn parse_felt_dec(s: &str) -> Result<Felt, FeltError> {
    let value = BigInt::parse_bytes(s.as_bytes(), 10)
        .ok_or_else(|| FeltError::InvalidDecimal(s.to_string()))?;
    felt_from_bigint(&value)
}

/// Parse either representation: `0x` prefix means hex, anything else decimal
pub fn parse_felt(s: &str) -> Result<Felt, FeltError> {
    let s = s.trim();
    if s.starts_with("0x") || s.starts_with("0X") {
        parse_felt_hex(s)
    } else {
        parse_felt_dec(s)
    }
}

/// Encode an ASCII string of at most 31 characters as a field element
pub fn felt_from_short_string(s: &str) -> Result<Felt, FeltError> {
    if !s.is_ascii() {
        return Err(FeltError::NonAscii);
    }
    if s.len() > 31 {
        return Err(FeltError::ShortStringTooLong(s.len()));
    }
    Ok(Felt::from_bytes_be_slice(s.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_felt_hex() {
        assert_eq!(parse_felt_hex("0x10").unwrap(), Felt::from(16u64));
        assert_eq!(parse_felt_hex("10").unwrap(), Felt::from(16u64));
        assert_eq!(parse_felt_hex("0X1f").unwrap(), Felt::from(31u64));
        assert!(matches!(parse_felt_hex("0x"), Err(FeltError::InvalidHex(_))));
        assert!(matches!(parse_felt_hex("0xzz"), Err(FeltError::InvalidHex(_))));
    }

    #[test]
    fn test_parse_felt_dec() {
        assert_eq!(parse_felt_dec("1234").unwrap(), Felt::from(1234u64));
        assert!(matches!(parse_felt_dec("-1"), Err(FeltError::Negative(_))));
        assert!(matches!(parse_felt_dec("1.5"), Err(FeltError::InvalidDecimal(_))));
    }

    #[test]
    fn test_parse_felt_dispatch() {
        assert_eq!(parse_felt("0x2a").unwrap(), Felt::from(42u64));
        assert_eq!(parse_felt(" 42 ").unwrap(), Felt::from(42u64));
    }

    #[test]
    fn test_field_bounds() {
        let max = Felt::MAX.to_biguint();
        assert_eq!(felt_from_biguint(&max).unwrap(), Felt::MAX);

        let modulus = field_modulus();
        assert!(matches!(
            felt_from_biguint(&modulus),
            Err(FeltError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_felt_from_bigint_negative() {
        let value = BigInt::from(-5);
        assert_eq!(
            felt_from_bigint(&value),
            Err(FeltError::Negative("-5".to_string()))
        );
    }

    #[test]
    fn test_felt_to_hex() {
        assert_eq!(felt_to_hex(&Felt::ZERO), "0x0");
        assert_eq!(felt_to_hex(&Felt::from(255u64)), "0xff");
    }

    #[test]
    fn test_short_string() {
        let felt = felt_from_short_string("abc").unwrap();
        assert_eq!(felt, Felt::from(0x616263u64));
        assert_eq!(felt_from_short_string("").unwrap(), Felt::ZERO);
        assert_eq!(
            felt_from_short_string(&"a".repeat(32)),
            Err(FeltError::ShortStringTooLong(32))
        );
        assert_eq!(felt_from_short_string("é"), Err(FeltError::NonAscii));
    }

    proptest! {
        #[test]
        fn prop_hex_roundtrip(value in any::<u128>()) {
            let felt = Felt::from(value);
            prop_assert_eq!(parse_felt_hex(&felt_to_hex(&felt)).unwrap(), felt);
        }
    }
}
