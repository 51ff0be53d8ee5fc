//! Conversions between raw integer amounts and human-readable decimal strings

use crate::errors::BalanceError;

fn invalid(value: &str) -> BalanceError {
    BalanceError::InvalidAmount {
        value: value.to_string(),
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Render a raw amount with `decimals` fractional digits.
///
/// Trailing zeros of the fraction are dropped: `("1230", 2)` gives `"12.3"`,
/// `("1", 2)` gives `"0.01"`.
pub fn to_decimal_string(raw: &str, decimals: usize) -> Result<String, BalanceError> {
    if !is_digits(raw) {
        return Err(invalid(raw));
    }
    if decimals == 0 {
        return Ok(raw.to_string());
    }

    let padded = format!("{raw:0>width$}", width = decimals + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    let frac_part = frac_part.trim_end_matches('0');

    if frac_part.is_empty() {
        Ok(int_part.to_string())
    } else {
        Ok(format!("{int_part}.{frac_part}"))
    }
}

/// Parse a decimal string into a raw amount with `decimals` fractional digits.
///
/// `("1.2", 3)` gives `"1200"`. Fails when the value has more fractional
/// digits than `decimals`.
pub fn from_decimal_string(value: &str, decimals: usize) -> Result<String, BalanceError> {
    let (int_part, frac_part) = match value.split_once('.') {
        Some((i, f)) => (i, f),
        None => (value, ""),
    };

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    if !is_digits(int_part) || !(frac_part.is_empty() || is_digits(frac_part)) {
        return Err(invalid(value));
    }
    validate_decimal_places(value, decimals)?;

    // only significant digits count against `decimals`
    let frac_part = frac_part.trim_end_matches('0');
    let raw = format!("{int_part}{frac_part:0<decimals$}");
    let trimmed = raw.trim_start_matches('0');
    Ok(if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    })
}

/// Number of significant fractional digits in a decimal string
pub fn number_of_decimals(value: &str) -> usize {
    value
        .split_once('.')
        .map(|(_, frac)| frac.trim_end_matches('0').len())
        .unwrap_or(0)
}

/// Check that `value` has at most `allowed` fractional digits
pub fn validate_decimal_places(value: &str, allowed: usize) -> Result<(), BalanceError> {
    let places = number_of_decimals(value);
    if places > allowed {
        return Err(BalanceError::TooManyDecimalPlaces { places, allowed });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_string() {
        assert_eq!(to_decimal_string("123", 2).unwrap(), "1.23");
        assert_eq!(to_decimal_string("1230", 2).unwrap(), "12.3");
        assert_eq!(to_decimal_string("123", 0).unwrap(), "123");
        assert_eq!(to_decimal_string("1", 2).unwrap(), "0.01");
        assert_eq!(to_decimal_string("123", 5).unwrap(), "0.00123");
        assert_eq!(to_decimal_string("1000", 3).unwrap(), "1");
        assert!(to_decimal_string("1.5", 2).is_err());
    }

    #[test]
    fn test_from_decimal_string() {
        assert_eq!(from_decimal_string("1.23", 2).unwrap(), "123");
        assert_eq!(from_decimal_string("123", 0).unwrap(), "123");
        assert_eq!(from_decimal_string("1.2", 3).unwrap(), "1200");
        assert_eq!(from_decimal_string("0.123", 5).unwrap(), "12300");
        assert_eq!(from_decimal_string("0", 6).unwrap(), "0");
        assert_eq!(from_decimal_string("0.000", 2).unwrap(), "0");
        assert!(from_decimal_string("1.234", 2).is_err());
        assert!(from_decimal_string("abc", 2).is_err());
    }

    #[test]
    fn test_from_decimal_string_trailing_zeros() {
        assert_eq!(from_decimal_string("1.20", 1).unwrap(), "12");
        assert_eq!(from_decimal_string("5.0", 0).unwrap(), "5");
        assert_eq!(from_decimal_string("2.500", 6).unwrap(), "2500000");
    }

    #[test]
    fn test_number_of_decimals() {
        assert_eq!(number_of_decimals("1.123"), 3);
        assert_eq!(number_of_decimals("1.1"), 1);
        assert_eq!(number_of_decimals("1"), 0);
        assert_eq!(number_of_decimals("0.0001"), 4);
        assert_eq!(number_of_decimals("100"), 0);
    }

    #[test]
    fn test_validate_decimal_places() {
        assert!(validate_decimal_places("1.123", 3).is_ok());
        assert!(validate_decimal_places("100", 0).is_ok());

        let err = validate_decimal_places("0.0001", 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: The value has 4 decimal places, but only 3 are allowed. Please enter a value with 3 decimal places."
        );
    }
}
