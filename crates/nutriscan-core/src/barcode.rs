//! Barcode shape validation for UPC-A (12 digits) and EAN-13 (13 digits).

use std::fmt;

use crate::CoreError;

/// Returns `true` when `input`, after trimming surrounding whitespace, is made
/// only of ASCII digits and is exactly 12 or 13 characters long.
///
/// Never fails; any non-conforming input (including the empty string) is
/// simply `false`.
#[must_use]
pub fn validate_barcode(input: &str) -> bool {
    let trimmed = input.trim();
    matches!(trimmed.len(), 12 | 13) && trimmed.bytes().all(|b| b.is_ascii_digit())
}

/// A barcode that has passed [`validate_barcode`], stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Barcode(String);

impl Barcode {
    /// Parses and trims `input`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidBarcode`] if the trimmed input is not 12 or
    /// 13 ASCII digits.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        if validate_barcode(input) {
            Ok(Self(input.trim().to_owned()))
        } else {
            Err(CoreError::InvalidBarcode(input.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_upc_a_and_ean_13() {
        assert!(validate_barcode("012345678905"));
        assert!(validate_barcode("3017620422003"));
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert!(!validate_barcode(""));
        assert!(!validate_barcode("12345"));
        assert!(!validate_barcode("12345678901"));
        assert!(!validate_barcode("12345678901234"));
    }

    #[test]
    fn rejects_non_digits() {
        assert!(!validate_barcode("abcdefghijkl"));
        assert!(!validate_barcode("12345678901a"));
        assert!(!validate_barcode("123456 789012"));
        // Non-ASCII digits are not barcode digits.
        assert!(!validate_barcode("١٢٣٤٥٦٧٨٩٠١٢"));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert!(validate_barcode("  123456789012  "));
        assert!(validate_barcode("\t3017620422003\n"));
    }

    #[test]
    fn parse_keeps_trimmed_digits() {
        let barcode = Barcode::parse(" 3017620422003 ").expect("valid barcode");
        assert_eq!(barcode.as_str(), "3017620422003");
        assert_eq!(barcode.to_string(), "3017620422003");
    }

    #[test]
    fn parse_rejects_invalid_input() {
        assert_eq!(
            Barcode::parse("abc"),
            Err(CoreError::InvalidBarcode("abc".to_owned()))
        );
    }
}
