//! UPI deep-link construction
//!
//! A payment link has the shape
//! `upi://pay?pa=<payee>&am=<amount>&cu=INR&tn=Payment`. Payee and amount are
//! percent-encoded exactly as entered; currency and note are fixed.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt;
use thiserror::Error;

/// Deep-link scheme and path registered by UPI apps.
pub const SCHEME: &str = "upi://pay";
/// Fixed currency code carried in every link.
pub const CURRENCY: &str = "INR";
/// Fixed transaction note carried in every link.
pub const NOTE: &str = "Payment";

/// Characters escaped in query values: everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Reasons an identifier/amount pair cannot be encoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifier is empty or whitespace only
    #[error("UPI ID is required")]
    MissingIdentifier,

    /// Amount is not a positive finite number
    #[error("Invalid amount '{0}': expected a number greater than 0")]
    InvalidAmount(String),
}

/// A validated, fully encoded UPI payment link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentLink {
    uri: String,
}

impl PaymentLink {
    /// The link text, as rendered into the barcode and copied to the clipboard.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Raw bytes of the link.
    pub fn as_bytes(&self) -> &[u8] {
        self.uri.as_bytes()
    }

    /// Consume the link, returning its text.
    pub fn into_string(self) -> String {
        self.uri
    }
}

impl fmt::Display for PaymentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for PaymentLink {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

/// Validate the pair and build the payment link.
///
/// Validation looks at the trimmed text, but the link carries the text as
/// entered.
pub fn encode(identifier: &str, amount: &str) -> Result<PaymentLink, ValidationError> {
    if identifier.trim().is_empty() {
        return Err(ValidationError::MissingIdentifier);
    }

    parse_amount(amount)?;

    let uri = format!(
        "{SCHEME}?pa={}&am={}&cu={CURRENCY}&tn={NOTE}",
        utf8_percent_encode(identifier, COMPONENT),
        utf8_percent_encode(amount, COMPONENT),
    );
    tracing::debug!(link = %uri, "Encoded UPI payment link");

    Ok(PaymentLink { uri })
}

/// Parse an amount field, accepting only finite values strictly above zero.
pub fn parse_amount(amount: &str) -> Result<f64, ValidationError> {
    let trimmed = amount.trim();
    let invalid = || ValidationError::InvalidAmount(amount.to_string());

    if trimmed.is_empty() {
        return Err(invalid());
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_basic_link() {
        let link = encode("alice@bank", "250").unwrap();
        assert_eq!(
            link.as_str(),
            "upi://pay?pa=alice%40bank&am=250&cu=INR&tn=Payment"
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let first = encode("shop.owner@okaxis", "99.50").unwrap();
        let second = encode("shop.owner@okaxis", "99.50").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_encode_percent_encodes_reserved_characters() {
        let link = encode("a b&c=d@x", "1").unwrap();
        assert!(link.as_str().starts_with("upi://pay?pa=a%20b%26c%3Dd%40x&am=1&"));
    }

    #[test]
    fn test_encode_leaves_component_marks_unescaped() {
        let link = encode("o'brien(x)!*@upi", "1").unwrap();
        assert_eq!(
            link.as_str(),
            "upi://pay?pa=o'brien(x)!*%40upi&am=1&cu=INR&tn=Payment"
        );
        let link = encode("a-b_c.d~e@upi", "1").unwrap();
        assert!(link.as_str().contains("pa=a-b_c.d~e%40upi&"));
    }

    #[test]
    fn test_encode_non_ascii_as_utf8() {
        let link = encode("café@upi", "1").unwrap();
        assert!(link.as_str().contains("pa=caf%C3%A9%40upi&"));
    }

    #[test]
    fn test_identifier_kept_as_entered() {
        let link = encode(" bob@upi", "10").unwrap();
        assert!(link.as_str().contains("pa=%20bob%40upi&"));
    }

    #[test]
    fn test_missing_identifier() {
        for id in ["", " ", "\t\n"] {
            assert_eq!(encode(id, "250"), Err(ValidationError::MissingIdentifier));
            assert_eq!(encode(id, "abc"), Err(ValidationError::MissingIdentifier));
        }
    }

    #[test]
    fn test_invalid_amounts() {
        // Radix prefixes are not decimal amounts
        for amount in ["0x10", "0b1", "0o7", "", "  ", "0", "-5", "-10", "abc", "0.0", "NaN", "inf", "1e400", "12abc"] {
            assert!(
                matches!(
                    encode("alice@bank", amount),
                    Err(ValidationError::InvalidAmount(_))
                ),
                "amount {amount:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_valid_amounts() {
        for amount in ["1", "0.01", "250", "1e3", " 42 ", "+7"] {
            assert!(encode("alice@bank", amount).is_ok(), "amount {amount:?}");
        }
    }

    #[test]
    fn test_parse_amount_value() {
        assert_eq!(parse_amount("12.5"), Ok(12.5));
        assert_eq!(
            parse_amount("-1"),
            Err(ValidationError::InvalidAmount("-1".to_string()))
        );
    }
}
