//! Payment details
//!
//! Payment is simulated: details are checked for shape only and never leave
//! the process.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroize;

/// Number of digits in a card number.
pub const CARD_NUMBER_DIGITS: usize = 13;

/// Number of digits in an expiry date (`MMYY`).
pub const EXPIRY_DIGITS: usize = 4;

/// Number of digits in a card verification value.
pub const CVV_DIGITS: usize = 3;

/// Errors raised while validating payment details.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PaymentError {
    /// Card number is not exactly 13 digits.
    #[error("invalid card number, it should be a {CARD_NUMBER_DIGITS}-digit number")]
    InvalidCardNumber,

    /// Expiry date is not exactly 4 digits.
    #[error("invalid expiry date, it should be a {EXPIRY_DIGITS}-digit number (MMYY)")]
    InvalidExpiry,

    /// CVV is not exactly 3 digits.
    #[error("invalid CVV, it should be a {CVV_DIGITS}-digit number")]
    InvalidCvv,
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|byte| byte.is_ascii_digit())
}

/// Check a card number.
///
/// # Errors
///
/// Returns [`PaymentError::InvalidCardNumber`] unless `value` is 13 ASCII digits.
pub fn validate_card_number(value: &str) -> Result<(), PaymentError> {
    if is_digits(value, CARD_NUMBER_DIGITS) {
        Ok(())
    } else {
        Err(PaymentError::InvalidCardNumber)
    }
}

/// Check an expiry date.
///
/// # Errors
///
/// Returns [`PaymentError::InvalidExpiry`] unless `value` is 4 ASCII digits.
pub fn validate_expiry(value: &str) -> Result<(), PaymentError> {
    if is_digits(value, EXPIRY_DIGITS) {
        Ok(())
    } else {
        Err(PaymentError::InvalidExpiry)
    }
}

/// Check a card verification value.
///
/// # Errors
///
/// Returns [`PaymentError::InvalidCvv`] unless `value` is 3 ASCII digits.
pub fn validate_cvv(value: &str) -> Result<(), PaymentError> {
    if is_digits(value, CVV_DIGITS) {
        Ok(())
    } else {
        Err(PaymentError::InvalidCvv)
    }
}

/// Validated card details, wiped from memory on drop.
pub struct PaymentDetails {
    card_number: String,
    expiry: String,
    cvv: String,
}

impl PaymentDetails {
    /// Validate and capture card details.
    ///
    /// # Errors
    ///
    /// Returns the [`PaymentError`] of the first field that fails validation.
    pub fn new(
        card_number: impl Into<String>,
        expiry: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Result<Self, PaymentError> {
        let details = Self {
            card_number: card_number.into(),
            expiry: expiry.into(),
            cvv: cvv.into(),
        };

        validate_card_number(&details.card_number)?;
        validate_expiry(&details.expiry)?;
        validate_cvv(&details.cvv)?;

        Ok(details)
    }

    /// Card number with every digit but the last four hidden.
    pub fn masked_card_number(&self) -> String {
        let visible = self.card_number.len().saturating_sub(4);

        self.card_number
            .char_indices()
            .map(|(index, digit)| if index < visible { '*' } else { digit })
            .collect()
    }

    /// Expiry date as entered.
    pub fn expiry(&self) -> &str {
        &self.expiry
    }
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_number", &self.masked_card_number())
            .field("expiry", &"**redacted**")
            .field("cvv", &"**redacted**")
            .finish()
    }
}

impl Drop for PaymentDetails {
    fn drop(&mut self) {
        self.card_number.zeroize();
        self.expiry.zeroize();
        self.cvv.zeroize();
    }
}
