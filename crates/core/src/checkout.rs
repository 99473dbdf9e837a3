//! Order totals and checkout form validation.
//!
//! [`OrderTotals::for_subtotal`] is the only place shipping and tax are
//! computed. The cart page, the checkout page and the order confirmation all
//! go through it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Email, EmailError, Price};

/// Flat shipping fee in cents.
pub const SHIPPING_FEE_CENTS: i64 = 599;

/// Sales tax rate in percent, applied to the subtotal.
pub const TAX_RATE_PERCENT: i64 = 8;

/// Breakdown of what an order costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderTotals {
    /// Apply the flat shipping fee and sales tax to `subtotal`.
    ///
    /// Amounts are exact; round only for display.
    #[must_use]
    pub fn for_subtotal(subtotal: Price) -> Self {
        let shipping = Price::new(Decimal::new(SHIPPING_FEE_CENTS, 2), subtotal.currency_code);
        let tax = subtotal * Decimal::new(TAX_RATE_PERCENT, 2);
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

/// Why a checkout submission was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// A required field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid email: {0}")]
    InvalidEmail(String),

    #[error("card number must be 12 to 19 digits")]
    InvalidCardNumber,

    #[error("expiry date must be in MM/YY format")]
    InvalidExpiry,

    #[error("CVV must be 3 or 4 digits")]
    InvalidCvv,

    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,
}

impl From<EmailError> for CheckoutError {
    fn from(err: EmailError) -> Self {
        Self::InvalidEmail(err.to_string())
    }
}

/// Fields submitted from the checkout form, unvalidated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub cvv: String,
}

/// Shipping and contact details accepted from a valid checkout form.
///
/// Payment fields are checked but not kept, apart from the last four card
/// digits shown on the confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub card_last_four: String,
}

impl CustomerDetails {
    /// First and last name joined with a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl CheckoutForm {
    /// Validate every field, stopping at the first problem.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] naming the first field that is blank or
    /// malformed.
    pub fn validate(&self) -> Result<CustomerDetails, CheckoutError> {
        let first_name = required(&self.first_name, "First name")?;
        let last_name = required(&self.last_name, "Last name")?;
        let email = Email::parse(required(&self.email, "Email")?)?;
        let address = required(&self.address, "Address")?;
        let city = required(&self.city, "City")?;
        let zip_code = required(&self.zip_code, "ZIP code")?;

        let card_digits = card_digits(required(&self.card_number, "Card number")?)?;
        validate_expiry(required(&self.expiry_date, "Expiry date")?)?;
        validate_cvv(required(&self.cvv, "CVV")?)?;

        let card_last_four = card_digits
            .chars()
            .skip(card_digits.len().saturating_sub(4))
            .collect();

        Ok(CustomerDetails {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email,
            address: address.to_owned(),
            city: city.to_owned(),
            zip_code: zip_code.to_owned(),
            card_last_four,
        })
    }

    /// A copy with the payment fields blanked, for re-rendering the form.
    #[must_use]
    pub fn without_payment(&self) -> Self {
        Self {
            card_number: String::new(),
            expiry_date: String::new(),
            cvv: String::new(),
            ..self.clone()
        }
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, CheckoutError> {
    let value = value.trim();
    if value.is_empty() {
        Err(CheckoutError::MissingField(field))
    } else {
        Ok(value)
    }
}

/// Strip spaces and dashes, then require 12 to 19 ASCII digits.
fn card_digits(value: &str) -> Result<String, CheckoutError> {
    let digits: String = value.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    if (12..=19).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(digits)
    } else {
        Err(CheckoutError::InvalidCardNumber)
    }
}

fn validate_expiry(value: &str) -> Result<(), CheckoutError> {
    let (month, year) = value.split_once('/').ok_or(CheckoutError::InvalidExpiry)?;
    let (month, year) = (month.trim(), year.trim());
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());

    if month.len() != 2 || year.len() != 2 || !all_digits(month) || !all_digits(year) {
        return Err(CheckoutError::InvalidExpiry);
    }
    match month.parse::<u8>() {
        Ok(1..=12) => Ok(()),
        _ => Err(CheckoutError::InvalidExpiry),
    }
}

fn validate_cvv(value: &str) -> Result<(), CheckoutError> {
    if (3..=4).contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CheckoutError::InvalidCvv)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 Analytical Way".to_string(),
            city: "London".to_string(),
            zip_code: "10001".to_string(),
            card_number: "4242 4242 4242 4242".to_string(),
            expiry_date: "09/29".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_totals_for_subtotal() {
        let totals = OrderTotals::for_subtotal(Price::usd_cents(4998));
        assert_eq!(totals.shipping, Price::usd_cents(599));
        assert_eq!(totals.tax.amount, Decimal::new(39_984, 4));
        assert_eq!(totals.total.amount, Decimal::new(599_684, 4));
        assert_eq!(totals.total.display(), "$59.97");
        assert_eq!(totals.tax.display(), "$4.00");
    }

    #[test]
    fn test_totals_for_empty_subtotal() {
        let totals = OrderTotals::for_subtotal(Price::ZERO);
        assert_eq!(totals.tax, Price::ZERO);
        assert_eq!(totals.total, Price::usd_cents(599));
    }

    #[test]
    fn test_valid_form() {
        let details = valid_form().validate().unwrap();
        assert_eq!(details.full_name(), "Ada Lovelace");
        assert_eq!(details.email.as_str(), "ada@example.com");
        assert_eq!(details.card_last_four, "4242");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let form = CheckoutForm {
            first_name: "  Ada ".to_string(),
            city: "\tLondon".to_string(),
            ..valid_form()
        };
        let details = form.validate().unwrap();
        assert_eq!(details.first_name, "Ada");
        assert_eq!(details.city, "London");
    }

    #[test]
    fn test_missing_fields() {
        let form = CheckoutForm {
            last_name: "   ".to_string(),
            ..valid_form()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            CheckoutError::MissingField("Last name")
        );

        assert_eq!(
            CheckoutForm::default().validate().unwrap_err(),
            CheckoutError::MissingField("First name")
        );
    }

    #[test]
    fn test_invalid_email() {
        let form = CheckoutForm {
            email: "not-an-email".to_string(),
            ..valid_form()
        };
        assert!(matches!(
            form.validate(),
            Err(CheckoutError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_card_number_rules() {
        for card in ["4242-4242-4242-4242", "424242424242", "4242424242424242424"] {
            let form = CheckoutForm {
                card_number: card.to_string(),
                ..valid_form()
            };
            assert!(form.validate().is_ok(), "{card} should be accepted");
        }
        for card in ["4242", "4242 4242 4242 424x", "42424242424242424242"] {
            let form = CheckoutForm {
                card_number: card.to_string(),
                ..valid_form()
            };
            assert_eq!(
                form.validate().unwrap_err(),
                CheckoutError::InvalidCardNumber,
                "{card} should be rejected"
            );
        }
    }

    #[test]
    fn test_expiry_rules() {
        for expiry in ["01/30", "12/25", " 07 / 28 "] {
            let form = CheckoutForm {
                expiry_date: expiry.to_string(),
                ..valid_form()
            };
            assert!(form.validate().is_ok(), "{expiry} should be accepted");
        }
        for expiry in ["13/25", "00/25", "1/25", "0125", "ab/cd", "01/2025"] {
            let form = CheckoutForm {
                expiry_date: expiry.to_string(),
                ..valid_form()
            };
            assert_eq!(
                form.validate().unwrap_err(),
                CheckoutError::InvalidExpiry,
                "{expiry} should be rejected"
            );
        }
    }

    #[test]
    fn test_cvv_rules() {
        for cvv in ["12", "12345", "12a"] {
            let form = CheckoutForm {
                cvv: cvv.to_string(),
                ..valid_form()
            };
            assert_eq!(form.validate().unwrap_err(), CheckoutError::InvalidCvv);
        }
        let form = CheckoutForm {
            cvv: "1234".to_string(),
            ..valid_form()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_without_payment_blanks_card_fields() {
        let form = valid_form().without_payment();
        assert_eq!(form.first_name, "Ada");
        assert!(form.card_number.is_empty());
        assert!(form.expiry_date.is_empty());
        assert!(form.cvv.is_empty());
    }
}
