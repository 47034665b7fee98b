//! Field predicates and the aggregate validation pass.

use super::form::{CardField, CardInput};
use chrono::{Datelike, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Luhn (mod 10) checksum over the digits of `card_number`.
///
/// Non-digits are stripped first. Empty input is invalid.
#[must_use]
pub fn luhn_valid(card_number: &str) -> bool {
    let digits: Vec<u32> = card_number.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.is_empty() {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

/// Check an `MM/YY` expiry against today's date (UTC).
#[must_use]
pub fn validate_expiry(mm_yy: &str) -> bool {
    validate_expiry_at(mm_yy, Utc::now().date_naive())
}

/// Check an `MM/YY` expiry against `today`.
///
/// The card is valid through the whole of its expiry month. The two-digit
/// year is compared against `today`'s year modulo 100, so there is no
/// century rollover handling.
#[must_use]
pub fn validate_expiry_at(mm_yy: &str, today: NaiveDate) -> bool {
    let Some((mm, yy)) = mm_yy.split_once('/') else {
        return false;
    };
    if !is_digits(mm, 2) || !is_digits(yy, 2) {
        return false;
    }
    let (Ok(month), Ok(year)) = (mm.parse::<u32>(), yy.parse::<u32>()) else {
        return false;
    };
    if !(1..=12).contains(&month) {
        return false;
    }

    let current_year = today.year().rem_euclid(100).unsigned_abs();
    (year, month) >= (current_year, today.month())
}

/// Three or four digits, nothing else.
#[must_use]
pub fn validate_cvv(cvv: &str) -> bool {
    is_digits(cvv, 3) || is_digits(cvv, 4)
}

/// At least two whitespace-separated tokens made only of ASCII letters.
#[must_use]
pub fn validate_holder_name(name: &str) -> bool {
    let mut tokens = 0;
    for token in name.split_whitespace() {
        if !token.chars().all(|c| c.is_ascii_alphabetic()) {
            return false;
        }
        tokens += 1;
    }
    tokens >= 2
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Per-field validation messages.
///
/// Every field is always present; an empty message means the field is valid.
/// A field blocks submission if and only if its message is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    messages: BTreeMap<CardField, String>,
}

impl ValidationErrors {
    /// Message for `field`, or `""` when it is valid.
    #[must_use]
    pub fn message(&self, field: CardField) -> &str {
        self.messages.get(&field).map_or("", String::as_str)
    }

    /// Returns true if `field` currently blocks submission.
    #[must_use]
    pub fn is_blocking(&self, field: CardField) -> bool {
        !self.message(field).is_empty()
    }

    /// Aggregate validity: no field carries a message.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.messages.values().all(String::is_empty)
    }

    /// Iterate over every field and its message.
    pub fn iter(&self) -> impl Iterator<Item = (CardField, &str)> {
        self.messages.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blocking: Vec<String> = self
            .iter()
            .filter(|(_, msg)| !msg.is_empty())
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect();
        f.write_str(&blocking.join("; "))
    }
}

/// Validate every field of `input` against today's date (UTC).
#[must_use]
pub fn validate(input: &CardInput) -> ValidationErrors {
    validate_at(input, Utc::now().date_naive())
}

/// Validate every field of `input`, judging the expiry against `today`.
#[must_use]
pub fn validate_at(input: &CardInput, today: NaiveDate) -> ValidationErrors {
    let card_number = if input.card_number.is_empty() {
        "Card number is required"
    } else if !luhn_valid(&input.card_number) {
        "Card number is invalid"
    } else if !input.network().is_known() {
        "Card network is not supported"
    } else {
        ""
    };

    let expiry = if input.expiry_date.is_empty() {
        "Expiry date is required"
    } else if !validate_expiry_at(&input.expiry_date, today) {
        "Expiry date must be a current or future MM/YY"
    } else {
        ""
    };

    let cvv = if validate_cvv(&input.cvv) {
        ""
    } else {
        "CVV must be 3 or 4 digits"
    };

    let holder_name = if validate_holder_name(&input.holder_name) {
        ""
    } else {
        "Enter the cardholder's first and last name"
    };

    let messages = [
        (CardField::CardNumber, card_number),
        (CardField::ExpiryDate, expiry),
        (CardField::Cvv, cvv),
        (CardField::HolderName, holder_name),
    ]
    .into_iter()
    .map(|(field, msg)| (field, msg.to_string()))
    .collect();

    ValidationErrors { messages }
}
