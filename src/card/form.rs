//! Card input and the reactive form wrapped around it.

use super::format::{format_card_number, format_cvv, format_expiry, format_holder_name};
use super::network::{detect_network, Network};
use super::validate::{validate, ValidationErrors};
use super::digits_only;
use std::fmt;

/// A field of the card form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CardField {
    /// Card number.
    CardNumber,
    /// Expiry date (`MM/YY`).
    ExpiryDate,
    /// Card verification value.
    Cvv,
    /// Cardholder name.
    HolderName,
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CardNumber => "cardNumber",
            Self::ExpiryDate => "expiryDate",
            Self::Cvv => "cvv",
            Self::HolderName => "holderName",
        };
        f.pad(name)
    }
}

/// Card details as entered, held in display format.
///
/// The network is never stored; [`CardInput::network`] derives it from the
/// card number each time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardInput {
    /// Card number in groups of four.
    pub card_number: String,
    /// Expiry as `MM/YY`.
    pub expiry_date: String,
    /// Three or four digit CVV.
    pub cvv: String,
    /// Upper-cased cardholder name.
    pub holder_name: String,
}

impl CardInput {
    /// Build an input from raw field values, applying display formatting.
    #[must_use]
    pub fn new(card_number: &str, expiry_date: &str, cvv: &str, holder_name: &str) -> Self {
        Self {
            card_number: format_card_number(card_number),
            expiry_date: format_expiry(expiry_date),
            cvv: format_cvv(cvv),
            holder_name: format_holder_name(holder_name),
        }
    }

    /// Network detected from the current card number.
    #[must_use]
    pub fn network(&self) -> Network {
        detect_network(&self.card_number)
    }

    /// Last four digits of the card number, if at least four were entered.
    #[must_use]
    pub fn last_four(&self) -> Option<String> {
        let digits = digits_only(&self.card_number);
        digits
            .len()
            .checked_sub(4)
            .map(|start| digits[start..].to_string())
    }

    /// Set one field from raw input, applying that field's formatting.
    pub fn set(&mut self, field: CardField, raw: &str) {
        match field {
            CardField::CardNumber => self.card_number = format_card_number(raw),
            CardField::ExpiryDate => self.expiry_date = format_expiry(raw),
            CardField::Cvv => self.cvv = format_cvv(raw),
            CardField::HolderName => self.holder_name = format_holder_name(raw),
        }
    }
}

/// A card form whose validation result is recomputed on every update.
#[derive(Debug, Clone)]
pub struct CardForm {
    input: CardInput,
    errors: ValidationErrors,
}

impl CardForm {
    /// An empty form. Every field starts out blocking.
    #[must_use]
    pub fn new() -> Self {
        let input = CardInput::default();
        let errors = validate(&input);
        Self { input, errors }
    }

    /// Update one field and re-validate the whole input.
    pub fn update(&mut self, field: CardField, raw: &str) -> &ValidationErrors {
        self.input.set(field, raw);
        self.revalidate();
        &self.errors
    }

    /// Replace every field at once and re-validate.
    pub fn fill(&mut self, input: CardInput) -> &ValidationErrors {
        self.input = input;
        self.revalidate();
        &self.errors
    }

    /// Re-run validation against the current date and return aggregate validity.
    pub fn revalidate(&mut self) -> bool {
        self.errors = validate(&self.input);
        self.errors.is_valid()
    }

    /// Whether the submit action is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.errors.is_valid()
    }

    /// Current input.
    #[must_use]
    pub fn input(&self) -> &CardInput {
        &self.input
    }

    /// Current validation result.
    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Discard everything entered so far.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for CardForm {
    fn default() -> Self {
        Self::new()
    }
}
