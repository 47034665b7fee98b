//! Card input validation and formatting.
//!
//! Everything here is pure: no I/O, no shared state. The form re-runs
//! [`validate`] after every field update and the fold over its result is the
//! only thing that enables submission.

mod form;
mod format;
mod network;
mod validate;

pub use form::{CardField, CardForm, CardInput};
pub use format::{format_card_number, format_cvv, format_expiry, format_holder_name, MAX_CARD_DIGITS};
pub use network::{detect_network, Network};
pub use validate::{
    luhn_valid, validate, validate_at, validate_cvv, validate_expiry, validate_expiry_at,
    validate_holder_name, ValidationErrors,
};

/// Keep only the ASCII digits of `input`.
pub(crate) fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}
