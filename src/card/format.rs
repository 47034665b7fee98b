//! Display formatting for card fields.
//!
//! Every helper here is idempotent: formatting already-formatted input gives
//! back the same string.

/// Maximum number of digits accepted in the card number field.
pub const MAX_CARD_DIGITS: usize = 16;

const MAX_EXPIRY_DIGITS: usize = 4;
const MAX_CVV_DIGITS: usize = 4;

/// Format a card number in space-separated groups of four digits.
///
/// Non-digits are dropped and input is truncated to [`MAX_CARD_DIGITS`].
#[must_use]
pub fn format_card_number(raw: &str) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_CARD_DIGITS)
        .collect();

    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format an expiry date as `MM/YY`, inserting the slash once a third digit
/// is typed.
#[must_use]
pub fn format_expiry(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_EXPIRY_DIGITS)
        .collect();

    if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// Keep at most four digits of a CVV.
#[must_use]
pub fn format_cvv(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(MAX_CVV_DIGITS)
        .collect()
}

/// Keep letters and spaces only, upper-cased.
#[must_use]
pub fn format_holder_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .collect::<String>()
        .to_ascii_uppercase()
}
