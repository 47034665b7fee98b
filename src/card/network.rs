//! Card network detection from number prefix and length.

use super::digits_only;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Issuing scheme of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// Visa.
    Visa,
    /// MasterCard.
    MasterCard,
    /// American Express.
    AmericanExpress,
    /// UnionPay.
    UnionPay,
    /// JCB.
    Jcb,
    /// Diners Club.
    DinersClub,
    /// RuPay.
    RuPay,
    /// No known pattern matched.
    Unknown,
}

impl Network {
    /// Returns true if a known scheme was detected.
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Visa => "Visa",
            Self::MasterCard => "MasterCard",
            Self::AmericanExpress => "American Express",
            Self::UnionPay => "UnionPay",
            Self::Jcb => "JCB",
            Self::DinersClub => "Diners Club",
            Self::RuPay => "RuPay",
            Self::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Numeric value of the first `width` digits, if the number is that long.
fn prefix(digits: &str, width: usize) -> Option<u32> {
    digits.get(..width).and_then(|p| p.parse().ok())
}

fn prefix_in(digits: &str, width: usize, range: std::ops::RangeInclusive<u32>) -> bool {
    prefix(digits, width).is_some_and(|p| range.contains(&p))
}

fn prefix_is(digits: &str, width: usize, candidates: &[u32]) -> bool {
    prefix(digits, width).is_some_and(|p| candidates.contains(&p))
}

/// Classify a card number by its leading digits and length.
///
/// Non-digit characters are ignored, so display-formatted numbers classify
/// the same as raw ones. Returns [`Network::Unknown`] when no pattern matches.
#[must_use]
pub fn detect_network(card_number: &str) -> Network {
    let digits = digits_only(card_number);
    let len = digits.len();

    if digits.starts_with('4') && (len == 13 || len == 16) {
        Network::Visa
    } else if (prefix_in(&digits, 2, 51..=55) || prefix_in(&digits, 2, 22..=27)) && len == 16 {
        Network::MasterCard
    } else if prefix_is(&digits, 2, &[34, 37]) && len == 15 {
        Network::AmericanExpress
    } else if prefix_is(&digits, 2, &[62]) && (16..=19).contains(&len) {
        Network::UnionPay
    } else if (prefix_is(&digits, 4, &[2131, 1800]) || prefix_is(&digits, 2, &[35]))
        && (len == 15 || len == 16)
    {
        Network::Jcb
    } else if (prefix_in(&digits, 3, 300..=305) || prefix_is(&digits, 2, &[36, 38])) && len == 14 {
        Network::DinersClub
    } else if prefix_is(&digits, 2, &[60, 65, 81]) && (16..=19).contains(&len) {
        Network::RuPay
    } else {
        Network::Unknown
    }
}
