//! Tracking identifier parsing.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

const MAX_TRACKING_ID_LEN: usize = 64;

/// A normalized tracking identifier: upper-case ASCII letters, digits and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackingId(String);

impl TrackingId {
    /// Trim, upper-case and validate `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] if the result is empty, longer
    /// than 64 characters, or contains anything but letters, digits and `-`.
    pub fn parse(raw: &str) -> Result<Self> {
        let id = raw.trim().to_ascii_uppercase();

        if id.is_empty() {
            return Err(Error::InvalidIdentifier("identifier is empty".to_string()));
        }
        if id.len() > MAX_TRACKING_ID_LEN {
            return Err(Error::InvalidIdentifier(format!(
                "identifier longer than {MAX_TRACKING_ID_LEN} characters"
            )));
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::InvalidIdentifier(format!(
                "{id:?} contains characters other than letters, digits and '-'"
            )));
        }

        Ok(Self(id))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TrackingId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
