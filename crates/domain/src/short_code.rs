// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Maximum length of an organization short code.
pub const MAX_SHORT_CODE_LEN: usize = 10;

/// An organization's short code.
///
/// The short code is the prefix of every button code issued for the
/// organization, so it is restricted to alphabetic characters and is kept
/// exactly as entered — button codes are printed on physical badges and must
/// match what administrators typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortCode {
    /// The validated short code value.
    value: String,
}

impl ShortCode {
    /// Creates a new `ShortCode`.
    ///
    /// # Arguments
    ///
    /// * `value` - The short code value
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidShortCode` if the value is empty, longer
    /// than [`MAX_SHORT_CODE_LEN`] characters, or contains a non-alphabetic
    /// character.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::InvalidShortCode(String::from(
                "Short code cannot be empty",
            )));
        }
        if value.chars().count() > MAX_SHORT_CODE_LEN {
            return Err(DomainError::InvalidShortCode(format!(
                "Short code must be at most {MAX_SHORT_CODE_LEN} characters, got {}",
                value.chars().count()
            )));
        }
        if !value.chars().all(char::is_alphabetic) {
            return Err(DomainError::InvalidShortCode(format!(
                "Short code must contain only letters, got '{value}'"
            )));
        }
        Ok(Self {
            value: value.to_owned(),
        })
    }

    /// Returns the short code value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
