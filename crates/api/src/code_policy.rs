// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Short code policy enforcement for the API boundary.
//!
//! Button codes embed the organization short code and end up printed on
//! physical badges, so malformed codes are rejected at registration time —
//! before they can corrupt button-code formatting downstream. The domain
//! layer re-validates on construction; this module exists to give boundary
//! callers precise, field-level policy errors.

use thiserror::Error;

/// Maximum short code length accepted at the boundary.
pub const MAX_SHORT_CODE_LENGTH: usize = 10;

/// Short code policy violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortCodePolicyError {
    /// The short code is empty.
    #[error("Short code cannot be empty")]
    Empty,
    /// The short code exceeds the maximum length.
    #[error("Short code must be at most {max} characters, got {actual}")]
    TooLong {
        /// The maximum allowed length.
        max: usize,
        /// The length of the rejected value.
        actual: usize,
    },
    /// The short code contains a non-alphabetic character.
    #[error("Short code must contain only letters, got '{0}'")]
    NonAlphabetic(String),
}

/// Enforces the short code policy on a raw request value.
///
/// # Arguments
///
/// * `raw` - The short code as submitted
///
/// # Errors
///
/// Returns a `ShortCodePolicyError` describing the first violated rule.
pub fn enforce_short_code_policy(raw: &str) -> Result<(), ShortCodePolicyError> {
    if raw.is_empty() {
        return Err(ShortCodePolicyError::Empty);
    }

    let length: usize = raw.chars().count();
    if length > MAX_SHORT_CODE_LENGTH {
        return Err(ShortCodePolicyError::TooLong {
            max: MAX_SHORT_CODE_LENGTH,
            actual: length,
        });
    }

    if !raw.chars().all(char::is_alphabetic) {
        return Err(ShortCodePolicyError::NonAlphabetic(raw.to_owned()));
    }

    Ok(())
}
