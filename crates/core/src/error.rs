// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use drill_assign_domain::DomainError;

/// Errors that can occur in the allocation core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The sequence space for a `(scenario, organization)` pair is exhausted.
    SequenceExhausted {
        /// The highest number ever issued for the pair.
        last_issued: u32,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::SequenceExhausted { last_issued } => {
                write!(
                    f,
                    "Sequence exhausted: cannot issue a number after {last_issued}"
                )
            }
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DomainViolation(err) => Some(err),
            Self::SequenceExhausted { .. } => None,
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
