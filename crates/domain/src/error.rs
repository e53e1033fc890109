// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Organization name is empty or invalid.
    InvalidOrganizationName(String),
    /// Organization short code fails the alphabetic-only policy.
    InvalidShortCode(String),
    /// Scenario name is empty or invalid.
    InvalidScenarioName(String),
    /// Victim profile number is present but invalid.
    InvalidProfileNumber(String),
    /// A sequential number outside the valid range was supplied.
    InvalidSequentialNumber {
        /// The invalid value.
        value: u32,
    },
    /// The victim profile already has an assigned Assignment in this scenario.
    DuplicateProfileInScenario {
        /// The scenario identifier.
        scenario_id: i64,
        /// The victim profile identifier.
        victim_profile_id: i64,
    },
    /// The same victim profile appears more than once in a batch request.
    DuplicateProfileInBatch {
        /// The victim profile identifier.
        victim_profile_id: i64,
    },
    /// A batch allocation request contained no profiles.
    EmptyBatch,
    /// The assignment already carries an issued number; assignment is one-way.
    AssignmentAlreadyNumbered {
        /// The assignment identifier.
        assignment_id: i64,
        /// The button code already issued to it.
        button_number: String,
    },
    /// An assignment row violates the placeholder/assigned state invariant.
    InconsistentAssignment {
        /// Description of the violated invariant.
        reason: String,
    },
    /// A scenario already exists; the system allows at most one at a time.
    ScenarioAlreadyExists {
        /// The name of the existing scenario.
        existing_name: String,
    },
    /// The organization's short code cannot change while assignments reference it.
    ShortCodeImmutable {
        /// The organization name.
        organization_name: String,
    },
    /// The organization cannot be deleted while assignments reference it.
    OrganizationReferenced {
        /// The organization name.
        organization_name: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOrganizationName(msg) => write!(f, "Invalid organization name: {msg}"),
            Self::InvalidShortCode(msg) => write!(f, "Invalid short code: {msg}"),
            Self::InvalidScenarioName(msg) => write!(f, "Invalid scenario name: {msg}"),
            Self::InvalidProfileNumber(msg) => write!(f, "Invalid profile number: {msg}"),
            Self::InvalidSequentialNumber { value } => {
                write!(f, "Invalid sequential number: {value}. Must be at least 1")
            }
            Self::DuplicateProfileInScenario {
                scenario_id,
                victim_profile_id,
            } => {
                write!(
                    f,
                    "Victim profile {victim_profile_id} already has an assignment in scenario {scenario_id}"
                )
            }
            Self::DuplicateProfileInBatch { victim_profile_id } => {
                write!(
                    f,
                    "Victim profile {victim_profile_id} appears more than once in the batch"
                )
            }
            Self::EmptyBatch => write!(f, "Batch allocation requires at least one profile"),
            Self::AssignmentAlreadyNumbered {
                assignment_id,
                button_number,
            } => {
                write!(
                    f,
                    "Assignment {assignment_id} already carries button code '{button_number}'"
                )
            }
            Self::InconsistentAssignment { reason } => {
                write!(f, "Inconsistent assignment state: {reason}")
            }
            Self::ScenarioAlreadyExists { existing_name } => {
                write!(
                    f,
                    "Scenario '{existing_name}' already exists; delete it before creating another"
                )
            }
            Self::ShortCodeImmutable { organization_name } => {
                write!(
                    f,
                    "Short code of organization '{organization_name}' cannot change: issued button codes reference it"
                )
            }
            Self::OrganizationReferenced { organization_name } => {
                write!(
                    f,
                    "Organization '{organization_name}' cannot be deleted: assignments reference it"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
