// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::code_policy::ShortCodePolicyError;
use drill_assign_domain::DomainError;
use drill_assign_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/persistence errors and represent the API
/// contract. Lower-layer errors are translated explicitly and never leaked
/// raw; in particular, store-level uniqueness violations are retried
/// transparently and only ever surface as `AllocationContention`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The victim profile already has an assigned assignment in the scenario.
    DuplicateProfileInScenario {
        /// The scenario identifier.
        scenario_id: i64,
        /// The victim profile identifier.
        victim_profile_id: i64,
    },
    /// Bounded retries on the numbering race were exhausted.
    ///
    /// The whole operation is safe to retry; nothing was committed.
    AllocationContention {
        /// How many attempts were made before giving up.
        attempts: u32,
    },
    /// One or more profile ids in a batch were invalid; nothing was committed.
    BatchAllocationFailed {
        /// The offending profile ids.
        invalid_profile_ids: Vec<i64>,
    },
    /// The assignment already carries an issued number.
    AssignmentAlreadyNumbered {
        /// The assignment identifier.
        assignment_id: i64,
    },
    /// The short code fails the boundary policy.
    ShortCodePolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
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
            Self::AllocationContention { attempts } => {
                write!(
                    f,
                    "Allocation contention: gave up after {attempts} attempts; retry the operation"
                )
            }
            Self::BatchAllocationFailed {
                invalid_profile_ids,
            } => {
                write!(
                    f,
                    "Batch allocation failed: invalid profile ids {invalid_profile_ids:?}; nothing was committed"
                )
            }
            Self::AssignmentAlreadyNumbered { assignment_id } => {
                write!(
                    f,
                    "Assignment {assignment_id} already carries an issued number"
                )
            }
            Self::ShortCodePolicyViolation { message } => {
                write!(f, "Short code policy violation: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ShortCodePolicyError> for ApiError {
    fn from(err: ShortCodePolicyError) -> Self {
        Self::ShortCodePolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidOrganizationName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidShortCode(msg) => ApiError::InvalidInput {
            field: String::from("short_code"),
            message: msg,
        },
        DomainError::InvalidScenarioName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidProfileNumber(msg) => ApiError::InvalidInput {
            field: String::from("profile_number"),
            message: msg,
        },
        DomainError::InvalidSequentialNumber { value } => ApiError::InvalidInput {
            field: String::from("sequential_number"),
            message: format!("Invalid sequential number: {value}. Must be at least 1"),
        },
        DomainError::DuplicateProfileInScenario {
            scenario_id,
            victim_profile_id,
        } => ApiError::DuplicateProfileInScenario {
            scenario_id,
            victim_profile_id,
        },
        DomainError::DuplicateProfileInBatch { victim_profile_id } => {
            ApiError::BatchAllocationFailed {
                invalid_profile_ids: vec![victim_profile_id],
            }
        }
        DomainError::EmptyBatch => ApiError::InvalidInput {
            field: String::from("victim_profile_ids"),
            message: String::from("Batch allocation requires at least one profile"),
        },
        DomainError::AssignmentAlreadyNumbered { assignment_id, .. } => {
            ApiError::AssignmentAlreadyNumbered { assignment_id }
        }
        DomainError::InconsistentAssignment { reason } => ApiError::Internal {
            message: format!("Inconsistent assignment state: {reason}"),
        },
        DomainError::ScenarioAlreadyExists { existing_name } => ApiError::DomainRuleViolation {
            rule: String::from("single_scenario"),
            message: format!(
                "Scenario '{existing_name}' already exists; delete it before creating another"
            ),
        },
        DomainError::ShortCodeImmutable { organization_name } => ApiError::DomainRuleViolation {
            rule: String::from("short_code_immutable"),
            message: format!(
                "Short code of organization '{organization_name}' cannot change: issued button codes reference it"
            ),
        },
        DomainError::OrganizationReferenced { organization_name } => {
            ApiError::DomainRuleViolation {
                rule: String::from("organization_referenced"),
                message: format!(
                    "Organization '{organization_name}' cannot be deleted: assignments reference it"
                ),
            }
        }
    }
}

/// Translates a persistence error into an API error.
///
/// Uniqueness violations are handled by the allocation retry loops before
/// this function runs; any that still arrive here indicate a registry or
/// catalog conflict the handler should have mapped contextually, so they
/// surface as internal errors rather than leaking constraint names.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::OrganizationNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Organization"),
            message: format!("Organization {id} does not exist"),
        },
        PersistenceError::VictimProfileNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Victim profile"),
            message: format!("Victim profile {id} does not exist"),
        },
        PersistenceError::ScenarioNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Scenario"),
            message: format!("Scenario {id} does not exist"),
        },
        PersistenceError::AssignmentNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Assignment"),
            message: format!("Assignment {id} does not exist"),
        },
        PersistenceError::AssignmentAlreadyNumbered { assignment_id } => {
            ApiError::AssignmentAlreadyNumbered { assignment_id }
        }
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
