// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Handler functions for the API boundary.
//!
//! Each handler validates its request, enforces the domain rules that need
//! store context, performs the operation against the persistence adapter
//! and translates every failure into the typed [`ApiError`] contract.
//!
//! The three allocation handlers wrap their unit of work in a bounded retry
//! loop: a store-level uniqueness violation means a concurrent writer
//! committed the same number first, so the whole unit of work is retried up
//! to [`MAX_ALLOCATION_ATTEMPTS`] before surfacing
//! [`ApiError::AllocationContention`].

use std::collections::HashSet;

use tracing::warn;

use drill_assign::MAX_ALLOCATION_ATTEMPTS;
use drill_assign_domain::{
    AssignmentSnapshot, DomainError, Organization, ShortCode, export_sort_key,
    validate_organization_name, validate_profile_number, validate_profile_unique_in_scenario,
    validate_scenario_name, validate_short_code_unchanged, validate_single_scenario,
};
use drill_assign_persistence::{Persistence, PersistenceError};

use crate::code_policy::enforce_short_code_policy;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    AllocateBatchRequest, AllocateBatchResponse, AllocateOneRequest, AssignmentResponse,
    CategoryCount, CreateScenarioRequest, CreateVictimProfileRequest, ListAssignmentsResponse,
    OrganizationResponse, PromoteAssignmentRequest, QueueProfileRequest,
    RegisterOrganizationRequest, ScenarioResponse, ScenarioStatisticsResponse,
    UpdateOrganizationRequest, VictimProfileResponse,
};

/// Builds the response view of an organization.
fn organization_response(organization: &Organization) -> OrganizationResponse {
    OrganizationResponse {
        organization_id: organization.organization_id().unwrap_or_default(),
        name: organization.name().to_owned(),
        short_code: organization.short_code().value().to_owned(),
    }
}

/// Rejects the operation if the profile already holds an assigned
/// assignment in the scenario.
fn ensure_profile_unassigned(
    persistence: &mut Persistence,
    scenario_id: i64,
    victim_profile_id: i64,
) -> Result<(), ApiError> {
    let assigned: Vec<i64> = persistence
        .assigned_profile_ids(scenario_id)
        .map_err(translate_persistence_error)?;
    validate_profile_unique_in_scenario(scenario_id, victim_profile_id, &assigned)
        .map_err(translate_domain_error)
}

// ============================================================================
// Organization Registry
// ============================================================================

/// Registers a new organization.
///
/// The short code is checked against the boundary policy and validated by
/// the domain before anything is written; a malformed code would corrupt
/// button-code formatting for every assignment it prefixes.
///
/// # Errors
///
/// Returns an error if validation fails or the name/short code is taken.
pub fn register_organization(
    persistence: &mut Persistence,
    request: &RegisterOrganizationRequest,
) -> Result<OrganizationResponse, ApiError> {
    enforce_short_code_policy(&request.short_code)?;
    validate_organization_name(&request.name).map_err(translate_domain_error)?;
    let short_code: ShortCode =
        ShortCode::new(&request.short_code).map_err(translate_domain_error)?;

    match persistence.create_organization(&request.name, &short_code) {
        Ok(organization_id) => Ok(OrganizationResponse {
            organization_id,
            name: request.name.clone(),
            short_code: request.short_code.clone(),
        }),
        Err(PersistenceError::UniqueViolation(_)) => Err(ApiError::DomainRuleViolation {
            rule: String::from("unique_organization"),
            message: format!(
                "An organization named '{}' or using short code '{}' already exists",
                request.name, request.short_code
            ),
        }),
        Err(other) => Err(translate_persistence_error(other)),
    }
}

/// Updates an organization's name and short code.
///
/// Changing the short code is rejected outright once any assignment
/// references the organization — issued button codes are printed on
/// physical badges and would be silently invalidated.
///
/// # Errors
///
/// Returns an error if validation fails, the organization does not exist,
/// or the short code is immutable.
pub fn update_organization(
    persistence: &mut Persistence,
    request: &UpdateOrganizationRequest,
) -> Result<OrganizationResponse, ApiError> {
    enforce_short_code_policy(&request.short_code)?;
    validate_organization_name(&request.name).map_err(translate_domain_error)?;
    let short_code: ShortCode =
        ShortCode::new(&request.short_code).map_err(translate_domain_error)?;

    let current: Organization = persistence
        .get_organization(request.organization_id)
        .map_err(translate_persistence_error)?;
    let referenced: bool = persistence
        .organization_has_assignments(request.organization_id)
        .map_err(translate_persistence_error)?;
    validate_short_code_unchanged(&current, &short_code, referenced)
        .map_err(translate_domain_error)?;

    match persistence.update_organization(request.organization_id, &request.name, &short_code) {
        Ok(()) => Ok(OrganizationResponse {
            organization_id: request.organization_id,
            name: request.name.clone(),
            short_code: request.short_code.clone(),
        }),
        Err(PersistenceError::UniqueViolation(_)) => Err(ApiError::DomainRuleViolation {
            rule: String::from("unique_organization"),
            message: format!(
                "An organization named '{}' or using short code '{}' already exists",
                request.name, request.short_code
            ),
        }),
        Err(other) => Err(translate_persistence_error(other)),
    }
}

/// Deletes an organization.
///
/// Rejected while assignments reference it; deleting would orphan issued
/// button codes.
///
/// # Errors
///
/// Returns an error if the organization does not exist or is referenced.
pub fn delete_organization(
    persistence: &mut Persistence,
    organization_id: i64,
) -> Result<(), ApiError> {
    let organization: Organization = persistence
        .get_organization(organization_id)
        .map_err(translate_persistence_error)?;
    let referenced: bool = persistence
        .organization_has_assignments(organization_id)
        .map_err(translate_persistence_error)?;
    if referenced {
        return Err(translate_domain_error(DomainError::OrganizationReferenced {
            organization_name: organization.name().to_owned(),
        }));
    }

    match persistence.delete_organization(organization_id) {
        Ok(()) => Ok(()),
        // The store's RESTRICT constraint catches a reference committed
        // between the check above and the delete.
        Err(PersistenceError::ForeignKeyViolation(_)) => {
            Err(translate_domain_error(DomainError::OrganizationReferenced {
                organization_name: organization.name().to_owned(),
            }))
        }
        Err(other) => Err(translate_persistence_error(other)),
    }
}

/// Lists all organizations, ordered by name.
///
/// # Errors
///
/// Returns an error if the registry cannot be read.
pub fn list_organizations(
    persistence: &mut Persistence,
) -> Result<Vec<OrganizationResponse>, ApiError> {
    let organizations: Vec<Organization> = persistence
        .list_organizations()
        .map_err(translate_persistence_error)?;
    Ok(organizations.iter().map(organization_response).collect())
}

// ============================================================================
// Victim Profile Catalog
// ============================================================================

/// Adds a victim profile to the catalog.
///
/// # Errors
///
/// Returns an error if validation fails or the profile number is taken.
pub fn create_victim_profile(
    persistence: &mut Persistence,
    request: &CreateVictimProfileRequest,
) -> Result<VictimProfileResponse, ApiError> {
    validate_profile_number(request.profile_number.as_deref()).map_err(translate_domain_error)?;

    match persistence
        .create_victim_profile(request.profile_number.as_deref(), request.category.as_deref())
    {
        Ok(victim_profile_id) => Ok(VictimProfileResponse {
            victim_profile_id,
            profile_number: request.profile_number.clone(),
            category: request.category.clone(),
        }),
        Err(PersistenceError::UniqueViolation(_)) => Err(ApiError::DomainRuleViolation {
            rule: String::from("unique_profile_number"),
            message: format!(
                "A profile numbered '{}' already exists",
                request.profile_number.as_deref().unwrap_or_default()
            ),
        }),
        Err(other) => Err(translate_persistence_error(other)),
    }
}

/// Lists all victim profiles, ordered by profile number.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
pub fn list_victim_profiles(
    persistence: &mut Persistence,
) -> Result<Vec<VictimProfileResponse>, ApiError> {
    let profiles = persistence
        .list_victim_profiles()
        .map_err(translate_persistence_error)?;
    Ok(profiles
        .into_iter()
        .map(|profile| VictimProfileResponse {
            victim_profile_id: profile.victim_profile_id.unwrap_or_default(),
            profile_number: profile.profile_number,
            category: profile.category,
        })
        .collect())
}

// ============================================================================
// Scenario Store
// ============================================================================

/// Creates the scenario.
///
/// The system allows at most one scenario at a time; creation is rejected
/// while one exists. The guard lives here, on the creation path, instead of
/// scattered across callers.
///
/// # Errors
///
/// Returns an error if validation fails or a scenario already exists.
pub fn create_scenario(
    persistence: &mut Persistence,
    request: &CreateScenarioRequest,
) -> Result<ScenarioResponse, ApiError> {
    validate_scenario_name(&request.name).map_err(translate_domain_error)?;

    let existing = persistence
        .current_scenario()
        .map_err(translate_persistence_error)?;
    validate_single_scenario(existing.as_ref()).map_err(translate_domain_error)?;

    let scenario_id: i64 = persistence
        .create_scenario(&request.name, request.date, request.description.as_deref())
        .map_err(translate_persistence_error)?;

    Ok(ScenarioResponse {
        scenario_id,
        name: request.name.clone(),
        date: request.date,
        description: request.description.clone(),
    })
}

/// Deletes the scenario and, with it, all of its assignments.
///
/// # Errors
///
/// Returns an error if the scenario does not exist.
pub fn delete_scenario(persistence: &mut Persistence, scenario_id: i64) -> Result<(), ApiError> {
    persistence
        .delete_scenario(scenario_id)
        .map_err(translate_persistence_error)
}

/// Reports the scenario's assignment count per profile category.
///
/// # Errors
///
/// Returns an error if the scenario does not exist.
pub fn scenario_statistics(
    persistence: &mut Persistence,
    scenario_id: i64,
) -> Result<ScenarioStatisticsResponse, ApiError> {
    persistence
        .get_scenario(scenario_id)
        .map_err(translate_persistence_error)?;

    let buckets = persistence
        .scenario_statistics(scenario_id)
        .map_err(translate_persistence_error)?;

    let total: i64 = buckets.iter().map(|(_, count)| count).sum();
    Ok(ScenarioStatisticsResponse {
        scenario_id,
        total,
        categories: buckets
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect(),
    })
}

// ============================================================================
// Assignments
// ============================================================================

/// Queues a profile for the scenario without assigning an organization.
///
/// The resulting placeholder carries no number or button code; it is
/// promoted in place when the profile is assigned.
///
/// # Errors
///
/// Returns an error if the scenario or profile does not exist, or the
/// profile already appears in the scenario.
pub fn queue_profile(
    persistence: &mut Persistence,
    request: &QueueProfileRequest,
) -> Result<AssignmentResponse, ApiError> {
    persistence
        .get_scenario(request.scenario_id)
        .map_err(translate_persistence_error)?;
    persistence
        .get_victim_profile(request.victim_profile_id)
        .map_err(translate_persistence_error)?;

    match persistence.queue_profile(request.scenario_id, request.victim_profile_id) {
        Ok(assignment_id) => Ok(AssignmentResponse {
            assignment_id,
            scenario_id: request.scenario_id,
            organization_id: None,
            victim_profile_id: request.victim_profile_id,
            sequential_number: None,
            button_number: None,
        }),
        // A profile appears at most once per scenario, queued or assigned.
        Err(PersistenceError::UniqueViolation(_)) => Err(ApiError::DuplicateProfileInScenario {
            scenario_id: request.scenario_id,
            victim_profile_id: request.victim_profile_id,
        }),
        Err(other) => Err(translate_persistence_error(other)),
    }
}

/// Allocates one assignment: binds the profile to the organization and
/// issues the next sequence number and button code for the pair.
///
/// An existing unassigned placeholder for the profile is promoted in place
/// instead of duplicated.
///
/// # Errors
///
/// Returns an error if a referenced entity does not exist, the profile is
/// already assigned in the scenario, or retries are exhausted
/// (`ApiError::AllocationContention`).
pub fn allocate_one(
    persistence: &mut Persistence,
    request: &AllocateOneRequest,
) -> Result<AssignmentResponse, ApiError> {
    persistence
        .get_scenario(request.scenario_id)
        .map_err(translate_persistence_error)?;
    persistence
        .get_organization(request.organization_id)
        .map_err(translate_persistence_error)?;
    persistence
        .get_victim_profile(request.victim_profile_id)
        .map_err(translate_persistence_error)?;
    ensure_profile_unassigned(persistence, request.scenario_id, request.victim_profile_id)?;

    for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
        match persistence.allocate_one(
            request.scenario_id,
            request.organization_id,
            request.victim_profile_id,
        ) {
            Ok(assignment) => return Ok(AssignmentResponse::from_assignment(&assignment)),
            Err(PersistenceError::UniqueViolation(message)) => {
                warn!(attempt, %message, "Allocation collided with a concurrent writer; retrying");
                // A lost race for the same profile is a duplicate, not contention.
                ensure_profile_unassigned(
                    persistence,
                    request.scenario_id,
                    request.victim_profile_id,
                )?;
            }
            Err(other) => return Err(translate_persistence_error(other)),
        }
    }

    Err(ApiError::AllocationContention {
        attempts: MAX_ALLOCATION_ATTEMPTS,
    })
}

/// Allocates a contiguous, gap-free run of assignments for one organization.
///
/// The whole batch is validated up front and committed atomically; on any
/// failure nothing is committed and the offending profile ids are reported.
///
/// # Errors
///
/// Returns `ApiError::BatchAllocationFailed` listing invalid ids,
/// `ApiError::AllocationContention` after exhausted retries, or the usual
/// not-found errors for the scenario and organization.
pub fn allocate_batch(
    persistence: &mut Persistence,
    request: &AllocateBatchRequest,
) -> Result<AllocateBatchResponse, ApiError> {
    if request.victim_profile_ids.is_empty() {
        return Err(translate_domain_error(DomainError::EmptyBatch));
    }

    persistence
        .get_scenario(request.scenario_id)
        .map_err(translate_persistence_error)?;
    persistence
        .get_organization(request.organization_id)
        .map_err(translate_persistence_error)?;

    let invalid: Vec<i64> = invalid_batch_profiles(persistence, request)?;
    if !invalid.is_empty() {
        return Err(ApiError::BatchAllocationFailed {
            invalid_profile_ids: invalid,
        });
    }

    for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
        match persistence.allocate_batch(
            request.scenario_id,
            request.organization_id,
            &request.victim_profile_ids,
        ) {
            Ok(assignments) => {
                return Ok(AllocateBatchResponse {
                    assignments: assignments
                        .iter()
                        .map(AssignmentResponse::from_assignment)
                        .collect(),
                });
            }
            Err(PersistenceError::UniqueViolation(message)) => {
                warn!(attempt, %message, "Batch collided with a concurrent writer; retrying");
                let invalid: Vec<i64> = invalid_batch_profiles(persistence, request)?;
                if !invalid.is_empty() {
                    return Err(ApiError::BatchAllocationFailed {
                        invalid_profile_ids: invalid,
                    });
                }
            }
            // A profile removed between validation and commit trips the
            // foreign key; report it like any other invalid id.
            Err(PersistenceError::ForeignKeyViolation(_)) => {
                return Err(ApiError::BatchAllocationFailed {
                    invalid_profile_ids: invalid_batch_profiles(persistence, request)?,
                });
            }
            Err(other) => return Err(translate_persistence_error(other)),
        }
    }

    Err(ApiError::AllocationContention {
        attempts: MAX_ALLOCATION_ATTEMPTS,
    })
}

/// Computes the ids that disqualify a batch: unknown profiles, profiles
/// already assigned in the scenario, and ids repeated within the batch.
fn invalid_batch_profiles(
    persistence: &mut Persistence,
    request: &AllocateBatchRequest,
) -> Result<Vec<i64>, ApiError> {
    let existing: HashSet<i64> = persistence
        .existing_profile_ids(&request.victim_profile_ids)
        .map_err(translate_persistence_error)?
        .into_iter()
        .collect();
    let assigned: HashSet<i64> = persistence
        .assigned_profile_ids(request.scenario_id)
        .map_err(translate_persistence_error)?
        .into_iter()
        .collect();

    let mut seen: HashSet<i64> = HashSet::new();
    let mut invalid: Vec<i64> = Vec::new();
    for &victim_profile_id in &request.victim_profile_ids {
        let unknown: bool = !existing.contains(&victim_profile_id);
        let duplicate: bool = !seen.insert(victim_profile_id);
        if (unknown || duplicate || assigned.contains(&victim_profile_id))
            && !invalid.contains(&victim_profile_id)
        {
            invalid.push(victim_profile_id);
        }
    }
    Ok(invalid)
}

/// Promotes a queued placeholder to an organization, issuing its number and
/// button code with the same algorithm as `allocate_one`.
///
/// Assignment is one-way: promoting an assignment that already carries a
/// number fails instead of silently reassigning a new one.
///
/// # Errors
///
/// Returns an error if the assignment or organization does not exist, the
/// assignment is already numbered, or retries are exhausted.
pub fn promote_to_organization(
    persistence: &mut Persistence,
    request: &PromoteAssignmentRequest,
) -> Result<AssignmentResponse, ApiError> {
    let assignment = persistence
        .get_assignment(request.assignment_id)
        .map_err(translate_persistence_error)?;
    if assignment.is_assigned() {
        return Err(ApiError::AssignmentAlreadyNumbered {
            assignment_id: request.assignment_id,
        });
    }
    persistence
        .get_organization(request.organization_id)
        .map_err(translate_persistence_error)?;

    for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
        match persistence.promote_assignment(request.assignment_id, request.organization_id) {
            Ok(promoted) => return Ok(AssignmentResponse::from_assignment(&promoted)),
            Err(PersistenceError::UniqueViolation(message)) => {
                warn!(attempt, %message, "Promotion collided with a concurrent writer; retrying");
            }
            Err(other) => return Err(translate_persistence_error(other)),
        }
    }

    Err(ApiError::AllocationContention {
        attempts: MAX_ALLOCATION_ATTEMPTS,
    })
}

/// Removes a single assignment.
///
/// Its number and button code are never reissued; the pair's watermark is
/// untouched.
///
/// # Errors
///
/// Returns an error if the assignment does not exist.
pub fn remove_assignment(
    persistence: &mut Persistence,
    assignment_id: i64,
) -> Result<(), ApiError> {
    persistence
        .delete_assignment(assignment_id)
        .map_err(translate_persistence_error)
}

/// Enumerates the scenario's assignments as immutable export snapshots.
///
/// Ordered by organization, then sequence number; unassigned placeholders
/// come last.
///
/// # Errors
///
/// Returns an error if the scenario does not exist.
pub fn list_assignments(
    persistence: &mut Persistence,
    scenario_id: i64,
) -> Result<ListAssignmentsResponse, ApiError> {
    persistence
        .get_scenario(scenario_id)
        .map_err(translate_persistence_error)?;

    let mut snapshots: Vec<AssignmentSnapshot> = persistence
        .list_assignment_snapshots(scenario_id)
        .map_err(translate_persistence_error)?;
    snapshots.sort_by_key(export_sort_key);

    Ok(ListAssignmentsResponse {
        assignments: snapshots,
    })
}
