// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response DTOs for the API boundary.
//!
//! These types are deliberately distinct from the domain types: they are
//! the contract with the excluded surrounding system and carry plain
//! serializable fields, never live entities.

use drill_assign_domain::{Assignment, AssignmentSnapshot};
use serde::{Deserialize, Serialize};
use time::Date;

/// Request to register a new organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterOrganizationRequest {
    /// The organization name (unique, non-empty).
    pub name: String,
    /// The short code used as the button-code prefix.
    pub short_code: String,
}

/// Response describing an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationResponse {
    /// The canonical organization identifier.
    pub organization_id: i64,
    /// The organization name.
    pub name: String,
    /// The short code.
    pub short_code: String,
}

/// Request to update an organization.
///
/// Short codes are immutable once any assignment references the
/// organization; such updates are rejected outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrganizationRequest {
    /// The organization to update.
    pub organization_id: i64,
    /// The new name.
    pub name: String,
    /// The new short code.
    pub short_code: String,
}

/// Request to add a victim profile to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVictimProfileRequest {
    /// Optional human-facing profile number (unique when present).
    pub profile_number: Option<String>,
    /// Optional sighting/triage category.
    pub category: Option<String>,
}

/// Response describing a victim profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictimProfileResponse {
    /// The canonical profile identifier.
    pub victim_profile_id: i64,
    /// The profile number, if any.
    pub profile_number: Option<String>,
    /// The category, if any.
    pub category: Option<String>,
}

/// Request to create the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateScenarioRequest {
    /// The scenario name.
    pub name: String,
    /// The exercise date, if known.
    pub date: Option<Date>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Response describing the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResponse {
    /// The canonical scenario identifier.
    pub scenario_id: i64,
    /// The scenario name.
    pub name: String,
    /// The exercise date, if known.
    pub date: Option<Date>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Request to queue a profile for the scenario without an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueProfileRequest {
    /// The scenario.
    pub scenario_id: i64,
    /// The profile to queue.
    pub victim_profile_id: i64,
}

/// Request to allocate one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocateOneRequest {
    /// The scenario.
    pub scenario_id: i64,
    /// The organization receiving the profile.
    pub organization_id: i64,
    /// The profile to assign.
    pub victim_profile_id: i64,
}

/// Request to allocate a contiguous batch for one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocateBatchRequest {
    /// The scenario.
    pub scenario_id: i64,
    /// The organization receiving the profiles.
    pub organization_id: i64,
    /// The profiles to assign, in numbering order.
    pub victim_profile_ids: Vec<i64>,
}

/// Request to promote a queued placeholder to an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoteAssignmentRequest {
    /// The placeholder assignment.
    pub assignment_id: i64,
    /// The organization to assign.
    pub organization_id: i64,
}

/// Response describing one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResponse {
    /// The canonical assignment identifier.
    pub assignment_id: i64,
    /// The scenario.
    pub scenario_id: i64,
    /// The organization, if assigned.
    pub organization_id: Option<i64>,
    /// The bound profile.
    pub victim_profile_id: i64,
    /// The issued sequence number, if assigned.
    pub sequential_number: Option<u32>,
    /// The issued button code, if assigned.
    pub button_number: Option<String>,
}

impl AssignmentResponse {
    /// Builds a response from a persisted assignment.
    #[must_use]
    pub fn from_assignment(assignment: &Assignment) -> Self {
        Self {
            assignment_id: assignment.assignment_id.unwrap_or_default(),
            scenario_id: assignment.scenario_id,
            organization_id: assignment.organization_id,
            victim_profile_id: assignment.victim_profile_id,
            sequential_number: assignment.sequential_number.map(|n| n.value()),
            button_number: assignment
                .button_number
                .as_ref()
                .map(|code| code.value().to_owned()),
        }
    }
}

/// Response for a batch allocation: the allocated assignments in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocateBatchResponse {
    /// The allocated assignments.
    pub assignments: Vec<AssignmentResponse>,
}

/// Response enumerating a scenario's assignments for export.
///
/// Ordered by organization, then sequence number; unassigned placeholders
/// come last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAssignmentsResponse {
    /// Immutable snapshots for the report collaborators.
    pub assignments: Vec<AssignmentSnapshot>,
}

/// One category bucket in the scenario statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The profile category; `None` for profiles without one.
    pub category: Option<String>,
    /// How many of the scenario's assignments carry it.
    pub count: i64,
}

/// Response with the scenario's category distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioStatisticsResponse {
    /// The scenario.
    pub scenario_id: i64,
    /// Total assignments in the scenario.
    pub total: i64,
    /// Per-category counts, ordered by category.
    pub categories: Vec<CategoryCount>,
}
