// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{Assignment, Organization, VictimProfile};
use serde::{Deserialize, Serialize};

/// An immutable, export-facing view of one assignment.
///
/// Report and email collaborators receive copies of this value object
/// instead of aliasing live entities; nothing they do can mutate an issued
/// number or button code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSnapshot {
    /// The assignment identifier.
    pub assignment_id: i64,
    /// The scenario identifier.
    pub scenario_id: i64,
    /// The organization identifier, if assigned.
    pub organization_id: Option<i64>,
    /// The organization name, if assigned.
    pub organization_name: Option<String>,
    /// The organization short code, if assigned.
    pub short_code: Option<String>,
    /// The victim profile identifier.
    pub victim_profile_id: i64,
    /// The human-facing profile number, if the profile carries one.
    pub profile_number: Option<String>,
    /// The profile's sighting/triage category, if recorded.
    pub category: Option<String>,
    /// The issued sequence number, if assigned.
    pub sequential_number: Option<u32>,
    /// The issued button code, if assigned.
    pub button_number: Option<String>,
}

impl AssignmentSnapshot {
    /// Builds a snapshot from an assignment and its referenced entities.
    ///
    /// The organization is `None` for unassigned placeholders.
    #[must_use]
    pub fn from_parts(
        assignment_id: i64,
        assignment: &Assignment,
        organization: Option<&Organization>,
        profile: &VictimProfile,
    ) -> Self {
        Self {
            assignment_id,
            scenario_id: assignment.scenario_id,
            organization_id: assignment.organization_id,
            organization_name: organization.map(|o| o.name().to_owned()),
            short_code: organization.map(|o| o.short_code().value().to_owned()),
            victim_profile_id: assignment.victim_profile_id,
            profile_number: profile.profile_number.clone(),
            category: profile.category.clone(),
            sequential_number: assignment.sequential_number.map(|n| n.value()),
            button_number: assignment
                .button_number
                .as_ref()
                .map(|code| code.value().to_owned()),
        }
    }
}

/// Sort key for the export ordering: assigned rows grouped by organization
/// and ordered by sequence number, placeholders last.
#[must_use]
pub fn export_sort_key(snapshot: &AssignmentSnapshot) -> (bool, i64, u32) {
    (
        snapshot.organization_id.is_none(),
        snapshot.organization_id.unwrap_or(i64::MAX),
        snapshot.sequential_number.unwrap_or(u32::MAX),
    )
}
