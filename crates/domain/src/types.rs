// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::button_code::{ButtonCode, SequentialNumber};
use crate::error::DomainError;
use crate::short_code::ShortCode;
use serde::{Deserialize, Serialize};
use time::Date;

/// A participating organization (e.g., a hospital).
///
/// Organizations are identified by a unique name and a unique short code.
/// Both become immutable once any assignment references the organization,
/// because issued button codes embed the short code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the organization has not been persisted yet.
    organization_id: Option<i64>,
    /// The organization name (unique, non-empty).
    name: String,
    /// The short code used as the button-code prefix.
    short_code: ShortCode,
}

// Two Organizations are equal if they have the same name, regardless of IDs.
impl PartialEq for Organization {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Organization {}

impl std::hash::Hash for Organization {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Organization {
    /// Creates a new `Organization` without a persisted ID.
    ///
    /// # Arguments
    ///
    /// * `name` - The organization name
    /// * `short_code` - The validated short code
    #[must_use]
    pub const fn new(name: String, short_code: ShortCode) -> Self {
        Self {
            organization_id: None,
            name,
            short_code,
        }
    }

    /// Creates an `Organization` with an existing persisted ID.
    ///
    /// # Arguments
    ///
    /// * `organization_id` - The canonical numeric identifier
    /// * `name` - The organization name
    /// * `short_code` - The validated short code
    #[must_use]
    pub const fn with_id(organization_id: i64, name: String, short_code: ShortCode) -> Self {
        Self {
            organization_id: Some(organization_id),
            name,
            short_code,
        }
    }

    /// Returns the canonical numeric identifier if persisted.
    #[must_use]
    pub const fn organization_id(&self) -> Option<i64> {
        self.organization_id
    }

    /// Returns the organization name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the short code.
    #[must_use]
    pub const fn short_code(&self) -> &ShortCode {
        &self.short_code
    }
}

/// A simulated-patient record assignable to exactly one organization within
/// a scenario.
///
/// The full medical profile (vitals, diagnosis, treatment requirements)
/// belongs to the excluded surrounding system; the allocator only needs an
/// id-addressable row plus the optional human-facing profile number and
/// sighting category used in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictimProfile {
    /// Canonical internal identifier (opaque, stable, immutable).
    /// Optional to support creation before persistence.
    pub victim_profile_id: Option<i64>,
    /// Optional human-facing profile number (unique when present).
    pub profile_number: Option<String>,
    /// Sighting/triage category, free text.
    pub category: Option<String>,
}

impl VictimProfile {
    /// Creates a new `VictimProfile` without a persisted ID.
    #[must_use]
    pub const fn new(profile_number: Option<String>, category: Option<String>) -> Self {
        Self {
            victim_profile_id: None,
            profile_number,
            category,
        }
    }

    /// Creates a `VictimProfile` with an existing persisted ID.
    #[must_use]
    pub const fn with_id(
        victim_profile_id: i64,
        profile_number: Option<String>,
        category: Option<String>,
    ) -> Self {
        Self {
            victim_profile_id: Some(victim_profile_id),
            profile_number,
            category,
        }
    }
}

/// One drill/exercise instance; scopes all assignments.
///
/// At most one scenario exists system-wide at any time. The guard lives at
/// the scenario creation path, not in the allocator, but it bounds the
/// allocator's blast radius: every sequence number is scoped to "the"
/// scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Canonical internal identifier (opaque, stable, immutable).
    /// Optional to support creation before persistence.
    pub scenario_id: Option<i64>,
    /// The scenario name.
    pub name: String,
    /// The exercise date (optional).
    pub date: Option<Date>,
    /// Free-text description (optional).
    pub description: Option<String>,
}

impl Scenario {
    /// Creates a new `Scenario` without a persisted ID.
    #[must_use]
    pub const fn new(name: String, date: Option<Date>, description: Option<String>) -> Self {
        Self {
            scenario_id: None,
            name,
            date,
            description,
        }
    }

    /// Creates a `Scenario` with an existing persisted ID.
    #[must_use]
    pub const fn with_id(
        scenario_id: i64,
        name: String,
        date: Option<Date>,
        description: Option<String>,
    ) -> Self {
        Self {
            scenario_id: Some(scenario_id),
            name,
            date,
            description,
        }
    }
}

/// The binding of a victim profile to an organization within a scenario.
///
/// An assignment starts as an unassigned placeholder (profile queued for the
/// scenario, no organization) and transitions exactly once to the assigned
/// state, at which point the allocator issues its sequence number and button
/// code. Once issued, the number and code are never mutated; deleting the
/// assignment does not free them for reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Canonical internal identifier (opaque, stable, immutable).
    /// Optional to support creation before persistence.
    pub assignment_id: Option<i64>,
    /// The scenario this assignment belongs to.
    pub scenario_id: i64,
    /// The organization, once assigned. `None` for placeholders.
    pub organization_id: Option<i64>,
    /// The victim profile bound by this assignment.
    pub victim_profile_id: i64,
    /// The issued sequence number. `None` for placeholders.
    pub sequential_number: Option<SequentialNumber>,
    /// The issued button code. `None` for placeholders.
    pub button_number: Option<ButtonCode>,
}

impl Assignment {
    /// Creates an unassigned placeholder for a queued profile.
    #[must_use]
    pub const fn placeholder(scenario_id: i64, victim_profile_id: i64) -> Self {
        Self {
            assignment_id: None,
            scenario_id,
            organization_id: None,
            victim_profile_id,
            sequential_number: None,
            button_number: None,
        }
    }

    /// Creates an `Assignment` with an existing persisted ID.
    #[must_use]
    pub const fn with_id(
        assignment_id: i64,
        scenario_id: i64,
        organization_id: Option<i64>,
        victim_profile_id: i64,
        sequential_number: Option<SequentialNumber>,
        button_number: Option<ButtonCode>,
    ) -> Self {
        Self {
            assignment_id: Some(assignment_id),
            scenario_id,
            organization_id,
            victim_profile_id,
            sequential_number,
            button_number,
        }
    }

    /// Returns whether this assignment has been assigned to an organization.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.organization_id.is_some()
    }

    /// Validates the placeholder/assigned state invariant.
    ///
    /// # Invariant
    ///
    /// `organization_id`, `sequential_number` and `button_number` are either
    /// all present (assigned) or all absent (placeholder). A row with only
    /// some of the three set is corrupt.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InconsistentAssignment` if the invariant does
    /// not hold.
    pub fn validate_state(&self) -> Result<(), DomainError> {
        let populated = [
            self.organization_id.is_some(),
            self.sequential_number.is_some(),
            self.button_number.is_some(),
        ];
        if populated.iter().all(|p| *p) || populated.iter().all(|p| !*p) {
            Ok(())
        } else {
            Err(DomainError::InconsistentAssignment {
                reason: format!(
                    "organization set: {}, number set: {}, button code set: {}",
                    populated[0], populated[1], populated[2]
                ),
            })
        }
    }
}
