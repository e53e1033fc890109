// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::short_code::ShortCode;
use crate::types::{Organization, Scenario};

/// Validates an organization name.
///
/// # Arguments
///
/// * `name` - The name to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidOrganizationName` if the name is empty or
/// whitespace-only.
pub fn validate_organization_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidOrganizationName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a scenario name.
///
/// # Arguments
///
/// * `name` - The name to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidScenarioName` if the name is empty or
/// whitespace-only.
pub fn validate_scenario_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidScenarioName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates an optional victim profile number.
///
/// The profile number is optional, but when present it must not be blank —
/// a blank value would defeat the uniqueness constraint on the catalog.
///
/// # Arguments
///
/// * `profile_number` - The profile number to validate, if any
///
/// # Errors
///
/// Returns `DomainError::InvalidProfileNumber` if a present value is empty
/// or whitespace-only.
pub fn validate_profile_number(profile_number: Option<&str>) -> Result<(), DomainError> {
    if let Some(number) = profile_number
        && number.trim().is_empty()
    {
        return Err(DomainError::InvalidProfileNumber(String::from(
            "Profile number cannot be blank when present",
        )));
    }
    Ok(())
}

/// Validates that a victim profile is not already assigned in a scenario.
///
/// A profile may appear at most once per scenario. This function is pure;
/// the caller supplies the profile ids already *assigned* (placeholders do
/// not count — they may be promoted instead of duplicated).
///
/// # Arguments
///
/// * `scenario_id` - The scenario being allocated against
/// * `victim_profile_id` - The profile to validate
/// * `assigned_profile_ids` - Profile ids with assigned assignments in the scenario
///
/// # Errors
///
/// Returns `DomainError::DuplicateProfileInScenario` if the profile already
/// has an assigned assignment.
pub fn validate_profile_unique_in_scenario(
    scenario_id: i64,
    victim_profile_id: i64,
    assigned_profile_ids: &[i64],
) -> Result<(), DomainError> {
    if assigned_profile_ids.contains(&victim_profile_id) {
        return Err(DomainError::DuplicateProfileInScenario {
            scenario_id,
            victim_profile_id,
        });
    }
    Ok(())
}

/// Validates the system-wide singleton scenario invariant.
///
/// At most one scenario exists at any time. The guard lives here, at the
/// creation path, rather than scattered across callers.
///
/// # Arguments
///
/// * `existing` - The scenario currently in the store, if any
///
/// # Errors
///
/// Returns `DomainError::ScenarioAlreadyExists` if a scenario already exists.
pub fn validate_single_scenario(existing: Option<&Scenario>) -> Result<(), DomainError> {
    if let Some(scenario) = existing {
        return Err(DomainError::ScenarioAlreadyExists {
            existing_name: scenario.name.clone(),
        });
    }
    Ok(())
}

/// Validates that an organization's short code is not being changed while
/// assignments reference the organization.
///
/// Issued button codes embed the short code and are printed on physical
/// badges; renaming would silently invalidate them. This is a blocking
/// validation, not a warning.
///
/// # Arguments
///
/// * `current` - The organization as persisted
/// * `new_short_code` - The short code from the update request
/// * `referenced` - Whether any assignment references the organization
///
/// # Errors
///
/// Returns `DomainError::ShortCodeImmutable` if the code differs and the
/// organization is referenced.
pub fn validate_short_code_unchanged(
    current: &Organization,
    new_short_code: &ShortCode,
    referenced: bool,
) -> Result<(), DomainError> {
    if referenced && current.short_code() != new_short_code {
        return Err(DomainError::ShortCodeImmutable {
            organization_name: current.name().to_owned(),
        });
    }
    Ok(())
}
