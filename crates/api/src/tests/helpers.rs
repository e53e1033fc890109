// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for the API test modules.
//!
//! Everything goes through the public handlers, so the fixtures exercise
//! the same paths the surrounding system uses.

use drill_assign_persistence::Persistence;

use crate::{
    CreateScenarioRequest, CreateVictimProfileRequest, RegisterOrganizationRequest,
    create_scenario, create_victim_profile, register_organization,
};

/// Creates a store with one scenario and the `DRK` organization.
///
/// Returns the store plus the scenario and organization IDs.
pub fn setup() -> (Persistence, i64, i64) {
    let mut persistence = Persistence::new_in_memory().expect("Failed to create store");

    let scenario = create_scenario(
        &mut persistence,
        &CreateScenarioRequest {
            name: String::from("Vollübung"),
            date: None,
            description: Some(String::from("Full-scale exercise")),
        },
    )
    .expect("Failed to create scenario");

    let organization = register_organization(
        &mut persistence,
        &RegisterOrganizationRequest {
            name: String::from("Rotes Kreuz"),
            short_code: String::from("DRK"),
        },
    )
    .expect("Failed to register organization");

    (persistence, scenario.scenario_id, organization.organization_id)
}

/// Registers another organization and returns its ID.
pub fn add_organization(persistence: &mut Persistence, name: &str, short_code: &str) -> i64 {
    register_organization(
        persistence,
        &RegisterOrganizationRequest {
            name: name.to_owned(),
            short_code: short_code.to_owned(),
        },
    )
    .expect("Failed to register organization")
    .organization_id
}

/// Adds `count` profiles numbered `P-1..P-count` and returns their IDs.
pub fn add_profiles(persistence: &mut Persistence, count: usize) -> Vec<i64> {
    (1..=count)
        .map(|n| {
            create_victim_profile(
                persistence,
                &CreateVictimProfileRequest {
                    profile_number: Some(format!("P-{n}")),
                    category: Some(String::from("rot")),
                },
            )
            .expect("Failed to create profile")
            .victim_profile_id
        })
        .collect()
}
