// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared test fixtures for the persistence test modules.

use drill_assign_domain::ShortCode;

use crate::Persistence;

/// Creates an in-memory store with one scenario and one organization
/// (short code `DRK`).
///
/// Returns the store plus the scenario and organization IDs.
pub fn setup_store() -> (Persistence, i64, i64) {
    let mut persistence = Persistence::new_in_memory().expect("Failed to create store");

    let scenario_id = persistence
        .create_scenario("Vollübung", None, Some("Full-scale exercise"))
        .expect("Failed to create scenario");

    let organization_id = persistence
        .create_organization("Rotes Kreuz", &ShortCode::new("DRK").expect("Valid short code"))
        .expect("Failed to create organization");

    (persistence, scenario_id, organization_id)
}

/// Creates `count` victim profiles numbered `P-1..P-count`.
pub fn seed_profiles(persistence: &mut Persistence, count: usize) -> Vec<i64> {
    (1..=count)
        .map(|n| {
            persistence
                .create_victim_profile(Some(&format!("P-{n}")), Some("rot"))
                .expect("Failed to create victim profile")
        })
        .collect()
}
