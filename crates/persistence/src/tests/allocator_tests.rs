// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Allocation unit-of-work tests: numbering invariants, watermark behavior,
//! batch contiguity, and placeholder promotion.

use drill_assign_domain::ShortCode;

use super::helpers::{seed_profiles, setup_store};
use crate::PersistenceError;

#[test]
fn test_sequential_allocations_are_gap_free() {
    let (mut persistence, scenario_id, organization_id) = setup_store();
    let profiles = seed_profiles(&mut persistence, 8);

    let mut numbers: Vec<u32> = Vec::new();
    for profile_id in profiles {
        let assignment = persistence
            .allocate_one(scenario_id, organization_id, profile_id)
            .expect("Allocation failed");
        numbers.push(assignment.sequential_number.expect("Number issued").value());
    }

    assert_eq!(numbers, (1..=8).collect::<Vec<u32>>());
}

#[test]
fn test_first_allocation_gets_number_one_and_padded_code() {
    let (mut persistence, scenario_id, organization_id) = setup_store();
    let profiles = seed_profiles(&mut persistence, 1);

    let assignment = persistence
        .allocate_one(scenario_id, organization_id, profiles[0])
        .expect("Allocation failed");

    assert_eq!(assignment.sequential_number.expect("Number issued").value(), 1);
    assert_eq!(
        assignment.button_number.expect("Code issued").value(),
        "DRK01"
    );
}

#[test]
fn test_deleting_middle_assignment_does_not_reuse_its_number() {
    let (mut persistence, scenario_id, organization_id) = setup_store();
    let profiles = seed_profiles(&mut persistence, 4);

    let mut assignments = Vec::new();
    for profile_id in &profiles[..3] {
        assignments.push(
            persistence
                .allocate_one(scenario_id, organization_id, *profile_id)
                .expect("Allocation failed"),
        );
    }

    // Delete the assignment numbered 2.
    let second_id = assignments[1].assignment_id.expect("Persisted");
    persistence
        .delete_assignment(second_id)
        .expect("Delete failed");

    let fourth = persistence
        .allocate_one(scenario_id, organization_id, profiles[3])
        .expect("Allocation failed");

    assert_eq!(fourth.sequential_number.expect("Number issued").value(), 4);
}

#[test]
fn test_deleting_highest_assignment_does_not_reuse_its_number() {
    // This is the case a derived live maximum alone gets wrong: after
    // deleting the highest-numbered row the live max drops back, but the
    // watermark remembers what was issued.
    let (mut persistence, scenario_id, organization_id) = setup_store();
    let profiles = seed_profiles(&mut persistence, 4);

    let mut assignments = Vec::new();
    for profile_id in &profiles[..3] {
        assignments.push(
            persistence
                .allocate_one(scenario_id, organization_id, *profile_id)
                .expect("Allocation failed"),
        );
    }

    let third_id = assignments[2].assignment_id.expect("Persisted");
    persistence
        .delete_assignment(third_id)
        .expect("Delete failed");

    let fourth = persistence
        .allocate_one(scenario_id, organization_id, profiles[3])
        .expect("Allocation failed");

    assert_eq!(fourth.sequential_number.expect("Number issued").value(), 4);
    assert_eq!(
        fourth.button_number.expect("Code issued").value(),
        "DRK04"
    );
}

#[test]
fn test_watermark_tracks_highest_issued_number() {
    let (mut persistence, scenario_id, organization_id) = setup_store();
    let profiles = seed_profiles(&mut persistence, 3);

    for profile_id in profiles {
        persistence
            .allocate_one(scenario_id, organization_id, profile_id)
            .expect("Allocation failed");
    }

    let watermark = persistence
        .pair_watermark(scenario_id, organization_id)
        .expect("Watermark read failed");
    assert_eq!(watermark, 3);
}

#[test]
fn test_organizations_number_independently() {
    let (mut persistence, scenario_id, drk_id) = setup_store();
    let ukf_id = persistence
        .create_organization(
            "Uniklinik Frankfurt",
            &ShortCode::new("UKF").expect("Valid short code"),
        )
        .expect("Failed to create organization");
    let profiles = seed_profiles(&mut persistence, 4);

    let a1 = persistence
        .allocate_one(scenario_id, drk_id, profiles[0])
        .expect("Allocation failed");
    let b1 = persistence
        .allocate_one(scenario_id, ukf_id, profiles[1])
        .expect("Allocation failed");
    let a2 = persistence
        .allocate_one(scenario_id, drk_id, profiles[2])
        .expect("Allocation failed");
    let b2 = persistence
        .allocate_one(scenario_id, ukf_id, profiles[3])
        .expect("Allocation failed");

    assert_eq!(a1.button_number.expect("Code issued").value(), "DRK01");
    assert_eq!(b1.button_number.expect("Code issued").value(), "UKF01");
    assert_eq!(a2.button_number.expect("Code issued").value(), "DRK02");
    assert_eq!(b2.button_number.expect("Code issued").value(), "UKF02");
}

#[test]
fn test_batch_allocation_is_contiguous_in_input_order() {
    let (mut persistence, scenario_id, organization_id) = setup_store();
    let profiles = seed_profiles(&mut persistence, 5);

    let allocated = persistence
        .allocate_batch(scenario_id, organization_id, &profiles)
        .expect("Batch allocation failed");

    let codes: Vec<String> = allocated
        .iter()
        .map(|a| a.button_number.as_ref().expect("Code issued").value().to_owned())
        .collect();
    assert_eq!(codes, vec!["DRK01", "DRK02", "DRK03", "DRK04", "DRK05"]);

    let profile_order: Vec<i64> = allocated.iter().map(|a| a.victim_profile_id).collect();
    assert_eq!(profile_order, profiles);
}

#[test]
fn test_single_allocation_after_batch_continues_the_run() {
    let (mut persistence, scenario_id, organization_id) = setup_store();
    let profiles = seed_profiles(&mut persistence, 6);

    persistence
        .allocate_batch(scenario_id, organization_id, &profiles[..5])
        .expect("Batch allocation failed");

    let sixth = persistence
        .allocate_one(scenario_id, organization_id, profiles[5])
        .expect("Allocation failed");

    assert_eq!(sixth.button_number.expect("Code issued").value(), "DRK06");
}

#[test]
fn test_batch_with_invalid_profile_commits_nothing() {
    let (mut persistence, scenario_id, organization_id) = setup_store();
    let mut profiles = seed_profiles(&mut persistence, 2);
    profiles.push(99_999); // does not exist

    let result = persistence.allocate_batch(scenario_id, organization_id, &profiles);
    assert!(matches!(
        result,
        Err(PersistenceError::ForeignKeyViolation(_))
    ));

    // Nothing was committed, and the watermark never advanced.
    let assignments = persistence
        .list_assignments(scenario_id)
        .expect("List failed");
    assert!(assignments.is_empty());
    let watermark = persistence
        .pair_watermark(scenario_id, organization_id)
        .expect("Watermark read failed");
    assert_eq!(watermark, 0);
}

#[test]
fn test_allocate_one_promotes_existing_placeholder() {
    let (mut persistence, scenario_id, organization_id) = setup_store();
    let profiles = seed_profiles(&mut persistence, 1);

    let placeholder_id = persistence
        .queue_profile(scenario_id, profiles[0])
        .expect("Queue failed");

    let assignment = persistence
        .allocate_one(scenario_id, organization_id, profiles[0])
        .expect("Allocation failed");

    // The placeholder row was promoted in place, not duplicated.
    assert_eq!(assignment.assignment_id, Some(placeholder_id));
    let all = persistence
        .list_assignments(scenario_id)
        .expect("List failed");
    assert_eq!(all.len(), 1);
}

#[test]
fn test_promote_assignment_issues_next_number() {
    let (mut persistence, scenario_id, organization_id) = setup_store();
    let profiles = seed_profiles(&mut persistence, 2);

    persistence
        .allocate_one(scenario_id, organization_id, profiles[0])
        .expect("Allocation failed");

    let placeholder_id = persistence
        .queue_profile(scenario_id, profiles[1])
        .expect("Queue failed");

    let promoted = persistence
        .promote_assignment(placeholder_id, organization_id)
        .expect("Promotion failed");

    assert_eq!(promoted.sequential_number.expect("Number issued").value(), 2);
    assert_eq!(
        promoted.button_number.expect("Code issued").value(),
        "DRK02"
    );
}

#[test]
fn test_promotion_is_one_way() {
    let (mut persistence, scenario_id, organization_id) = setup_store();
    let profiles = seed_profiles(&mut persistence, 1);

    let placeholder_id = persistence
        .queue_profile(scenario_id, profiles[0])
        .expect("Queue failed");
    persistence
        .promote_assignment(placeholder_id, organization_id)
        .expect("Promotion failed");

    let second = persistence.promote_assignment(placeholder_id, organization_id);
    assert!(matches!(
        second,
        Err(PersistenceError::AssignmentAlreadyNumbered { .. })
    ));
}

#[test]
fn test_three_digit_numbers_are_not_truncated() {
    let (mut persistence, scenario_id, organization_id) = setup_store();
    let profiles = seed_profiles(&mut persistence, 100);

    // Drive the watermark to 99 by allocating, then check the next code.
    for profile_id in &profiles[..99] {
        persistence
            .allocate_one(scenario_id, organization_id, *profile_id)
            .expect("Allocation failed");
    }
    let hundredth = persistence
        .allocate_one(scenario_id, organization_id, profiles[99])
        .expect("Allocation failed");
    assert_eq!(
        hundredth.button_number.expect("Code issued").value(),
        "DRK100"
    );
}

#[test]
fn test_snapshots_carry_registry_and_catalog_fields() {
    let (mut persistence, scenario_id, organization_id) = setup_store();
    let profiles = seed_profiles(&mut persistence, 2);

    persistence
        .allocate_one(scenario_id, organization_id, profiles[0])
        .expect("Allocation failed");
    persistence
        .queue_profile(scenario_id, profiles[1])
        .expect("Queue failed");

    let snapshots = persistence
        .list_assignment_snapshots(scenario_id)
        .expect("Snapshot listing failed");
    assert_eq!(snapshots.len(), 2);

    let assigned = snapshots
        .iter()
        .find(|s| s.button_number.is_some())
        .expect("Assigned snapshot present");
    assert_eq!(assigned.organization_name.as_deref(), Some("Rotes Kreuz"));
    assert_eq!(assigned.short_code.as_deref(), Some("DRK"));
    assert_eq!(assigned.profile_number.as_deref(), Some("P-1"));
    assert_eq!(assigned.button_number.as_deref(), Some("DRK01"));

    let placeholder = snapshots
        .iter()
        .find(|s| s.button_number.is_none())
        .expect("Placeholder snapshot present");
    assert!(placeholder.organization_name.is_none());
}

#[test]
fn test_scenario_statistics_group_by_category() {
    let (mut persistence, scenario_id, organization_id) = setup_store();

    let red = persistence
        .create_victim_profile(Some("P-R1"), Some("rot"))
        .expect("Profile creation failed");
    let yellow_one = persistence
        .create_victim_profile(Some("P-Y1"), Some("gelb"))
        .expect("Profile creation failed");
    let yellow_two = persistence
        .create_victim_profile(Some("P-Y2"), Some("gelb"))
        .expect("Profile creation failed");

    for profile_id in [red, yellow_one, yellow_two] {
        persistence
            .allocate_one(scenario_id, organization_id, profile_id)
            .expect("Allocation failed");
    }

    let stats = persistence
        .scenario_statistics(scenario_id)
        .expect("Statistics failed");
    assert_eq!(
        stats,
        vec![
            (Some(String::from("gelb")), 2),
            (Some(String::from("rot")), 1),
        ]
    );
}
