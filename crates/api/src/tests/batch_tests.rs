// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Batch allocation handler tests: contiguity, all-or-nothing semantics,
//! and interleaving with single allocations.

use super::helpers::{add_organization, add_profiles, setup};
use crate::{
    AllocateBatchRequest, AllocateOneRequest, ApiError, QueueProfileRequest, allocate_batch,
    allocate_one, list_assignments, queue_profile,
};

#[test]
fn test_batch_yields_contiguous_codes_in_input_order() {
    let (mut persistence, scenario_id, organization_id) = setup();
    let profiles = add_profiles(&mut persistence, 5);

    let response = allocate_batch(
        &mut persistence,
        &AllocateBatchRequest {
            scenario_id,
            organization_id,
            victim_profile_ids: profiles.clone(),
        },
    )
    .expect("Batch failed");

    let codes: Vec<Option<&str>> = response
        .assignments
        .iter()
        .map(|a| a.button_number.as_deref())
        .collect();
    assert_eq!(
        codes,
        vec![
            Some("DRK01"),
            Some("DRK02"),
            Some("DRK03"),
            Some("DRK04"),
            Some("DRK05")
        ]
    );

    let order: Vec<i64> = response
        .assignments
        .iter()
        .map(|a| a.victim_profile_id)
        .collect();
    assert_eq!(order, profiles);
}

#[test]
fn test_single_allocation_after_batch_continues_the_run() {
    let (mut persistence, scenario_id, organization_id) = setup();
    let profiles = add_profiles(&mut persistence, 6);

    allocate_batch(
        &mut persistence,
        &AllocateBatchRequest {
            scenario_id,
            organization_id,
            victim_profile_ids: profiles[..5].to_vec(),
        },
    )
    .expect("Batch failed");

    let sixth = allocate_one(
        &mut persistence,
        &AllocateOneRequest {
            scenario_id,
            organization_id,
            victim_profile_id: profiles[5],
        },
    )
    .expect("Allocation failed");

    assert_eq!(sixth.button_number.as_deref(), Some("DRK06"));
}

#[test]
fn test_batch_with_unknown_profile_commits_nothing() {
    let (mut persistence, scenario_id, organization_id) = setup();
    let mut profiles = add_profiles(&mut persistence, 2);
    profiles.push(99_999);

    let result = allocate_batch(
        &mut persistence,
        &AllocateBatchRequest {
            scenario_id,
            organization_id,
            victim_profile_ids: profiles,
        },
    );

    match result {
        Err(ApiError::BatchAllocationFailed {
            invalid_profile_ids,
        }) => assert_eq!(invalid_profile_ids, vec![99_999]),
        other => panic!("Expected BatchAllocationFailed, got {other:?}"),
    }

    let listing = list_assignments(&mut persistence, scenario_id).expect("Listing failed");
    assert!(listing.assignments.is_empty());
}

#[test]
fn test_batch_with_already_assigned_profile_commits_nothing() {
    let (mut persistence, scenario_id, organization_id) = setup();
    let profiles = add_profiles(&mut persistence, 3);

    allocate_one(
        &mut persistence,
        &AllocateOneRequest {
            scenario_id,
            organization_id,
            victim_profile_id: profiles[0],
        },
    )
    .expect("Allocation failed");

    let result = allocate_batch(
        &mut persistence,
        &AllocateBatchRequest {
            scenario_id,
            organization_id,
            victim_profile_ids: profiles.clone(),
        },
    );

    match result {
        Err(ApiError::BatchAllocationFailed {
            invalid_profile_ids,
        }) => assert_eq!(invalid_profile_ids, vec![profiles[0]]),
        other => panic!("Expected BatchAllocationFailed, got {other:?}"),
    }

    // Only the pre-existing single allocation remains.
    let listing = list_assignments(&mut persistence, scenario_id).expect("Listing failed");
    assert_eq!(listing.assignments.len(), 1);
}

#[test]
fn test_batch_with_repeated_profile_commits_nothing() {
    let (mut persistence, scenario_id, organization_id) = setup();
    let profiles = add_profiles(&mut persistence, 2);

    let result = allocate_batch(
        &mut persistence,
        &AllocateBatchRequest {
            scenario_id,
            organization_id,
            victim_profile_ids: vec![profiles[0], profiles[1], profiles[0]],
        },
    );

    match result {
        Err(ApiError::BatchAllocationFailed {
            invalid_profile_ids,
        }) => assert_eq!(invalid_profile_ids, vec![profiles[0]]),
        other => panic!("Expected BatchAllocationFailed, got {other:?}"),
    }
}

#[test]
fn test_empty_batch_is_invalid_input() {
    let (mut persistence, scenario_id, organization_id) = setup();

    let result = allocate_batch(
        &mut persistence,
        &AllocateBatchRequest {
            scenario_id,
            organization_id,
            victim_profile_ids: Vec::new(),
        },
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_batch_promotes_queued_placeholders_in_place() {
    let (mut persistence, scenario_id, organization_id) = setup();
    let profiles = add_profiles(&mut persistence, 3);

    let placeholder = queue_profile(
        &mut persistence,
        &QueueProfileRequest {
            scenario_id,
            victim_profile_id: profiles[1],
        },
    )
    .expect("Queue failed");

    let response = allocate_batch(
        &mut persistence,
        &AllocateBatchRequest {
            scenario_id,
            organization_id,
            victim_profile_ids: profiles.clone(),
        },
    )
    .expect("Batch failed");

    // The queued profile kept its row and got its place in the run.
    let promoted = response
        .assignments
        .iter()
        .find(|a| a.victim_profile_id == profiles[1])
        .expect("Promoted assignment present");
    assert_eq!(promoted.assignment_id, placeholder.assignment_id);
    assert_eq!(promoted.button_number.as_deref(), Some("DRK02"));

    let listing = list_assignments(&mut persistence, scenario_id).expect("Listing failed");
    assert_eq!(listing.assignments.len(), 3);
}

#[test]
fn test_batches_for_different_organizations_number_independently() {
    let (mut persistence, scenario_id, drk_id) = setup();
    let ukf_id = add_organization(&mut persistence, "Uniklinik Frankfurt", "UKF");
    let profiles = add_profiles(&mut persistence, 4);

    let drk = allocate_batch(
        &mut persistence,
        &AllocateBatchRequest {
            scenario_id,
            organization_id: drk_id,
            victim_profile_ids: profiles[..2].to_vec(),
        },
    )
    .expect("Batch failed");
    let ukf = allocate_batch(
        &mut persistence,
        &AllocateBatchRequest {
            scenario_id,
            organization_id: ukf_id,
            victim_profile_ids: profiles[2..].to_vec(),
        },
    )
    .expect("Batch failed");

    let drk_codes: Vec<Option<&str>> =
        drk.assignments.iter().map(|a| a.button_number.as_deref()).collect();
    let ukf_codes: Vec<Option<&str>> =
        ukf.assignments.iter().map(|a| a.button_number.as_deref()).collect();

    assert_eq!(drk_codes, vec![Some("DRK01"), Some("DRK02")]);
    assert_eq!(ukf_codes, vec![Some("UKF01"), Some("UKF02")]);
}
