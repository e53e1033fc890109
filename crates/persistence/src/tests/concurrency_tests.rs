// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Concurrent-writer tests against a file-backed database.
//!
//! Two independent connections race allocations for the same
//! `(scenario, organization)` pair from two threads. The immediate
//! transaction takes the write lock before the watermark is read, so the
//! issued numbers must come out distinct and gap-free regardless of
//! interleaving.

use std::collections::BTreeSet;
use std::thread;

use drill_assign_domain::ShortCode;

use crate::Persistence;

/// Allocations per writer thread.
const PER_WRITER: usize = 10;

#[test]
fn test_two_connections_never_issue_the_same_number() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("allocator.db");

    // Seed the store through the first connection.
    let mut seed = Persistence::new_with_file(&db_path).expect("Failed to open store");
    let scenario_id = seed
        .create_scenario("Vollübung", None, None)
        .expect("Scenario creation failed");
    let organization_id = seed
        .create_organization("Rotes Kreuz", &ShortCode::new("DRK").expect("Valid short code"))
        .expect("Organization creation failed");

    let mut profile_ids: Vec<i64> = Vec::new();
    for n in 1..=(2 * PER_WRITER) {
        profile_ids.push(
            seed.create_victim_profile(Some(&format!("P-{n}")), None)
                .expect("Profile creation failed"),
        );
    }
    drop(seed);

    let (first_half, second_half) = profile_ids.split_at(PER_WRITER);

    let spawn_writer = |profiles: Vec<i64>, path: std::path::PathBuf| {
        thread::spawn(move || -> Vec<u32> {
            let mut persistence =
                Persistence::new_with_file(&path).expect("Failed to open store");
            profiles
                .into_iter()
                .map(|profile_id| {
                    persistence
                        .allocate_one(scenario_id, organization_id, profile_id)
                        .expect("Allocation failed")
                        .sequential_number
                        .expect("Number issued")
                        .value()
                })
                .collect()
        })
    };

    let writer_a = spawn_writer(first_half.to_vec(), db_path.clone());
    let writer_b = spawn_writer(second_half.to_vec(), db_path.clone());

    let mut issued: Vec<u32> = writer_a.join().expect("Writer A panicked");
    issued.extend(writer_b.join().expect("Writer B panicked"));

    // All numbers distinct and exactly {1..2N}: no collision, no gap.
    let unique: BTreeSet<u32> = issued.iter().copied().collect();
    assert_eq!(unique.len(), 2 * PER_WRITER);
    assert_eq!(
        unique,
        (1..=u32::try_from(2 * PER_WRITER).expect("Small count")).collect::<BTreeSet<u32>>()
    );
}

#[test]
fn test_concurrent_batch_and_single_never_collide() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("allocator.db");

    let mut seed = Persistence::new_with_file(&db_path).expect("Failed to open store");
    let scenario_id = seed
        .create_scenario("Vollübung", None, None)
        .expect("Scenario creation failed");
    let organization_id = seed
        .create_organization("Rotes Kreuz", &ShortCode::new("DRK").expect("Valid short code"))
        .expect("Organization creation failed");

    let mut profile_ids: Vec<i64> = Vec::new();
    for n in 1..=6 {
        profile_ids.push(
            seed.create_victim_profile(Some(&format!("P-{n}")), None)
                .expect("Profile creation failed"),
        );
    }
    drop(seed);

    let batch_profiles: Vec<i64> = profile_ids[..5].to_vec();
    let single_profile: i64 = profile_ids[5];

    let batch_path = db_path.clone();
    let batch_writer = thread::spawn(move || -> Vec<String> {
        let mut persistence =
            Persistence::new_with_file(&batch_path).expect("Failed to open store");
        persistence
            .allocate_batch(scenario_id, organization_id, &batch_profiles)
            .expect("Batch allocation failed")
            .into_iter()
            .map(|a| a.button_number.expect("Code issued").value().to_owned())
            .collect()
    });

    let single_path = db_path.clone();
    let single_writer = thread::spawn(move || -> String {
        let mut persistence =
            Persistence::new_with_file(&single_path).expect("Failed to open store");
        persistence
            .allocate_one(scenario_id, organization_id, single_profile)
            .expect("Allocation failed")
            .button_number
            .expect("Code issued")
            .value()
            .to_owned()
    });

    let mut codes: Vec<String> = batch_writer.join().expect("Batch writer panicked");
    codes.push(single_writer.join().expect("Single writer panicked"));
    codes.sort();

    // Whichever commit order the lock produced, the six codes are exactly
    // DRK01..DRK06 and the batch run is contiguous.
    assert_eq!(
        codes,
        vec!["DRK01", "DRK02", "DRK03", "DRK04", "DRK05", "DRK06"]
    );
}
