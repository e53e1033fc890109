// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment Store queries.
//!
//! Includes the two reads at the heart of the allocator — the pair watermark
//! and the live maximum sequence number. Both are only meaningful when read
//! inside an allocation unit of work, under the pair-scoped lock; the
//! standalone versions exist for tests and diagnostics.

use diesel::dsl::max;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use drill_assign_domain::{Assignment, AssignmentSnapshot, ButtonCode, SequentialNumber};

use crate::diesel_schema::{allocation_watermarks, assignments, organizations, victim_profiles};
use crate::error::PersistenceError;

/// Raw assignment row as selected from the store.
pub type AssignmentRow = (i64, i64, Option<i64>, i64, Option<i32>, Option<String>);

/// Converts a raw row into a domain `Assignment`.
///
/// # Errors
///
/// Returns an error if a stored sequence number is outside the valid range;
/// that indicates a corrupt store since numbers are validated on issue.
pub fn row_to_assignment(row: AssignmentRow) -> Result<Assignment, PersistenceError> {
    let (assignment_id, scenario_id, organization_id, victim_profile_id, number, button) = row;

    let sequential_number: Option<SequentialNumber> = number
        .map(|n| {
            u32::try_from(n)
                .ok()
                .and_then(|n| SequentialNumber::new(n).ok())
                .ok_or_else(|| {
                    PersistenceError::Other(format!(
                        "Corrupt sequential number {n} on assignment {assignment_id}"
                    ))
                })
        })
        .transpose()?;

    Ok(Assignment::with_id(
        assignment_id,
        scenario_id,
        organization_id,
        victim_profile_id,
        sequential_number,
        button.map(ButtonCode::from_stored),
    ))
}

backend_fn! {
/// Retrieves an assignment by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `assignment_id` - The assignment ID
///
/// # Errors
///
/// Returns `PersistenceError::AssignmentNotFound` if no such row exists.
pub fn get_assignment(
    conn: &mut _,
    assignment_id: i64,
) -> Result<Assignment, PersistenceError> {
    let result = assignments::table
        .find(assignment_id)
        .select((
            assignments::assignment_id,
            assignments::scenario_id,
            assignments::organization_id,
            assignments::victim_profile_id,
            assignments::sequential_number,
            assignments::button_number,
        ))
        .first::<AssignmentRow>(conn);

    match result {
        Ok(row) => row_to_assignment(row),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::AssignmentNotFound(assignment_id))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves all assignments of a scenario.
///
/// Ordered by organization, then sequence number. Databases sort NULLs
/// first; the api layer re-sorts snapshots so placeholders come last.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `scenario_id` - The scenario ID
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_assignments(
    conn: &mut _,
    scenario_id: i64,
) -> Result<Vec<Assignment>, PersistenceError> {
    let rows: Vec<AssignmentRow> = assignments::table
        .filter(assignments::scenario_id.eq(scenario_id))
        .select((
            assignments::assignment_id,
            assignments::scenario_id,
            assignments::organization_id,
            assignments::victim_profile_id,
            assignments::sequential_number,
            assignments::button_number,
        ))
        .order((
            assignments::organization_id.asc(),
            assignments::sequential_number.asc(),
        ))
        .load::<AssignmentRow>(conn)?;

    rows.into_iter().map(row_to_assignment).collect()
}
}

backend_fn! {
/// Retrieves export-facing snapshots of a scenario's assignments.
///
/// Joins the registry and the catalog so report collaborators get complete,
/// immutable copies instead of aliasing live rows.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `scenario_id` - The scenario ID
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
#[allow(clippy::type_complexity)]
pub fn list_assignment_snapshots(
    conn: &mut _,
    scenario_id: i64,
) -> Result<Vec<AssignmentSnapshot>, PersistenceError> {
    let rows: Vec<(
        i64,
        Option<i64>,
        i64,
        Option<i32>,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
    )> = assignments::table
        .left_join(organizations::table)
        .inner_join(victim_profiles::table)
        .filter(assignments::scenario_id.eq(scenario_id))
        .select((
            assignments::assignment_id,
            assignments::organization_id,
            assignments::victim_profile_id,
            assignments::sequential_number,
            assignments::button_number,
            organizations::name.nullable(),
            organizations::short_code.nullable(),
            victim_profiles::profile_number,
            victim_profiles::category,
        ))
        .order((
            assignments::organization_id.asc(),
            assignments::sequential_number.asc(),
        ))
        .load(conn)?;

    rows.into_iter()
        .map(
            |(
                assignment_id,
                organization_id,
                victim_profile_id,
                number,
                button,
                organization_name,
                short_code,
                profile_number,
                category,
            )| {
                let sequential_number: Option<u32> = number
                    .map(|n| {
                        u32::try_from(n).map_err(|_| {
                            PersistenceError::Other(format!(
                                "Corrupt sequential number {n} on assignment {assignment_id}"
                            ))
                        })
                    })
                    .transpose()?;
                Ok(AssignmentSnapshot {
                    assignment_id,
                    scenario_id,
                    organization_id,
                    organization_name,
                    short_code,
                    victim_profile_id,
                    profile_number,
                    category,
                    sequential_number,
                    button_number: button,
                })
            },
        )
        .collect()
}
}

backend_fn! {
/// Returns the profile IDs that already hold an *assigned* assignment in
/// the scenario.
///
/// Placeholders do not count: a queued profile may still be promoted.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `scenario_id` - The scenario ID
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn assigned_profile_ids(
    conn: &mut _,
    scenario_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    Ok(assignments::table
        .filter(assignments::scenario_id.eq(scenario_id))
        .filter(assignments::organization_id.is_not_null())
        .select(assignments::victim_profile_id)
        .load::<i64>(conn)?)
}
}

backend_fn! {
/// Finds the unassigned placeholder for a profile in a scenario, if any.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `scenario_id` - The scenario ID
/// * `victim_profile_id` - The profile ID
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn find_placeholder(
    conn: &mut _,
    scenario_id: i64,
    victim_profile_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    Ok(assignments::table
        .filter(assignments::scenario_id.eq(scenario_id))
        .filter(assignments::victim_profile_id.eq(victim_profile_id))
        .filter(assignments::organization_id.is_null())
        .select(assignments::assignment_id)
        .first::<i64>(conn)
        .optional()?)
}
}

backend_fn! {
/// Reads the issued-number watermark for a `(scenario, organization)` pair.
///
/// Returns 0 when no allocation has happened for the pair yet.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `scenario_id` - The scenario ID
/// * `organization_id` - The organization ID
///
/// # Errors
///
/// Returns an error if the database cannot be queried or the stored value
/// is out of range.
pub fn pair_watermark(
    conn: &mut _,
    scenario_id: i64,
    organization_id: i64,
) -> Result<u32, PersistenceError> {
    let stored: Option<i32> = allocation_watermarks::table
        .filter(allocation_watermarks::scenario_id.eq(scenario_id))
        .filter(allocation_watermarks::organization_id.eq(organization_id))
        .select(allocation_watermarks::last_issued)
        .first::<i32>(conn)
        .optional()?;

    stored.map_or(Ok(0), |value| {
        u32::try_from(value).map_err(|_| {
            PersistenceError::Other(format!(
                "Corrupt watermark {value} for scenario {scenario_id}, organization {organization_id}"
            ))
        })
    })
}
}

backend_fn! {
/// Reads the maximum live sequence number for a `(scenario, organization)`
/// pair.
///
/// Returns 0 when the pair has no assigned rows. Deleted rows do not show
/// up here, which is exactly why the watermark exists.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `scenario_id` - The scenario ID
/// * `organization_id` - The organization ID
///
/// # Errors
///
/// Returns an error if the database cannot be queried or a stored value is
/// out of range.
pub fn pair_live_max(
    conn: &mut _,
    scenario_id: i64,
    organization_id: i64,
) -> Result<u32, PersistenceError> {
    let stored: Option<i32> = assignments::table
        .filter(assignments::scenario_id.eq(scenario_id))
        .filter(assignments::organization_id.eq(organization_id))
        .select(max(assignments::sequential_number))
        .first::<Option<i32>>(conn)?;

    stored.map_or(Ok(0), |value| {
        u32::try_from(value).map_err(|_| {
            PersistenceError::Other(format!(
                "Corrupt sequential number {value} for scenario {scenario_id}, organization {organization_id}"
            ))
        })
    })
}
}
