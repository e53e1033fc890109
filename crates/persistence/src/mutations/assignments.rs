// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment Store mutations and the allocation units of work.
//!
//! The three allocation operations (`allocate_one`, `allocate_batch`,
//! `promote_assignment`) each run as one atomic unit of work: read the
//! watermark and live maximum under a pair-scoped lock, plan the numbering
//! in the allocation core, write the rows, advance the watermark, commit.
//! Nothing outside these functions writes `sequential_number`,
//! `button_number` or the watermark.
//!
//! The locking discipline is the one sanctioned backend divergence, so the
//! unit-of-work functions are hand-written per backend instead of generated:
//!
//! - `SQLite` has no row locks; the unit of work runs as a `BEGIN IMMEDIATE`
//!   transaction, taking the database write lock up front.
//! - `MySQL` locks the organization row with `SELECT ... FOR UPDATE`, so
//!   allocations for distinct organizations proceed in parallel.
//!
//! Uniqueness violations escape as `PersistenceError::UniqueViolation`; the
//! boundary layer retries the whole unit of work on them, bounded by
//! `MAX_ALLOCATION_ATTEMPTS`.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use num_traits::ToPrimitive;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info};

use drill_assign::{AllocationPlan, plan_allocation, plan_batch};
use drill_assign_domain::{Assignment, ShortCode};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{allocation_watermarks, assignments, organizations};
use crate::error::PersistenceError;
use crate::queries::assignments::{
    get_assignment_mysql, get_assignment_sqlite, pair_live_max_mysql, pair_live_max_sqlite,
    pair_watermark_mysql, pair_watermark_sqlite,
};
use crate::queries::organizations::{organization_short_code_mysql, organization_short_code_sqlite};

/// Produces the `created_at` value for new assignment rows.
fn now_timestamp() -> Result<String, PersistenceError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::Other(format!("Cannot format timestamp: {e}")))
}

/// Maps a core planning failure into a persistence error.
fn planning_failed(err: drill_assign::CoreError) -> PersistenceError {
    PersistenceError::AllocationFailed(err.to_string())
}

backend_fn! {
/// Inserts an unassigned placeholder for a queued profile.
///
/// Placeholders carry no organization, number or button code; they are
/// promoted in place when the profile is later assigned. The unique
/// constraint on `(scenario_id, victim_profile_id)` rejects queueing the
/// same profile twice.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `scenario_id` - The scenario ID
/// * `victim_profile_id` - The profile ID
///
/// # Returns
///
/// The canonical ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn queue_profile(
    conn: &mut _,
    scenario_id: i64,
    victim_profile_id: i64,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(assignments::table)
        .values((
            assignments::scenario_id.eq(scenario_id),
            assignments::victim_profile_id.eq(victim_profile_id),
            assignments::created_at.eq(now_timestamp()?),
        ))
        .execute(conn)?;

    let assignment_id: i64 = conn.get_last_insert_rowid()?;
    debug!(assignment_id, scenario_id, victim_profile_id, "Queued profile");
    Ok(assignment_id)
}
}

backend_fn! {
/// Deletes an assignment.
///
/// The watermark is deliberately untouched: a deleted assignment's number
/// is never reissued.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `assignment_id` - The assignment ID
///
/// # Errors
///
/// Returns `PersistenceError::AssignmentNotFound` if no such row exists.
pub fn delete_assignment(conn: &mut _, assignment_id: i64) -> Result<(), PersistenceError> {
    let affected: usize =
        diesel::delete(assignments::table.find(assignment_id)).execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::AssignmentNotFound(assignment_id));
    }
    debug!(assignment_id, "Deleted assignment");
    Ok(())
}
}

backend_fn! {
/// Writes one planned allocation: promotes the profile's placeholder in
/// place if one exists, otherwise inserts a fresh assigned row.
///
/// Must be called inside an allocation unit of work, after planning under
/// the pair-scoped lock.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `scenario_id` - The scenario ID
/// * `organization_id` - The organization ID
/// * `victim_profile_id` - The profile ID
/// * `plan` - The numbering decision to write
///
/// # Returns
///
/// The ID of the written assignment row.
///
/// # Errors
///
/// Returns an error if the write fails; uniqueness violations surface as
/// `PersistenceError::UniqueViolation` for the caller's retry loop.
pub fn write_allocation(
    conn: &mut _,
    scenario_id: i64,
    organization_id: i64,
    victim_profile_id: i64,
    plan: &AllocationPlan,
) -> Result<i64, PersistenceError> {
    let number: i32 = plan.sequential_number.value().to_i32().ok_or_else(|| {
        PersistenceError::Other(format!(
            "Sequential number {} out of storage range",
            plan.sequential_number
        ))
    })?;

    let placeholder: Option<i64> = assignments::table
        .filter(assignments::scenario_id.eq(scenario_id))
        .filter(assignments::victim_profile_id.eq(victim_profile_id))
        .filter(assignments::organization_id.is_null())
        .select(assignments::assignment_id)
        .first::<i64>(conn)
        .optional()?;

    if let Some(assignment_id) = placeholder {
        let affected: usize = diesel::update(
            assignments::table
                .find(assignment_id)
                .filter(assignments::sequential_number.is_null()),
        )
        .set((
            assignments::organization_id.eq(organization_id),
            assignments::sequential_number.eq(number),
            assignments::button_number.eq(plan.button_number.value()),
        ))
        .execute(conn)?;

        if affected == 0 {
            return Err(PersistenceError::AssignmentAlreadyNumbered { assignment_id });
        }
        debug!(assignment_id, victim_profile_id, "Promoted placeholder");
        return Ok(assignment_id);
    }

    diesel::insert_into(assignments::table)
        .values((
            assignments::scenario_id.eq(scenario_id),
            assignments::organization_id.eq(organization_id),
            assignments::victim_profile_id.eq(victim_profile_id),
            assignments::sequential_number.eq(number),
            assignments::button_number.eq(plan.button_number.value()),
            assignments::created_at.eq(now_timestamp()?),
        ))
        .execute(conn)?;

    conn.get_last_insert_rowid()
}
}

backend_fn! {
/// Advances the issued-number watermark for a pair.
///
/// Runs inside the allocation unit of work, after the rows are written.
/// Update-then-insert is race-free here because the caller holds the
/// pair-scoped lock.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `scenario_id` - The scenario ID
/// * `organization_id` - The organization ID
/// * `last_issued` - The highest number issued by this unit of work
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn advance_watermark(
    conn: &mut _,
    scenario_id: i64,
    organization_id: i64,
    last_issued: u32,
) -> Result<(), PersistenceError> {
    let value: i32 = last_issued.to_i32().ok_or_else(|| {
        PersistenceError::Other(format!("Watermark {last_issued} out of storage range"))
    })?;

    let affected: usize = diesel::update(
        allocation_watermarks::table
            .filter(allocation_watermarks::scenario_id.eq(scenario_id))
            .filter(allocation_watermarks::organization_id.eq(organization_id)),
    )
    .set(allocation_watermarks::last_issued.eq(value))
    .execute(conn)?;

    if affected == 0 {
        diesel::insert_into(allocation_watermarks::table)
            .values((
                allocation_watermarks::scenario_id.eq(scenario_id),
                allocation_watermarks::organization_id.eq(organization_id),
                allocation_watermarks::last_issued.eq(value),
            ))
            .execute(conn)?;
    }
    Ok(())
}
}

/// Locks the organization's registry row for the duration of the
/// transaction (`MySQL` version).
///
/// The row lock is what serializes concurrent allocations for the same
/// organization on `MySQL`; distinct organizations proceed in parallel.
///
/// # Errors
///
/// Returns `PersistenceError::OrganizationNotFound` if no such row exists.
fn lock_organization_row_mysql(
    conn: &mut MysqlConnection,
    organization_id: i64,
) -> Result<(), PersistenceError> {
    let result = organizations::table
        .find(organization_id)
        .select(organizations::organization_id)
        .for_update()
        .first::<i64>(conn);

    match result {
        Ok(_) => Ok(()),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::OrganizationNotFound(organization_id))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Locks the organization row and reads its short code (`MySQL` version).
fn locked_short_code_mysql(
    conn: &mut MysqlConnection,
    organization_id: i64,
) -> Result<ShortCode, PersistenceError> {
    lock_organization_row_mysql(conn, organization_id)?;
    organization_short_code_mysql(conn, organization_id)
}

/// Allocates one assignment as a single atomic unit of work (`SQLite`
/// version).
///
/// The `BEGIN IMMEDIATE` transaction takes the database write lock before
/// the watermark and live maximum are read, so the derived-max computation
/// cannot race another writer on the same connection's database.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `scenario_id` - The scenario ID
/// * `organization_id` - The organization ID
/// * `victim_profile_id` - The profile ID
///
/// # Returns
///
/// The allocated assignment with its issued number and button code.
///
/// # Errors
///
/// Returns an error if the unit of work fails; uniqueness violations
/// surface as `PersistenceError::UniqueViolation` for the caller's retry
/// loop.
pub fn allocate_one_sqlite(
    conn: &mut SqliteConnection,
    scenario_id: i64,
    organization_id: i64,
    victim_profile_id: i64,
) -> Result<Assignment, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let short_code: ShortCode = organization_short_code_sqlite(conn, organization_id)?;
        let watermark: u32 = pair_watermark_sqlite(conn, scenario_id, organization_id)?;
        let live_max: u32 = pair_live_max_sqlite(conn, scenario_id, organization_id)?;

        let plan: AllocationPlan =
            plan_allocation(&short_code, watermark, live_max).map_err(planning_failed)?;

        let assignment_id: i64 =
            write_allocation_sqlite(conn, scenario_id, organization_id, victim_profile_id, &plan)?;
        advance_watermark_sqlite(
            conn,
            scenario_id,
            organization_id,
            plan.sequential_number.value(),
        )?;

        info!(
            assignment_id,
            scenario_id,
            organization_id,
            victim_profile_id,
            button_number = plan.button_number.value(),
            "Allocated assignment"
        );

        Ok(Assignment::with_id(
            assignment_id,
            scenario_id,
            Some(organization_id),
            victim_profile_id,
            Some(plan.sequential_number),
            Some(plan.button_number),
        ))
    })
}

/// Allocates one assignment as a single atomic unit of work (`MySQL`
/// version).
///
/// The organization row is locked with `SELECT ... FOR UPDATE` before the
/// watermark and live maximum are read, serializing writers on the same
/// pair while leaving other organizations unblocked.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `scenario_id` - The scenario ID
/// * `organization_id` - The organization ID
/// * `victim_profile_id` - The profile ID
///
/// # Returns
///
/// The allocated assignment with its issued number and button code.
///
/// # Errors
///
/// Returns an error if the unit of work fails; uniqueness violations
/// surface as `PersistenceError::UniqueViolation` for the caller's retry
/// loop.
pub fn allocate_one_mysql(
    conn: &mut MysqlConnection,
    scenario_id: i64,
    organization_id: i64,
    victim_profile_id: i64,
) -> Result<Assignment, PersistenceError> {
    conn.transaction(|conn| {
        let short_code: ShortCode = locked_short_code_mysql(conn, organization_id)?;
        let watermark: u32 = pair_watermark_mysql(conn, scenario_id, organization_id)?;
        let live_max: u32 = pair_live_max_mysql(conn, scenario_id, organization_id)?;

        let plan: AllocationPlan =
            plan_allocation(&short_code, watermark, live_max).map_err(planning_failed)?;

        let assignment_id: i64 =
            write_allocation_mysql(conn, scenario_id, organization_id, victim_profile_id, &plan)?;
        advance_watermark_mysql(
            conn,
            scenario_id,
            organization_id,
            plan.sequential_number.value(),
        )?;

        info!(
            assignment_id,
            scenario_id,
            organization_id,
            victim_profile_id,
            button_number = plan.button_number.value(),
            "Allocated assignment"
        );

        Ok(Assignment::with_id(
            assignment_id,
            scenario_id,
            Some(organization_id),
            victim_profile_id,
            Some(plan.sequential_number),
            Some(plan.button_number),
        ))
    })
}

/// Allocates a contiguous batch as a single atomic unit of work (`SQLite`
/// version).
///
/// The whole batch receives consecutive numbers in input order; if any
/// write fails the transaction rolls back and nothing is committed.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `scenario_id` - The scenario ID
/// * `organization_id` - The organization ID
/// * `victim_profile_ids` - The profiles to allocate, in order
///
/// # Returns
///
/// The allocated assignments, in input order.
///
/// # Errors
///
/// Returns an error if the unit of work fails; nothing is committed on
/// failure.
pub fn allocate_batch_sqlite(
    conn: &mut SqliteConnection,
    scenario_id: i64,
    organization_id: i64,
    victim_profile_ids: &[i64],
) -> Result<Vec<Assignment>, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let short_code: ShortCode = organization_short_code_sqlite(conn, organization_id)?;
        let watermark: u32 = pair_watermark_sqlite(conn, scenario_id, organization_id)?;
        let live_max: u32 = pair_live_max_sqlite(conn, scenario_id, organization_id)?;

        let plans: Vec<AllocationPlan> =
            plan_batch(&short_code, watermark, live_max, victim_profile_ids.len())
                .map_err(planning_failed)?;

        let mut allocated: Vec<Assignment> = Vec::with_capacity(victim_profile_ids.len());
        for (victim_profile_id, plan) in victim_profile_ids.iter().zip(&plans) {
            let assignment_id: i64 =
                write_allocation_sqlite(conn, scenario_id, organization_id, *victim_profile_id, plan)?;
            allocated.push(Assignment::with_id(
                assignment_id,
                scenario_id,
                Some(organization_id),
                *victim_profile_id,
                Some(plan.sequential_number),
                Some(plan.button_number.clone()),
            ));
        }

        if let Some(last) = plans.last() {
            advance_watermark_sqlite(
                conn,
                scenario_id,
                organization_id,
                last.sequential_number.value(),
            )?;
        }

        info!(
            scenario_id,
            organization_id,
            batch_size = victim_profile_ids.len(),
            "Allocated batch"
        );

        Ok(allocated)
    })
}

/// Allocates a contiguous batch as a single atomic unit of work (`MySQL`
/// version).
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `scenario_id` - The scenario ID
/// * `organization_id` - The organization ID
/// * `victim_profile_ids` - The profiles to allocate, in order
///
/// # Returns
///
/// The allocated assignments, in input order.
///
/// # Errors
///
/// Returns an error if the unit of work fails; nothing is committed on
/// failure.
pub fn allocate_batch_mysql(
    conn: &mut MysqlConnection,
    scenario_id: i64,
    organization_id: i64,
    victim_profile_ids: &[i64],
) -> Result<Vec<Assignment>, PersistenceError> {
    conn.transaction(|conn| {
        let short_code: ShortCode = locked_short_code_mysql(conn, organization_id)?;
        let watermark: u32 = pair_watermark_mysql(conn, scenario_id, organization_id)?;
        let live_max: u32 = pair_live_max_mysql(conn, scenario_id, organization_id)?;

        let plans: Vec<AllocationPlan> =
            plan_batch(&short_code, watermark, live_max, victim_profile_ids.len())
                .map_err(planning_failed)?;

        let mut allocated: Vec<Assignment> = Vec::with_capacity(victim_profile_ids.len());
        for (victim_profile_id, plan) in victim_profile_ids.iter().zip(&plans) {
            let assignment_id: i64 =
                write_allocation_mysql(conn, scenario_id, organization_id, *victim_profile_id, plan)?;
            allocated.push(Assignment::with_id(
                assignment_id,
                scenario_id,
                Some(organization_id),
                *victim_profile_id,
                Some(plan.sequential_number),
                Some(plan.button_number.clone()),
            ));
        }

        if let Some(last) = plans.last() {
            advance_watermark_mysql(
                conn,
                scenario_id,
                organization_id,
                last.sequential_number.value(),
            )?;
        }

        info!(
            scenario_id,
            organization_id,
            batch_size = victim_profile_ids.len(),
            "Allocated batch"
        );

        Ok(allocated)
    })
}

/// Promotes an unassigned placeholder to an organization as a single atomic
/// unit of work (`SQLite` version).
///
/// Runs the same numbering algorithm as `allocate_one` but mutates the
/// existing row instead of inserting. Assignment is one-way: a row that
/// already carries a number is rejected.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `assignment_id` - The placeholder to promote
/// * `organization_id` - The organization to assign
///
/// # Returns
///
/// The promoted assignment with its issued number and button code.
///
/// # Errors
///
/// Returns `PersistenceError::AssignmentAlreadyNumbered` if the assignment
/// is not a placeholder; other failures as in `allocate_one`.
pub fn promote_assignment_sqlite(
    conn: &mut SqliteConnection,
    assignment_id: i64,
    organization_id: i64,
) -> Result<Assignment, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let assignment: Assignment = get_assignment_sqlite(conn, assignment_id)?;
        if assignment.is_assigned() {
            return Err(PersistenceError::AssignmentAlreadyNumbered { assignment_id });
        }
        let scenario_id: i64 = assignment.scenario_id;

        let short_code: ShortCode = organization_short_code_sqlite(conn, organization_id)?;
        let watermark: u32 = pair_watermark_sqlite(conn, scenario_id, organization_id)?;
        let live_max: u32 = pair_live_max_sqlite(conn, scenario_id, organization_id)?;

        let plan: AllocationPlan =
            plan_allocation(&short_code, watermark, live_max).map_err(planning_failed)?;

        promote_row_sqlite(conn, assignment_id, organization_id, &plan)?;
        advance_watermark_sqlite(
            conn,
            scenario_id,
            organization_id,
            plan.sequential_number.value(),
        )?;

        info!(
            assignment_id,
            scenario_id,
            organization_id,
            button_number = plan.button_number.value(),
            "Promoted assignment"
        );

        Ok(Assignment::with_id(
            assignment_id,
            scenario_id,
            Some(organization_id),
            assignment.victim_profile_id,
            Some(plan.sequential_number),
            Some(plan.button_number),
        ))
    })
}

/// Promotes an unassigned placeholder to an organization as a single atomic
/// unit of work (`MySQL` version).
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `assignment_id` - The placeholder to promote
/// * `organization_id` - The organization to assign
///
/// # Returns
///
/// The promoted assignment with its issued number and button code.
///
/// # Errors
///
/// Returns `PersistenceError::AssignmentAlreadyNumbered` if the assignment
/// is not a placeholder; other failures as in `allocate_one`.
pub fn promote_assignment_mysql(
    conn: &mut MysqlConnection,
    assignment_id: i64,
    organization_id: i64,
) -> Result<Assignment, PersistenceError> {
    conn.transaction(|conn| {
        let short_code: ShortCode = locked_short_code_mysql(conn, organization_id)?;

        let assignment: Assignment = get_assignment_mysql(conn, assignment_id)?;
        if assignment.is_assigned() {
            return Err(PersistenceError::AssignmentAlreadyNumbered { assignment_id });
        }
        let scenario_id: i64 = assignment.scenario_id;

        let watermark: u32 = pair_watermark_mysql(conn, scenario_id, organization_id)?;
        let live_max: u32 = pair_live_max_mysql(conn, scenario_id, organization_id)?;

        let plan: AllocationPlan =
            plan_allocation(&short_code, watermark, live_max).map_err(planning_failed)?;

        promote_row_mysql(conn, assignment_id, organization_id, &plan)?;
        advance_watermark_mysql(
            conn,
            scenario_id,
            organization_id,
            plan.sequential_number.value(),
        )?;

        info!(
            assignment_id,
            scenario_id,
            organization_id,
            button_number = plan.button_number.value(),
            "Promoted assignment"
        );

        Ok(Assignment::with_id(
            assignment_id,
            scenario_id,
            Some(organization_id),
            assignment.victim_profile_id,
            Some(plan.sequential_number),
            Some(plan.button_number),
        ))
    })
}

backend_fn! {
/// Writes the promotion of one placeholder row.
///
/// The `sequential_number IS NULL` guard makes the one-way rule hold even
/// if the row changed between the read and this write.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `assignment_id` - The placeholder to promote
/// * `organization_id` - The organization to assign
/// * `plan` - The numbering decision to write
///
/// # Errors
///
/// Returns `PersistenceError::AssignmentAlreadyNumbered` if the row already
/// carries a number.
pub fn promote_row(
    conn: &mut _,
    assignment_id: i64,
    organization_id: i64,
    plan: &AllocationPlan,
) -> Result<(), PersistenceError> {
    let number: i32 = plan.sequential_number.value().to_i32().ok_or_else(|| {
        PersistenceError::Other(format!(
            "Sequential number {} out of storage range",
            plan.sequential_number
        ))
    })?;

    let affected: usize = diesel::update(
        assignments::table
            .find(assignment_id)
            .filter(assignments::sequential_number.is_null()),
    )
    .set((
        assignments::organization_id.eq(organization_id),
        assignments::sequential_number.eq(number),
        assignments::button_number.eq(plan.button_number.value()),
    ))
    .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::AssignmentAlreadyNumbered { assignment_id });
    }
    Ok(())
}
}
