// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Victim Profile Catalog queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use drill_assign_domain::VictimProfile;

use crate::diesel_schema::victim_profiles;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a victim profile by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `victim_profile_id` - The profile ID
///
/// # Errors
///
/// Returns `PersistenceError::VictimProfileNotFound` if no such row exists.
pub fn get_victim_profile(
    conn: &mut _,
    victim_profile_id: i64,
) -> Result<VictimProfile, PersistenceError> {
    let result = victim_profiles::table
        .find(victim_profile_id)
        .select((victim_profiles::profile_number, victim_profiles::category))
        .first::<(Option<String>, Option<String>)>(conn);

    match result {
        Ok((profile_number, category)) => Ok(VictimProfile::with_id(
            victim_profile_id,
            profile_number,
            category,
        )),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::VictimProfileNotFound(victim_profile_id))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves all victim profiles, ordered by profile number.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_victim_profiles(conn: &mut _) -> Result<Vec<VictimProfile>, PersistenceError> {
    let rows: Vec<(i64, Option<String>, Option<String>)> = victim_profiles::table
        .select((
            victim_profiles::victim_profile_id,
            victim_profiles::profile_number,
            victim_profiles::category,
        ))
        .order(victim_profiles::profile_number.asc())
        .load::<(i64, Option<String>, Option<String>)>(conn)?;

    Ok(rows
        .into_iter()
        .map(|(id, number, category)| VictimProfile::with_id(id, number, category))
        .collect())
}
}

backend_fn! {
/// Returns the subset of the given profile IDs that exist in the catalog.
///
/// Batch allocation validates its whole input up front; the caller compares
/// this set against the request to report the invalid IDs.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `victim_profile_ids` - The profile IDs to check
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn existing_profile_ids(
    conn: &mut _,
    victim_profile_ids: &[i64],
) -> Result<Vec<i64>, PersistenceError> {
    Ok(victim_profiles::table
        .filter(victim_profiles::victim_profile_id.eq_any(victim_profile_ids))
        .select(victim_profiles::victim_profile_id)
        .load::<i64>(conn)?)
}
}
