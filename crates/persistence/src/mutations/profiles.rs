// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Victim Profile Catalog mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::victim_profiles;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a new victim profile.
///
/// The profile number is optional; when present it carries a database-level
/// uniqueness constraint.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `profile_number` - Optional human-facing profile number
/// * `category` - Optional sighting/triage category
///
/// # Returns
///
/// The canonical ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_victim_profile(
    conn: &mut _,
    profile_number: Option<&str>,
    category: Option<&str>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(victim_profiles::table)
        .values((
            victim_profiles::profile_number.eq(profile_number),
            victim_profiles::category.eq(category),
        ))
        .execute(conn)?;

    let victim_profile_id: i64 = conn.get_last_insert_rowid()?;
    debug!(victim_profile_id, profile_number, "Created victim profile");
    Ok(victim_profile_id)
}
}
