// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scenario Store mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::Date;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::scenarios;
use crate::error::PersistenceError;
use crate::queries::scenarios::format_scenario_date;

backend_fn! {
/// Inserts a new scenario.
///
/// The singleton guard (at most one scenario system-wide) lives in the
/// boundary layer's creation path; this function only performs the write.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - The scenario name
/// * `date` - The exercise date, if known
/// * `description` - Free-text description
///
/// # Returns
///
/// The canonical ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_scenario(
    conn: &mut _,
    name: &str,
    date: Option<Date>,
    description: Option<&str>,
) -> Result<i64, PersistenceError> {
    let stored_date: Option<String> = format_scenario_date(date)?;

    diesel::insert_into(scenarios::table)
        .values((
            scenarios::name.eq(name),
            scenarios::scenario_date.eq(stored_date),
            scenarios::description.eq(description),
        ))
        .execute(conn)?;

    let scenario_id: i64 = conn.get_last_insert_rowid()?;
    debug!(scenario_id, name, "Created scenario");
    Ok(scenario_id)
}
}

backend_fn! {
/// Deletes a scenario.
///
/// Assignments and watermarks cascade away with it — the scenario owns its
/// assignments.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `scenario_id` - The scenario ID
///
/// # Errors
///
/// Returns `PersistenceError::ScenarioNotFound` if no such row exists.
pub fn delete_scenario(conn: &mut _, scenario_id: i64) -> Result<(), PersistenceError> {
    let affected: usize = diesel::delete(scenarios::table.find(scenario_id)).execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::ScenarioNotFound(scenario_id));
    }
    info!(scenario_id, "Deleted scenario and its assignments");
    Ok(())
}
}
