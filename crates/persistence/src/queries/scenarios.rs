// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scenario Store queries.

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use drill_assign_domain::Scenario;
use time::Date;
use time::macros::format_description;

use crate::diesel_schema::{assignments, scenarios, victim_profiles};
use crate::error::PersistenceError;

/// Storage format for scenario dates.
const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Parses a stored ISO 8601 date.
fn parse_scenario_date(stored: Option<String>) -> Result<Option<Date>, PersistenceError> {
    stored
        .map(|s| {
            Date::parse(&s, DATE_FORMAT)
                .map_err(|e| PersistenceError::Other(format!("Corrupt scenario date '{s}': {e}")))
        })
        .transpose()
}

/// Formats a scenario date for storage.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn format_scenario_date(date: Option<Date>) -> Result<Option<String>, PersistenceError> {
    date.map(|d| {
        d.format(DATE_FORMAT)
            .map_err(|e| PersistenceError::Other(format!("Cannot format scenario date: {e}")))
    })
    .transpose()
}

backend_fn! {
/// Retrieves a scenario by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `scenario_id` - The scenario ID
///
/// # Errors
///
/// Returns `PersistenceError::ScenarioNotFound` if no such row exists.
pub fn get_scenario(conn: &mut _, scenario_id: i64) -> Result<Scenario, PersistenceError> {
    let result = scenarios::table
        .find(scenario_id)
        .select((
            scenarios::name,
            scenarios::scenario_date,
            scenarios::description,
        ))
        .first::<(String, Option<String>, Option<String>)>(conn);

    match result {
        Ok((name, date, description)) => Ok(Scenario::with_id(
            scenario_id,
            name,
            parse_scenario_date(date)?,
            description,
        )),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::ScenarioNotFound(scenario_id))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves the current scenario, if any.
///
/// The system allows at most one scenario at a time; the creation guard
/// queries this to enforce the singleton invariant.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn current_scenario(conn: &mut _) -> Result<Option<Scenario>, PersistenceError> {
    let row: Option<(i64, String, Option<String>, Option<String>)> = scenarios::table
        .select((
            scenarios::scenario_id,
            scenarios::name,
            scenarios::scenario_date,
            scenarios::description,
        ))
        .order(scenarios::scenario_id.asc())
        .first::<(i64, String, Option<String>, Option<String>)>(conn)
        .optional()?;

    row.map(|(id, name, date, description)| {
        Ok(Scenario::with_id(
            id,
            name,
            parse_scenario_date(date)?,
            description,
        ))
    })
    .transpose()
}
}

backend_fn! {
/// Counts the scenario's assignments grouped by profile category.
///
/// Feeds the excluded reporting collaborators; rows with no recorded
/// category come back as `None`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `scenario_id` - The scenario ID
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn scenario_statistics(
    conn: &mut _,
    scenario_id: i64,
) -> Result<Vec<(Option<String>, i64)>, PersistenceError> {
    Ok(assignments::table
        .inner_join(victim_profiles::table)
        .filter(assignments::scenario_id.eq(scenario_id))
        .group_by(victim_profiles::category)
        .select((victim_profiles::category, count_star()))
        .order(victim_profiles::category.asc())
        .load::<(Option<String>, i64)>(conn)?)
}
}
