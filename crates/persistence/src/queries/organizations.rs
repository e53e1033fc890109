// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Organization Registry queries.

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use drill_assign_domain::{Organization, ShortCode};

use crate::diesel_schema::{assignments, organizations};
use crate::error::PersistenceError;

/// Converts an organizations row into a domain `Organization`.
///
/// Short codes are validated at registration time; a stored value that no
/// longer passes validation indicates a corrupt registry.
fn row_to_organization(
    organization_id: i64,
    name: String,
    short_code: &str,
) -> Result<Organization, PersistenceError> {
    let short_code: ShortCode = ShortCode::new(short_code).map_err(|e| {
        PersistenceError::Other(format!(
            "Corrupt short code for organization {organization_id}: {e}"
        ))
    })?;
    Ok(Organization::with_id(organization_id, name, short_code))
}

backend_fn! {
/// Retrieves an organization by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `organization_id` - The organization ID
///
/// # Errors
///
/// Returns `PersistenceError::OrganizationNotFound` if no such row exists.
pub fn get_organization(
    conn: &mut _,
    organization_id: i64,
) -> Result<Organization, PersistenceError> {
    let result = organizations::table
        .find(organization_id)
        .select((organizations::name, organizations::short_code))
        .first::<(String, String)>(conn);

    match result {
        Ok((name, short_code)) => row_to_organization(organization_id, name, &short_code),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::OrganizationNotFound(organization_id))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Retrieves all organizations, ordered by name.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_organizations(conn: &mut _) -> Result<Vec<Organization>, PersistenceError> {
    let rows: Vec<(i64, String, String)> = organizations::table
        .select((
            organizations::organization_id,
            organizations::name,
            organizations::short_code,
        ))
        .order(organizations::name.asc())
        .load::<(i64, String, String)>(conn)?;

    rows.into_iter()
        .map(|(id, name, short_code)| row_to_organization(id, name, &short_code))
        .collect()
}
}

backend_fn! {
/// Checks whether any assignment references the organization.
///
/// Organizations with references cannot be deleted and their short codes
/// cannot change — issued button codes embed the code.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `organization_id` - The organization ID
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn organization_has_assignments(
    conn: &mut _,
    organization_id: i64,
) -> Result<bool, PersistenceError> {
    let references: i64 = assignments::table
        .filter(assignments::organization_id.eq(organization_id))
        .select(count_star())
        .first::<i64>(conn)?;
    Ok(references > 0)
}
}

backend_fn! {
/// Retrieves just the short code of an organization.
///
/// Used inside allocation units of work, where only the button-code prefix
/// is needed.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `organization_id` - The organization ID
///
/// # Errors
///
/// Returns `PersistenceError::OrganizationNotFound` if no such row exists.
pub fn organization_short_code(
    conn: &mut _,
    organization_id: i64,
) -> Result<ShortCode, PersistenceError> {
    let result = organizations::table
        .find(organization_id)
        .select(organizations::short_code)
        .first::<String>(conn);

    match result {
        Ok(code) => ShortCode::new(&code).map_err(|e| {
            PersistenceError::Other(format!(
                "Corrupt short code for organization {organization_id}: {e}"
            ))
        }),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::OrganizationNotFound(organization_id))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}
