// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Organization Registry mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::organizations;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a new organization.
///
/// Name and short code carry database-level uniqueness constraints; a
/// violation surfaces as `PersistenceError::UniqueViolation`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - The organization name
/// * `short_code` - The validated short code
///
/// # Returns
///
/// The canonical ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_organization(
    conn: &mut _,
    name: &str,
    short_code: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(organizations::table)
        .values((
            organizations::name.eq(name),
            organizations::short_code.eq(short_code),
        ))
        .execute(conn)?;

    let organization_id: i64 = conn.get_last_insert_rowid()?;
    debug!(organization_id, name, short_code, "Created organization");
    Ok(organization_id)
}
}

backend_fn! {
/// Updates an organization's name and short code.
///
/// The caller is responsible for the rename rules (short codes are
/// immutable once referenced); this function only performs the write.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `organization_id` - The organization ID
/// * `name` - The new name
/// * `short_code` - The new short code
///
/// # Errors
///
/// Returns `PersistenceError::OrganizationNotFound` if no such row exists.
pub fn update_organization(
    conn: &mut _,
    organization_id: i64,
    name: &str,
    short_code: &str,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(organizations::table.find(organization_id))
        .set((
            organizations::name.eq(name),
            organizations::short_code.eq(short_code),
        ))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::OrganizationNotFound(organization_id));
    }
    debug!(organization_id, name, short_code, "Updated organization");
    Ok(())
}
}

backend_fn! {
/// Deletes an organization.
///
/// The caller checks for referencing assignments first; the foreign key
/// RESTRICT constraint is the backstop and surfaces as
/// `PersistenceError::ForeignKeyViolation`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `organization_id` - The organization ID
///
/// # Errors
///
/// Returns `PersistenceError::OrganizationNotFound` if no such row exists.
pub fn delete_organization(
    conn: &mut _,
    organization_id: i64,
) -> Result<(), PersistenceError> {
    let affected: usize =
        diesel::delete(organizations::table.find(organization_id)).execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::OrganizationNotFound(organization_id));
    }
    debug!(organization_id, "Deleted organization");
    Ok(())
}
}
