// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A uniqueness constraint rejected a write.
    ///
    /// During allocation this signals that a concurrent writer committed the
    /// same sequence number or button code first; the allocator retries the
    /// whole unit of work on it.
    UniqueViolation(String),
    /// A foreign key constraint rejected a write.
    ForeignKeyViolation(String),
    /// The requested organization was not found.
    OrganizationNotFound(i64),
    /// The requested victim profile was not found.
    VictimProfileNotFound(i64),
    /// The requested scenario was not found.
    ScenarioNotFound(i64),
    /// The requested assignment was not found.
    AssignmentNotFound(i64),
    /// The assignment already carries an issued number.
    AssignmentAlreadyNumbered {
        /// The assignment identifier.
        assignment_id: i64,
    },
    /// Organization cannot be deleted because assignments reference it.
    OrganizationReferenced {
        /// The organization identifier.
        organization_id: i64,
    },
    /// The allocation unit of work failed before writing.
    AllocationFailed(String),
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::UniqueViolation(msg) => write!(f, "Uniqueness constraint violated: {msg}"),
            Self::ForeignKeyViolation(msg) => {
                write!(f, "Foreign key constraint violated: {msg}")
            }
            Self::OrganizationNotFound(id) => write!(f, "Organization not found: {id}"),
            Self::VictimProfileNotFound(id) => write!(f, "Victim profile not found: {id}"),
            Self::ScenarioNotFound(id) => write!(f, "Scenario not found: {id}"),
            Self::AssignmentNotFound(id) => write!(f, "Assignment not found: {id}"),
            Self::AssignmentAlreadyNumbered { assignment_id } => {
                write!(
                    f,
                    "Assignment {assignment_id} already carries an issued number"
                )
            }
            Self::OrganizationReferenced { organization_id } => {
                write!(
                    f,
                    "Organization {organization_id} cannot be deleted: assignments reference it"
                )
            }
            Self::AllocationFailed(msg) => write!(f, "Allocation failed: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => Self::UniqueViolation(info.message().to_string()),
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                info,
            ) => Self::ForeignKeyViolation(info.message().to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}
