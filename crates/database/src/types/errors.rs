//! Error types for the database layer

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("Stored value could not be decoded: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database query error: {0}")]
    Query(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Maps unique-constraint violations to [`DatabaseError::Duplicate`] with
    /// the given message and passes every other error through.
    pub fn unique_violation(error: sqlx::Error, message: impl Into<String>) -> Self {
        match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Duplicate(message.into())
            }
            _ => Self::Query(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_pass_through() {
        let error = DatabaseError::unique_violation(sqlx::Error::RowNotFound, "duplicate");
        assert!(matches!(error, DatabaseError::Query(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(DatabaseError::NotFound("Bill").to_string(), "Bill not found");
    }
}
