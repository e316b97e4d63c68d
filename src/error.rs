//! Error types for the marketplace core.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwiggyError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Insufficient stock for food {food_id}: requested {requested}, available {available}")]
    InsufficientStock {
        food_id: i64,
        requested: i32,
        available: i32,
    },
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Password hash error: {0}")]
    PasswordHash(String),
    #[error("Seed error: {0}")]
    Seed(String),
}

impl SwiggyError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<sqlx::Error> for SwiggyError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // SQLSTATE class 23: integrity constraint violations
            match db_err.code().as_deref() {
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("unique constraint");
                    return SwiggyError::Conflict(format!("duplicate value violates {constraint}"));
                }
                Some("23503") => {
                    let constraint = db_err.constraint().unwrap_or("foreign key");
                    return SwiggyError::Validation(format!("reference violates {constraint}"));
                }
                Some("23514") => {
                    let constraint = db_err.constraint().unwrap_or("check constraint");
                    return SwiggyError::Validation(format!("value violates {constraint}"));
                }
                _ => {}
            }
        }
        SwiggyError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for SwiggyError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        SwiggyError::Database(format!("migration failed: {err}"))
    }
}

impl From<validator::ValidationErrors> for SwiggyError {
    fn from(errors: validator::ValidationErrors) -> Self {
        SwiggyError::Validation(crate::validation::describe(&errors))
    }
}

impl From<::config::ConfigError> for SwiggyError {
    fn from(err: ::config::ConfigError) -> Self {
        SwiggyError::Configuration(err.to_string())
    }
}

pub type SwiggyResult<T> = Result<T, SwiggyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SwiggyError::not_found("food", 7);
        assert_eq!(err.to_string(), "food 7 not found");
        assert!(err.is_not_found());

        let err = SwiggyError::InsufficientStock {
            food_id: 3,
            requested: 5,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for food 3: requested 5, available 2"
        );
    }

    #[test]
    fn test_row_not_found_maps_to_database_error() {
        let err: SwiggyError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, SwiggyError::Database(_)));
    }
}
