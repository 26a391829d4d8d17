use rentease_auth::AuthError;
use rentease_database::{DatabaseError, TransitionError};
use rentease_payments::PaymentError;

use crate::ApiError;

#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    Forbidden(String),
    BadRequest(String),
    Conflict(String),
    Database(DatabaseError),
    Auth(AuthError),
    Gateway(String),
    Internal(String),
}

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg)
            | ServiceError::Forbidden(msg)
            | ServiceError::BadRequest(msg)
            | ServiceError::Conflict(msg)
            | ServiceError::Gateway(msg)
            | ServiceError::Internal(msg) => f.write_str(msg),
            ServiceError::Database(err) => write!(f, "{err}"),
            ServiceError::Auth(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            ServiceError::BadRequest(msg) => ApiError::bad_request(msg),
            ServiceError::Conflict(msg) => ApiError::conflict(msg),
            ServiceError::Database(db_err) => {
                tracing::error!("Database error: {}", db_err);
                ApiError::internal_server_error("Database operation failed")
            }
            ServiceError::Auth(auth_err) => ApiError::from(auth_err),
            ServiceError::Gateway(msg) => {
                tracing::error!("Payment gateway error: {}", msg);
                ApiError::bad_gateway(msg)
            }
            ServiceError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ApiError::internal_server_error("Internal server error")
            }
        }
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(entity) => Self::NotFound(format!("{entity} not found")),
            DatabaseError::Duplicate(msg) | DatabaseError::Conflict(msg) => Self::Conflict(msg),
            DatabaseError::ValidationError(msg) => Self::BadRequest(msg),
            other => Self::Database(other),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(DatabaseError::Query(err))
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl From<TransitionError> for ServiceError {
    fn from(err: TransitionError) -> Self {
        Self::Conflict(err.to_string())
    }
}

impl From<PaymentError> for ServiceError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidAmount => Self::BadRequest(err.to_string()),
            PaymentError::InvalidSignature => Self::BadRequest("Payment verification failed".into()),
            PaymentError::Http(_) | PaymentError::Response(_) => Self::Gateway(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn repository_errors_keep_their_meaning() {
        let conflict = ApiError::from(ServiceError::from(DatabaseError::Conflict(
            "Room is already occupied".into(),
        )));
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.message, "Room is already occupied");

        let missing = ApiError::from(ServiceError::from(DatabaseError::NotFound("Bill")));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.message, "Bill not found");

        let invalid = ApiError::from(ServiceError::from(DatabaseError::ValidationError(
            "Cannot delete occupied room".into(),
        )));
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn query_failures_hide_details() {
        let error = ApiError::from(ServiceError::from(sqlx::Error::RowNotFound));
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message, "Database operation failed");
    }
}
