pub mod access;
pub mod announcement;
pub mod auth;
pub mod bill;
pub mod building;
pub mod complaint;
pub mod dashboard;
pub mod emergency_contact;
pub mod error;
pub mod payment;
pub mod payment_settings;
pub mod room;
pub mod tenant;

pub use access::{Caller, ListScope};
pub use error::*;

/// Trims a required text field, rejecting blanks with `"<field> is required"`.
pub(crate) fn required(value: &str, field: &str) -> Result<String, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::bad_request(format!("{field} is required")));
    }
    Ok(value.to_string())
}

pub(crate) fn non_negative(value: f64, field: &str) -> Result<f64, ServiceError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ServiceError::bad_request(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(value)
}
