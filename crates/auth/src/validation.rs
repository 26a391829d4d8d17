//! Input checks for account fields.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::AuthError;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex")
});

static USERNAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("username regex"));

pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if email.len() > 255 || !EMAIL.is_match(email) {
        return Err(AuthError::Validation("Invalid email format".into()));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), AuthError> {
    if username.len() < 3 || username.len() > 50 {
        return Err(AuthError::Validation(
            "Username must be between 3 and 50 characters long".into(),
        ));
    }
    if !USERNAME.is_match(username) {
        return Err(AuthError::Validation(
            "Username can only contain letters, numbers, dots, underscores and hyphens".into(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < 6 {
        return Err(AuthError::Validation(
            "Password must be at least 6 characters long".into(),
        ));
    }
    if password.len() > 128 {
        return Err(AuthError::Validation(
            "Password must be less than 128 characters long".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(validate_email("admin@rental.com").is_ok());
        assert!(validate_email("tenant.one+home@mail.co.in").is_ok());

        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@rental.com").is_err());
        assert!(validate_email("x@").is_err());
    }

    #[test]
    fn username_validation() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("flat_101.a").is_ok());

        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"u".repeat(51)).is_err());
    }

    #[test]
    fn password_validation() {
        assert!(validate_password("admin123").is_ok());
        assert!(validate_password("12345").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }
}
