//! Account registration, password login and bearer-token validation.

use chrono::{DateTime, Utc};
use rentease_config::AuthConfig;
use rentease_database::{DatabaseError, NewUser, User, UserRepository, UserRole};
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

pub mod password;
pub mod token;
pub mod validation;

pub use token::{Claims, TokenIssuer};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@rental.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Clone)]
pub struct Authenticator {
    users: UserRepository,
    tokens: TokenIssuer,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    UserExists(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Token is invalid")]
    InvalidToken,
    #[error("Token has expired")]
    TokenExpired,
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(DatabaseError),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
    #[error("token encoding failed: {0}")]
    TokenEncoding(#[from] jsonwebtoken::errors::Error),
}

impl From<DatabaseError> for AuthError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::Duplicate(message) => AuthError::UserExists(message),
            other => AuthError::Database(other),
        }
    }
}

/// A freshly issued bearer token and the account it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Fields accepted when creating an account.
#[derive(Debug, Clone)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: UserRole,
}

impl Authenticator {
    pub fn new(pool: SqlitePool, config: &AuthConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens: TokenIssuer::new(config.jwt_secret.as_deref(), config.token_ttl_seconds),
        }
    }

    /// Validates the fields and hashes the password into a [`NewUser`]
    /// without touching the database. Used by callers that insert the
    /// account inside their own transaction.
    pub fn prepare_account(&self, registration: &Registration<'_>) -> Result<NewUser, AuthError> {
        let username = registration.username.trim();
        let email = registration.email.trim();
        validation::validate_username(username)?;
        validation::validate_email(email)?;
        validation::validate_password(registration.password)?;

        Ok(NewUser {
            username: username.to_owned(),
            email: email.to_owned(),
            password_hash: password::hash_password(registration.password)?,
            role: registration.role,
        })
    }

    pub async fn register(&self, registration: &Registration<'_>) -> Result<User, AuthError> {
        let new_user = self.prepare_account(registration)?;
        let user = self.users.create(&new_user).await?;
        info!(user_id = user.id, username = %user.username, role = %user.role, "account registered");
        Ok(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession, AuthError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !password::verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let (token, expires_at) = self.tokens.issue(user.id, user.role.as_str())?;
        Ok(AuthSession {
            token,
            expires_at,
            user,
        })
    }

    /// Resolves a bearer token to the current account. The role comes from
    /// the database so demotions apply to tokens already issued.
    pub async fn authenticate_token(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.validate(token)?;
        let user_id: i64 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    /// Creates the default admin account unless a user with that name
    /// exists. Returns `true` when an account was created.
    pub async fn ensure_default_admin(&self, password: Option<&str>) -> Result<bool, AuthError> {
        if self
            .users
            .find_by_username(DEFAULT_ADMIN_USERNAME)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        self.register(&Registration {
            username: DEFAULT_ADMIN_USERNAME,
            email: DEFAULT_ADMIN_EMAIL,
            password: password.unwrap_or(DEFAULT_ADMIN_PASSWORD),
            role: UserRole::Admin,
        })
        .await?;
        Ok(true)
    }

    pub async fn reset_password(&self, username: &str, new_password: &str) -> Result<(), AuthError> {
        validation::validate_password(new_password)?;
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AuthError::Database(DatabaseError::NotFound("User")))?;
        let hash = password::hash_password(new_password)?;
        self.users.update_password(user.id, &hash).await?;
        info!(user_id = user.id, "password reset");
        Ok(())
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }
}
