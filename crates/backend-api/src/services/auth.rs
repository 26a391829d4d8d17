use rentease_auth::{AuthSession, Authenticator, Registration};
use rentease_database::{User, UserRole};
use tracing::warn;

use super::error::ServiceError;
use crate::routes::auth::{LoginRequest, RegisterRequest};

/// Self-service registration creates tenant accounts. Only an
/// authenticated admin can create another admin.
pub async fn register(
    authenticator: &Authenticator,
    requested_by: Option<&User>,
    req: RegisterRequest,
) -> Result<User, ServiceError> {
    let caller_is_admin = requested_by.is_some_and(|user| user.role == UserRole::Admin);

    let role = match req.role {
        Some(UserRole::Admin) if caller_is_admin => UserRole::Admin,
        Some(UserRole::Admin) => {
            warn!(username = %req.username, "admin role requested without admin credentials, registering as tenant");
            UserRole::Tenant
        }
        _ => UserRole::Tenant,
    };

    let user = authenticator
        .register(&Registration {
            username: &req.username,
            email: &req.email,
            password: &req.password,
            role,
        })
        .await?;

    Ok(user)
}

pub async fn login(
    authenticator: &Authenticator,
    req: LoginRequest,
) -> Result<AuthSession, ServiceError> {
    Ok(authenticator.login(&req.username, &req.password).await?)
}
