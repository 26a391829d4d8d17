use rentease_database::{Tenant, User, UserRole};

use super::error::ServiceError;

/// The authenticated account behind a request.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user: User,
    /// Linked tenant record; always `None` for admins.
    pub tenant: Option<Tenant>,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.user.role == UserRole::Admin
    }

    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::forbidden("Admin access required"))
        }
    }

    pub fn require_tenant(&self) -> Result<&Tenant, ServiceError> {
        self.tenant
            .as_ref()
            .ok_or_else(|| ServiceError::forbidden("Not a tenant"))
    }

    pub fn tenant_id(&self) -> Option<i64> {
        self.tenant.as_ref().map(|tenant| tenant.id)
    }

    /// Admins reach every tenant; tenants only their own record.
    pub fn ensure_owner(&self, tenant_id: i64) -> Result<(), ServiceError> {
        if self.is_admin() || self.tenant_id() == Some(tenant_id) {
            Ok(())
        } else {
            Err(ServiceError::forbidden("Unauthorized"))
        }
    }

    pub fn list_scope(&self) -> ListScope {
        match (self.is_admin(), self.tenant_id()) {
            (true, _) => ListScope::All,
            (false, Some(tenant_id)) => ListScope::Tenant(tenant_id),
            (false, None) => ListScope::Nothing,
        }
    }
}

/// Which rows a list endpoint may return to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All,
    Tenant(i64),
    /// Tenant account with no tenant record.
    Nothing,
}
