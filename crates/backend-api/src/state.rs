use std::sync::Arc;

use axum::http::HeaderMap;
use rentease_auth::Authenticator;
use rentease_config::{AppConfig, BillingConfig};
use rentease_database::{TenantRepository, User, UserRole};
use rentease_payments::{mailer_from_config, MailError, Mailer, PaymentGateway};
use sqlx::SqlitePool;

use crate::services::Caller;
use crate::storage::UploadStore;
use crate::util::require_bearer;
use crate::ApiError;

#[derive(Clone)]
pub struct AppState {
    db_pool: SqlitePool,
    authenticator: Authenticator,
    gateway: Arc<PaymentGateway>,
    mailer: Arc<dyn Mailer>,
    uploads: UploadStore,
    billing: BillingConfig,
    max_body_bytes: usize,
}

impl AppState {
    pub fn new(
        db_pool: SqlitePool,
        authenticator: Authenticator,
        config: &AppConfig,
    ) -> Result<Self, MailError> {
        Ok(Self {
            db_pool,
            authenticator,
            gateway: Arc::new(PaymentGateway::from_config(&config.payments)),
            mailer: mailer_from_config(&config.mail)?,
            uploads: UploadStore::new(&config.uploads.root),
            billing: config.billing.clone(),
            max_body_bytes: config.uploads.max_body_bytes,
        })
    }

    /// Swaps the notification transport, mainly for tests.
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    pub fn db_pool(&self) -> &SqlitePool {
        &self.db_pool
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn gateway(&self) -> &PaymentGateway {
        &self.gateway
    }

    pub fn mailer(&self) -> Arc<dyn Mailer> {
        Arc::clone(&self.mailer)
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }

    pub fn billing(&self) -> &BillingConfig {
        &self.billing
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub async fn authenticate(&self, token: &str) -> Result<User, ApiError> {
        self.authenticator
            .authenticate_token(token)
            .await
            .map_err(ApiError::from)
    }

    /// Resolves the bearer token to the calling account and, for tenant
    /// accounts, the tenant record linked to it.
    pub async fn caller(&self, headers: &HeaderMap) -> Result<Caller, ApiError> {
        let token = require_bearer(headers)?;
        let user = self.authenticate(&token).await?;

        let tenant = match user.role {
            UserRole::Admin => None,
            UserRole::Tenant => TenantRepository::new(self.db_pool.clone())
                .find_by_user(user.id)
                .await
                .map_err(|e| ApiError::from(crate::services::ServiceError::from(e)))?,
        };

        Ok(Caller { user, tenant })
    }

    /// Like [`AppState::caller`] but a missing or invalid token yields `None`.
    pub async fn optional_caller(&self, headers: &HeaderMap) -> Option<User> {
        let token = require_bearer(headers).ok()?;
        self.authenticator.authenticate_token(&token).await.ok()
    }
}
