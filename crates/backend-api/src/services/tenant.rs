use chrono::NaiveDate;
use rentease_auth::{Authenticator, Registration};
use rentease_database::{
    NewTenant, Tenant, TenantChanges, TenantListing, TenantProfile, TenantRepository, User,
    UserRole,
};
use sqlx::SqlitePool;
use tracing::info;

use super::access::Caller;
use super::error::ServiceError;
use super::{non_negative, required};
use crate::routes::tenants::{CreateTenantRequest, MyDocumentsResponse, UpdateTenantRequest};
use crate::storage::{UploadDir, UploadStore, UploadedFile};
use crate::util::non_blank;

pub async fn list_tenants(pool: &SqlitePool) -> Result<Vec<TenantListing>, ServiceError> {
    Ok(TenantRepository::new(pool.clone()).list().await?)
}

/// Creates the tenant's login account and tenant record in one
/// transaction, occupying the chosen room.
pub async fn create_tenant(
    pool: &SqlitePool,
    authenticator: &Authenticator,
    req: CreateTenantRequest,
) -> Result<(Tenant, User), ServiceError> {
    check_lease(req.lease_start_date, req.lease_end_date)?;

    let account = authenticator.prepare_account(&Registration {
        username: &req.username,
        email: &req.email,
        password: &req.password,
        role: UserRole::Tenant,
    })?;

    let new_tenant = NewTenant {
        room_id: req.room_id,
        full_name: required(&req.full_name, "full_name")?,
        phone: non_blank(req.phone),
        email: Some(account.email.clone()),
        id_proof_type: non_blank(req.id_proof_type),
        id_proof_number: non_blank(req.id_proof_number),
        lease_start_date: req.lease_start_date,
        lease_end_date: req.lease_end_date,
        deposit_amount: req
            .deposit_amount
            .map(|amount| non_negative(amount, "deposit_amount"))
            .transpose()?,
        emergency_contact_name: non_blank(req.emergency_contact_name),
        emergency_contact_phone: non_blank(req.emergency_contact_phone),
    };

    Ok(TenantRepository::new(pool.clone())
        .create_with_account(&account, &new_tenant)
        .await?)
}

pub async fn update_tenant(
    pool: &SqlitePool,
    tenant_id: i64,
    req: UpdateTenantRequest,
) -> Result<Tenant, ServiceError> {
    let tenants = TenantRepository::new(pool.clone());
    let current = tenants
        .find_by_id(tenant_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tenant not found"))?;
    // A single date is checked against the stored other half.
    check_lease(
        req.lease_start_date.or(current.lease_start_date),
        req.lease_end_date.or(current.lease_end_date),
    )?;

    let changes = TenantChanges {
        room_id: req.room_id,
        full_name: req
            .full_name
            .map(|name| required(&name, "full_name"))
            .transpose()?,
        phone: req.phone,
        email: req.email,
        id_proof_type: req.id_proof_type,
        id_proof_number: req.id_proof_number,
        lease_start_date: req.lease_start_date,
        lease_end_date: req.lease_end_date,
        deposit_amount: req
            .deposit_amount
            .map(|amount| non_negative(amount, "deposit_amount"))
            .transpose()?,
        emergency_contact_name: req.emergency_contact_name,
        emergency_contact_phone: req.emergency_contact_phone,
    };

    Ok(tenants.update(tenant_id, &changes).await?)
}

fn check_lease(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), ServiceError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ServiceError::bad_request(
            "lease_end_date cannot be before lease_start_date",
        )),
        _ => Ok(()),
    }
}

/// Frees the room, removes the login account and, through the cascade,
/// the tenant's bills and complaints.
pub async fn delete_tenant(
    pool: &SqlitePool,
    uploads: &UploadStore,
    tenant_id: i64,
) -> Result<(), ServiceError> {
    let removed = TenantRepository::new(pool.clone()).delete(tenant_id).await?;
    for path in removed.stored_files() {
        uploads.remove(path).await;
    }
    info!(tenant_id, user_id = removed.tenant.user_id, "tenant deleted");
    Ok(())
}

pub async fn add_documents(
    pool: &SqlitePool,
    uploads: &UploadStore,
    tenant_id: i64,
    files: Vec<UploadedFile>,
) -> Result<Vec<String>, ServiceError> {
    let tenants = TenantRepository::new(pool.clone());
    if tenants.find_by_id(tenant_id).await?.is_none() {
        return Err(ServiceError::not_found("Tenant not found"));
    }

    let prefix = format!("tenant_{tenant_id}_");
    let mut stored = Vec::with_capacity(files.len());
    for file in &files {
        let path = uploads
            .save(UploadDir::TenantDocs, &prefix, file)
            .await
            .map_err(|e| ServiceError::internal(format!("failed to store document: {e}")))?;
        stored.push(path);
    }

    Ok(tenants.append_documents(tenant_id, &stored).await?)
}

/// Replaces the tenant's photo and returns the stored path.
pub async fn set_photo(
    pool: &SqlitePool,
    uploads: &UploadStore,
    tenant_id: i64,
    file: UploadedFile,
) -> Result<String, ServiceError> {
    let tenants = TenantRepository::new(pool.clone());
    let tenant = tenants
        .find_by_id(tenant_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tenant not found"))?;

    let path = uploads
        .save(UploadDir::TenantPhotos, &format!("tenant_{tenant_id}_"), &file)
        .await
        .map_err(|e| ServiceError::internal(format!("failed to store photo: {e}")))?;
    tenants.set_photo(tenant_id, &path).await?;

    if let Some(previous) = tenant.photo_path {
        uploads.remove(&previous).await;
    }

    Ok(path)
}

pub async fn my_profile(pool: &SqlitePool, caller: &Caller) -> Result<TenantProfile, ServiceError> {
    let tenant = caller.require_tenant()?;
    TenantRepository::new(pool.clone())
        .profile(tenant.id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tenant not found"))
}

pub fn my_documents(caller: &Caller) -> Result<MyDocumentsResponse, ServiceError> {
    let tenant = caller.require_tenant()?;
    Ok(MyDocumentsResponse {
        documents: tenant.documents.0.clone(),
        photo: tenant.photo_path.clone(),
        deposit_amount: tenant.deposit_amount,
        full_name: tenant.full_name.clone(),
        id_proof_type: tenant.id_proof_type.clone(),
        id_proof_number: tenant.id_proof_number.clone(),
    })
}
