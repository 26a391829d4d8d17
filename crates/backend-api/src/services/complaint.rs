use rentease_database::{Complaint, ComplaintListing, ComplaintRepository, ComplaintStatus};
use sqlx::SqlitePool;
use tracing::info;

use super::access::{Caller, ListScope};
use super::error::ServiceError;
use super::required;
use crate::routes::complaints::{CreateComplaintRequest, ReplyComplaintRequest};

/// Admins see every complaint, tenants only their own.
pub async fn list_complaints(
    pool: &SqlitePool,
    caller: &Caller,
) -> Result<Vec<ComplaintListing>, ServiceError> {
    let tenant_id = match caller.list_scope() {
        ListScope::All => None,
        ListScope::Tenant(own) => Some(own),
        ListScope::Nothing => return Ok(Vec::new()),
    };
    Ok(ComplaintRepository::new(pool.clone()).list(tenant_id).await?)
}

pub async fn create_complaint(
    pool: &SqlitePool,
    caller: &Caller,
    req: CreateComplaintRequest,
) -> Result<Complaint, ServiceError> {
    let Some(tenant) = caller.tenant.as_ref() else {
        return Err(ServiceError::forbidden("Only tenants can create complaints"));
    };

    let subject = required(&req.subject, "subject")?;
    let description = required(&req.description, "description")?;

    let complaint = ComplaintRepository::new(pool.clone())
        .create(
            tenant.id,
            &subject,
            &description,
            req.category.unwrap_or_default(),
        )
        .await?;
    info!(complaint_id = complaint.id, tenant_id = tenant.id, "complaint filed");
    Ok(complaint)
}

/// Stores the admin reply; the status defaults to `in_progress`.
pub async fn reply_to_complaint(
    pool: &SqlitePool,
    complaint_id: i64,
    req: ReplyComplaintRequest,
) -> Result<Complaint, ServiceError> {
    let reply = required(&req.reply, "reply")?;
    let status = req.status.unwrap_or(ComplaintStatus::InProgress);

    Ok(ComplaintRepository::new(pool.clone())
        .reply(complaint_id, &reply, status)
        .await?)
}

pub async fn close_complaint(pool: &SqlitePool, complaint_id: i64) -> Result<Complaint, ServiceError> {
    let complaint = ComplaintRepository::new(pool.clone()).close(complaint_id).await?;
    info!(complaint_id, "complaint closed");
    Ok(complaint)
}
