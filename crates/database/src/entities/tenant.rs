use chrono::NaiveDate;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Tenant {
    pub id: i64,
    pub user_id: i64,
    pub room_id: Option<i64>,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub id_proof_type: Option<String>,
    pub id_proof_number: Option<String>,
    pub photo_path: Option<String>,
    #[schema(value_type = Vec<String>)]
    pub documents: Json<Vec<String>>,
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
    pub deposit_amount: Option<f64>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub created_at: String,
}

/// A deleted tenant and the bill screenshots that went with it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedTenant {
    pub tenant: Tenant,
    pub bill_screenshots: Vec<String>,
}

impl RemovedTenant {
    /// Upload paths no longer referenced by any row.
    pub fn stored_files(&self) -> impl Iterator<Item = &str> {
        self.tenant
            .photo_path
            .as_deref()
            .into_iter()
            .chain(self.tenant.documents.iter().map(String::as_str))
            .chain(self.bill_screenshots.iter().map(String::as_str))
    }
}

/// Tenant joined with its login name and current room.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct TenantListing {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub room_id: Option<i64>,
    pub room_number: Option<String>,
    pub building_name: Option<String>,
    pub rent_amount: Option<f64>,
    pub id_proof_type: Option<String>,
    pub id_proof_number: Option<String>,
    pub photo_path: Option<String>,
    #[schema(value_type = Vec<String>)]
    pub documents: Json<Vec<String>>,
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
    pub deposit_amount: Option<f64>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub created_at: String,
}

/// A tenant's own view of where they live.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct TenantProfile {
    pub id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_path: Option<String>,
    pub room_number: Option<String>,
    pub building_name: Option<String>,
    pub floor_number: Option<i64>,
    pub room_type: Option<String>,
    pub rent_amount: Option<f64>,
    pub deposit_amount: Option<f64>,
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
    pub id_proof_type: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    #[schema(value_type = Vec<String>)]
    pub documents: Json<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewTenant {
    pub room_id: Option<i64>,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub id_proof_type: Option<String>,
    pub id_proof_number: Option<String>,
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
    pub deposit_amount: Option<f64>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
}

/// Profile edits. `room_id` of `Some(None)` vacates the current room,
/// `Some(Some(id))` moves the tenant, `None` leaves the assignment alone.
#[derive(Debug, Clone, Default)]
pub struct TenantChanges {
    pub room_id: Option<Option<i64>>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub id_proof_type: Option<String>,
    pub id_proof_number: Option<String>,
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
    pub deposit_amount: Option<f64>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
}
