use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use utoipa::ToSchema;

use super::error::ServiceError;

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct DashboardStats {
    pub total_buildings: i64,
    pub total_rooms: i64,
    pub occupied_rooms: i64,
    pub vacant_rooms: i64,
    pub total_tenants: i64,
    pub pending_bills: i64,
    pub pending_approval_bills: i64,
    pub open_complaints: i64,
    /// Rent billed for the current month.
    pub monthly_revenue: f64,
    /// Payments received during the current month.
    pub collected_revenue: f64,
}

pub async fn stats(pool: &SqlitePool, today: NaiveDate) -> Result<DashboardStats, ServiceError> {
    let month = today.format("%Y-%m").to_string();

    let stats = sqlx::query_as::<_, DashboardStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM buildings) AS total_buildings,
            (SELECT COUNT(*) FROM rooms) AS total_rooms,
            (SELECT COUNT(*) FROM rooms WHERE status = 'occupied') AS occupied_rooms,
            (SELECT COUNT(*) FROM rooms WHERE status = 'vacant') AS vacant_rooms,
            (SELECT COUNT(*) FROM tenants) AS total_tenants,
            (SELECT COUNT(*) FROM bills WHERE status IN ('pending', 'overdue')) AS pending_bills,
            (SELECT COUNT(*) FROM bills WHERE status = 'pending_approval') AS pending_approval_bills,
            (SELECT COUNT(*) FROM complaints WHERE status IN ('open', 'in_progress')) AS open_complaints,
            (SELECT CAST(COALESCE(SUM(amount), 0) AS REAL) FROM bills
                WHERE bill_type = 'rent' AND billing_month = ?1) AS monthly_revenue,
            (SELECT CAST(COALESCE(SUM(amount), 0) AS REAL) FROM bills
                WHERE status = 'paid' AND substr(paid_date, 1, 7) = ?1) AS collected_revenue
        "#,
    )
    .bind(&month)
    .fetch_one(pool)
    .await?;

    Ok(stats)
}
