use axum::{extract::State, http::HeaderMap, Json};

use super::today;
use crate::{
    services::dashboard::{self as dashboard_service, DashboardStats},
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Occupancy, billing and complaint totals", body = DashboardStats),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    )
)]
pub async fn stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardStats>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    Ok(Json(dashboard_service::stats(state.db_pool(), today()).await?))
}
