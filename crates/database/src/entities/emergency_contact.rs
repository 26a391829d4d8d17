use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct EmergencyContact {
    pub id: i64,
    pub service_type: String,
    pub contact_name: Option<String>,
    pub phone_number: String,
    pub alternate_phone: Option<String>,
    pub available_24x7: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewEmergencyContact {
    pub service_type: String,
    pub contact_name: Option<String>,
    pub phone_number: String,
    pub alternate_phone: Option<String>,
    #[serde(default = "always_available")]
    pub available_24x7: bool,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmergencyContactChanges {
    pub service_type: Option<String>,
    pub contact_name: Option<String>,
    pub phone_number: Option<String>,
    pub alternate_phone: Option<String>,
    pub available_24x7: Option<bool>,
}

fn always_available() -> bool {
    true
}
