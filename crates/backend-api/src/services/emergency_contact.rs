use rentease_database::{
    EmergencyContact, EmergencyContactChanges, EmergencyContactRepository, NewEmergencyContact,
};
use sqlx::SqlitePool;

use super::error::ServiceError;
use super::required;
use crate::util::non_blank;

pub async fn list_contacts(pool: &SqlitePool) -> Result<Vec<EmergencyContact>, ServiceError> {
    Ok(EmergencyContactRepository::new(pool.clone()).list().await?)
}

pub async fn create_contact(
    pool: &SqlitePool,
    req: NewEmergencyContact,
) -> Result<EmergencyContact, ServiceError> {
    let contact = NewEmergencyContact {
        service_type: required(&req.service_type, "service_type")?,
        phone_number: required(&req.phone_number, "phone_number")?,
        contact_name: non_blank(req.contact_name),
        alternate_phone: non_blank(req.alternate_phone),
        available_24x7: req.available_24x7,
    };
    Ok(EmergencyContactRepository::new(pool.clone())
        .create(&contact)
        .await?)
}

pub async fn update_contact(
    pool: &SqlitePool,
    contact_id: i64,
    changes: EmergencyContactChanges,
) -> Result<EmergencyContact, ServiceError> {
    let changes = EmergencyContactChanges {
        service_type: changes
            .service_type
            .map(|kind| required(&kind, "service_type"))
            .transpose()?,
        phone_number: changes
            .phone_number
            .map(|phone| required(&phone, "phone_number"))
            .transpose()?,
        ..changes
    };
    Ok(EmergencyContactRepository::new(pool.clone())
        .update(contact_id, &changes)
        .await?)
}

pub async fn delete_contact(pool: &SqlitePool, contact_id: i64) -> Result<(), ServiceError> {
    Ok(EmergencyContactRepository::new(pool.clone())
        .delete(contact_id)
        .await?)
}
