use sqlx::SqlitePool;

use crate::entities::{EmergencyContact, EmergencyContactChanges, NewEmergencyContact};
use crate::types::{DatabaseError, DatabaseResult};

/// Service numbers seeded on first start.
const DEFAULT_CONTACTS: &[(&str, Option<&str>, &str)] = &[
    ("Police", None, "100"),
    ("Fire", None, "101"),
    ("Ambulance", None, "102"),
    ("Electrician", Some("Local Electrician"), "9876543210"),
    ("Plumber", Some("Local Plumber"), "9876543211"),
];

#[derive(Clone)]
pub struct EmergencyContactRepository {
    pool: SqlitePool,
}

impl EmergencyContactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> DatabaseResult<Vec<EmergencyContact>> {
        let contacts = sqlx::query_as::<_, EmergencyContact>(
            "SELECT id, service_type, contact_name, phone_number, alternate_phone, available_24x7 \
             FROM emergency_contacts ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(contacts)
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<EmergencyContact>> {
        let contact = sqlx::query_as::<_, EmergencyContact>(
            "SELECT id, service_type, contact_name, phone_number, alternate_phone, available_24x7 \
             FROM emergency_contacts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(contact)
    }

    pub async fn create(&self, contact: &NewEmergencyContact) -> DatabaseResult<EmergencyContact> {
        let result = sqlx::query(
            r#"
            INSERT INTO emergency_contacts (service_type, contact_name, phone_number, alternate_phone, available_24x7)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&contact.service_type)
        .bind(&contact.contact_name)
        .bind(&contact.phone_number)
        .bind(&contact.alternate_phone)
        .bind(contact.available_24x7)
        .execute(&self.pool)
        .await?;

        Ok(EmergencyContact {
            id: result.last_insert_rowid(),
            service_type: contact.service_type.clone(),
            contact_name: contact.contact_name.clone(),
            phone_number: contact.phone_number.clone(),
            alternate_phone: contact.alternate_phone.clone(),
            available_24x7: contact.available_24x7,
        })
    }

    pub async fn update(
        &self,
        id: i64,
        changes: &EmergencyContactChanges,
    ) -> DatabaseResult<EmergencyContact> {
        let result = sqlx::query(
            r#"
            UPDATE emergency_contacts
            SET service_type = COALESCE(?, service_type),
                contact_name = COALESCE(?, contact_name),
                phone_number = COALESCE(?, phone_number),
                alternate_phone = COALESCE(?, alternate_phone),
                available_24x7 = COALESCE(?, available_24x7)
            WHERE id = ?
            "#,
        )
        .bind(&changes.service_type)
        .bind(&changes.contact_name)
        .bind(&changes.phone_number)
        .bind(&changes.alternate_phone)
        .bind(changes.available_24x7)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Emergency contact"));
        }
        self.find_by_id(id)
            .await?
            .ok_or(DatabaseError::NotFound("Emergency contact"))
    }

    pub async fn delete(&self, id: i64) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM emergency_contacts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Emergency contact"));
        }
        Ok(())
    }

    /// Inserts the default service numbers when the table is empty.
    /// Returns how many rows were added.
    pub async fn seed_defaults(&self) -> DatabaseResult<u64> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM emergency_contacts")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        for (service_type, contact_name, phone_number) in DEFAULT_CONTACTS {
            sqlx::query(
                "INSERT INTO emergency_contacts (service_type, contact_name, phone_number, available_24x7) \
                 VALUES (?, ?, ?, 1)",
            )
            .bind(*service_type)
            .bind(*contact_name)
            .bind(*phone_number)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(DEFAULT_CONTACTS.len() as u64)
    }
}
