//! Bill storage. Status changes are compare-and-set on the status the
//! caller validated, so two racing transitions cannot both win.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

use super::timestamp;
use crate::entities::{
    Bill, BillFilter, BillListing, BillStatus, NewBill, PaymentMethod, ReceiptRow, RentRun,
};
use crate::types::{DatabaseError, DatabaseResult};

const BILL_COLUMNS: &str = "id, tenant_id, bill_type, amount, billing_month, due_date, paid_date, \
    status, payment_screenshot, payment_method, gateway_order_id, gateway_payment_id, created_at";

#[derive(Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &BillFilter) -> DatabaseResult<Vec<BillListing>> {
        let bills = sqlx::query_as::<_, BillListing>(
            r#"
            SELECT bl.id, bl.tenant_id, t.full_name AS tenant_name, r.room_number, bl.bill_type,
                   bl.amount, bl.billing_month, bl.due_date, bl.paid_date, bl.status,
                   bl.payment_screenshot, bl.payment_method, bl.created_at
            FROM bills bl
            JOIN tenants t ON t.id = bl.tenant_id
            LEFT JOIN rooms r ON r.id = t.room_id
            WHERE (?1 IS NULL OR bl.tenant_id = ?1)
              AND (?2 IS NULL OR bl.status = ?2)
            ORDER BY bl.due_date DESC, bl.id DESC
            "#,
        )
        .bind(filter.tenant_id)
        .bind(filter.status)
        .fetch_all(&self.pool)
        .await?;
        Ok(bills)
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Bill>> {
        let bill = sqlx::query_as::<_, Bill>(&format!("SELECT {BILL_COLUMNS} FROM bills WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(bill)
    }

    pub async fn create(&self, new_bill: &NewBill) -> DatabaseResult<Bill> {
        let tenant_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tenants WHERE id = ?)")
                .bind(new_bill.tenant_id)
                .fetch_one(&self.pool)
                .await?;
        if !tenant_exists {
            return Err(DatabaseError::NotFound("Tenant"));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO bills (tenant_id, bill_type, amount, billing_month, due_date, status, created_at)
            VALUES (?, ?, ?, ?, ?, 'pending', ?)
            "#,
        )
        .bind(new_bill.tenant_id)
        .bind(new_bill.bill_type)
        .bind(new_bill.amount)
        .bind(&new_bill.billing_month)
        .bind(new_bill.due_date)
        .bind(timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::unique_violation(e, "A rent bill for this tenant and month already exists")
        })?;

        self.find_by_id(result.last_insert_rowid())
            .await?
            .ok_or(DatabaseError::NotFound("Bill"))
    }

    /// Deletes the bill and returns the removed row.
    pub async fn delete(&self, id: i64) -> DatabaseResult<Bill> {
        sqlx::query_as::<_, Bill>(&format!("DELETE FROM bills WHERE id = ? RETURNING {BILL_COLUMNS}"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound("Bill"))
    }

    /// Stores the evidence path and moves the bill to `pending_approval`.
    pub async fn record_screenshot(
        &self,
        id: i64,
        expected: BillStatus,
        path: &str,
    ) -> DatabaseResult<Bill> {
        let result = sqlx::query(
            r#"
            UPDATE bills
            SET status = 'pending_approval', payment_screenshot = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(path)
        .bind(id)
        .bind(expected)
        .execute(&self.pool)
        .await?;
        self.after_transition(id, result.rows_affected()).await
    }

    /// Marks the bill paid.
    pub async fn settle(
        &self,
        id: i64,
        expected: BillStatus,
        method: PaymentMethod,
        paid_date: NaiveDate,
        gateway_payment_id: Option<&str>,
    ) -> DatabaseResult<Bill> {
        let result = sqlx::query(
            r#"
            UPDATE bills
            SET status = 'paid',
                paid_date = ?,
                payment_method = ?,
                gateway_payment_id = COALESCE(?, gateway_payment_id)
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(paid_date)
        .bind(method)
        .bind(gateway_payment_id)
        .bind(id)
        .bind(expected)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::unique_violation(e, "Payment is already recorded on another bill"))?;
        let bill = self.after_transition(id, result.rows_affected()).await?;
        info!(bill_id = id, from = %expected, method = ?method, "bill settled");
        Ok(bill)
    }

    /// Sends a rejected submission back to `to` and drops its screenshot.
    pub async fn reopen(&self, id: i64, expected: BillStatus, to: BillStatus) -> DatabaseResult<Bill> {
        let result = sqlx::query(
            r#"
            UPDATE bills
            SET status = ?, payment_screenshot = NULL
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(to)
        .bind(id)
        .bind(expected)
        .execute(&self.pool)
        .await?;
        self.after_transition(id, result.rows_affected()).await
    }

    pub async fn set_gateway_order(&self, id: i64, order_id: &str) -> DatabaseResult<()> {
        let result = sqlx::query(
            "UPDATE bills SET gateway_order_id = ? WHERE id = ? AND status != 'paid'",
        )
        .bind(order_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::Conflict("Bill is already paid".into()));
        }
        Ok(())
    }

    /// Flags every pending bill due before `today`. Returns the count.
    pub async fn mark_overdue(&self, today: NaiveDate) -> DatabaseResult<u64> {
        let result =
            sqlx::query("UPDATE bills SET status = 'overdue' WHERE status = 'pending' AND due_date < ?")
                .bind(today)
                .execute(&self.pool)
                .await?;
        let updated = result.rows_affected();
        info!(updated, %today, "overdue bills flagged");
        Ok(updated)
    }

    /// Issues one rent bill per housed tenant for `billing_month`. Tenants
    /// that already have one for the month are counted as skipped.
    pub async fn generate_rent(
        &self,
        billing_month: &str,
        due_date: NaiveDate,
    ) -> DatabaseResult<RentRun> {
        let mut tx = self.pool.begin().await?;

        let housed: Vec<(i64, f64)> = sqlx::query_as(
            r#"
            SELECT t.id, r.rent_amount
            FROM tenants t
            JOIN rooms r ON r.id = t.room_id
            ORDER BY t.id ASC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let created_at = timestamp();
        let mut run = RentRun {
            created: 0,
            skipped: 0,
        };

        for (tenant_id, rent_amount) in housed {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO bills (tenant_id, bill_type, amount, billing_month, due_date, status, created_at)
                VALUES (?, 'rent', ?, ?, ?, 'pending', ?)
                "#,
            )
            .bind(tenant_id)
            .bind(rent_amount)
            .bind(billing_month)
            .bind(due_date)
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                run.skipped += 1;
            } else {
                run.created += 1;
            }
        }

        tx.commit().await?;
        info!(billing_month, created = run.created, skipped = run.skipped, "rent bills generated");
        Ok(run)
    }

    pub async fn receipt(&self, id: i64) -> DatabaseResult<Option<ReceiptRow>> {
        let row = sqlx::query_as::<_, ReceiptRow>(
            r#"
            SELECT bl.id AS bill_id, bl.tenant_id, t.full_name AS tenant_name, r.room_number,
                   b.name AS building_name, bl.bill_type, bl.amount, bl.billing_month,
                   bl.due_date, bl.paid_date, bl.status, bl.payment_method
            FROM bills bl
            JOIN tenants t ON t.id = bl.tenant_id
            LEFT JOIN rooms r ON r.id = t.room_id
            LEFT JOIN buildings b ON b.id = r.building_id
            WHERE bl.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn after_transition(&self, id: i64, rows_affected: u64) -> DatabaseResult<Bill> {
        let bill = self.find_by_id(id).await?.ok_or(DatabaseError::NotFound("Bill"))?;
        if rows_affected == 0 {
            return Err(DatabaseError::Conflict(format!(
                "Bill status changed to {} before the update was applied",
                bill.status
            )));
        }
        Ok(bill)
    }
}
