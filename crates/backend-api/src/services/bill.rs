//! Bill issuing and the payment-confirmation workflow.
//!
//! Every status change is validated with [`BillStatus::apply`] and then
//! written as a compare-and-set on the status that was read, so a bill
//! cannot be settled twice by racing requests.

use chrono::{Datelike, NaiveDate};
use rentease_config::BillingConfig;
use rentease_database::{
    Bill, BillAction, BillFilter, BillListing, BillRepository, BillStatus, NewBill,
    PaymentMethod, RentRun,
};
use sqlx::SqlitePool;
use tracing::info;

use super::access::{Caller, ListScope};
use super::error::ServiceError;
use super::non_negative;
use crate::routes::bills::{CreateBillRequest, ListBillsQuery, ReceiptResponse};
use crate::storage::{UploadDir, UploadStore, UploadedFile};

pub async fn list_bills(
    pool: &SqlitePool,
    caller: &Caller,
    query: ListBillsQuery,
) -> Result<Vec<BillListing>, ServiceError> {
    let tenant_id = match caller.list_scope() {
        ListScope::All => query.tenant_id,
        ListScope::Tenant(own) => Some(own),
        ListScope::Nothing => return Ok(Vec::new()),
    };

    let filter = BillFilter {
        tenant_id,
        status: query.status,
    };
    Ok(BillRepository::new(pool.clone()).list(&filter).await?)
}

pub async fn find_bill(pool: &SqlitePool, bill_id: i64) -> Result<Bill, ServiceError> {
    BillRepository::new(pool.clone())
        .find_by_id(bill_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Bill not found"))
}

pub async fn create_bill(pool: &SqlitePool, req: CreateBillRequest) -> Result<Bill, ServiceError> {
    let billing_month = match req.billing_month.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(month) => {
            parse_month(month)?;
            Some(month.to_string())
        }
    };

    let new_bill = NewBill {
        tenant_id: req.tenant_id,
        bill_type: req.bill_type,
        amount: non_negative(req.amount, "amount")?,
        billing_month,
        due_date: req.due_date,
    };

    let bill = BillRepository::new(pool.clone()).create(&new_bill).await?;
    info!(bill_id = bill.id, tenant_id = bill.tenant_id, bill_type = ?bill.bill_type, "bill created");
    Ok(bill)
}

pub async fn delete_bill(
    pool: &SqlitePool,
    uploads: &UploadStore,
    bill_id: i64,
) -> Result<(), ServiceError> {
    let bill = BillRepository::new(pool.clone()).delete(bill_id).await?;
    if let Some(screenshot) = bill.payment_screenshot.as_deref() {
        uploads.remove(screenshot).await;
    }
    info!(bill_id, "bill deleted");
    Ok(())
}

/// Billing month label and rent due date for a run. `month` is `YYYY-MM`;
/// when absent the month containing `today` is used.
///
/// ```
/// use chrono::NaiveDate;
/// use rentease_backend_api::services::bill::rent_period;
///
/// let today = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
/// let (month, due) = rent_period(None, today, 6).unwrap();
/// assert_eq!(month, "2024-02");
/// assert_eq!(due, NaiveDate::from_ymd_opt(2024, 2, 6).unwrap());
/// ```
pub fn rent_period(
    month: Option<&str>,
    today: NaiveDate,
    due_day: u32,
) -> Result<(String, NaiveDate), ServiceError> {
    let first = match month.map(str::trim).filter(|month| !month.is_empty()) {
        Some(month) => parse_month(month)?,
        None => today.with_day(1).unwrap_or(today),
    };

    let due_date = first.with_day(due_day).ok_or_else(|| {
        ServiceError::bad_request(format!("rent due day {due_day} is not valid for {first}"))
    })?;

    Ok((first.format("%Y-%m").to_string(), due_date))
}

fn parse_month(month: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .ok()
        .filter(|_| month.len() == 7)
        .ok_or_else(|| ServiceError::bad_request("billing_month must be formatted as YYYY-MM"))
}

pub async fn generate_rent(
    pool: &SqlitePool,
    billing: &BillingConfig,
    month: Option<&str>,
    today: NaiveDate,
) -> Result<(String, RentRun), ServiceError> {
    let (billing_month, due_date) = rent_period(month, today, billing.rent_due_day)?;
    let run = BillRepository::new(pool.clone())
        .generate_rent(&billing_month, due_date)
        .await?;
    Ok((billing_month, run))
}

pub async fn mark_overdue(pool: &SqlitePool, today: NaiveDate) -> Result<u64, ServiceError> {
    Ok(BillRepository::new(pool.clone()).mark_overdue(today).await?)
}

/// Admin override: settles any unpaid bill without evidence.
pub async fn mark_paid_manually(
    pool: &SqlitePool,
    bill_id: i64,
    today: NaiveDate,
) -> Result<Bill, ServiceError> {
    let bill = find_bill(pool, bill_id).await?;
    bill.status.apply(BillAction::OverridePaid, bill.due_date < today)?;

    Ok(BillRepository::new(pool.clone())
        .settle(bill_id, bill.status, PaymentMethod::Manual, today, None)
        .await?)
}

/// Stores the tenant's transfer screenshot and queues the bill for approval.
pub async fn submit_screenshot(
    pool: &SqlitePool,
    uploads: &UploadStore,
    caller: &Caller,
    bill_id: i64,
    file: UploadedFile,
    today: NaiveDate,
) -> Result<Bill, ServiceError> {
    let bill = find_bill(pool, bill_id).await?;
    caller.ensure_owner(bill.tenant_id)?;
    bill.status
        .apply(BillAction::SubmitScreenshot, bill.due_date < today)?;

    let path = uploads
        .save(UploadDir::PaymentScreenshots, &format!("bill_{bill_id}_"), &file)
        .await
        .map_err(|e| ServiceError::internal(format!("failed to store screenshot: {e}")))?;

    let updated = match BillRepository::new(pool.clone())
        .record_screenshot(bill_id, bill.status, &path)
        .await
    {
        Ok(updated) => updated,
        Err(error) => {
            uploads.remove(&path).await;
            return Err(error.into());
        }
    };

    if let Some(previous) = bill.payment_screenshot {
        uploads.remove(&previous).await;
    }

    info!(bill_id, from = %bill.status, "payment screenshot submitted");
    Ok(updated)
}

/// Approves a submitted screenshot.
pub async fn approve_screenshot(
    pool: &SqlitePool,
    bill_id: i64,
    today: NaiveDate,
) -> Result<Bill, ServiceError> {
    let bill = find_bill(pool, bill_id).await?;
    if bill.status != BillStatus::Paid && bill.payment_screenshot.is_none() {
        return Err(ServiceError::bad_request(
            "Please upload payment screenshot first",
        ));
    }
    bill.status.apply(BillAction::Approve, bill.due_date < today)?;

    Ok(BillRepository::new(pool.clone())
        .settle(bill_id, bill.status, PaymentMethod::Screenshot, today, None)
        .await?)
}

/// Rejects a submitted screenshot; the bill returns to `pending`, or to
/// `overdue` when its due date has passed.
pub async fn reject_screenshot(
    pool: &SqlitePool,
    uploads: &UploadStore,
    bill_id: i64,
    today: NaiveDate,
) -> Result<Bill, ServiceError> {
    let bill = find_bill(pool, bill_id).await?;
    let next = bill.status.apply(BillAction::Reject, bill.due_date < today)?;

    let updated = BillRepository::new(pool.clone())
        .reopen(bill_id, bill.status, next)
        .await?;

    if let Some(previous) = bill.payment_screenshot {
        uploads.remove(&previous).await;
    }

    info!(bill_id, to = %next, "payment screenshot rejected");
    Ok(updated)
}

pub async fn receipt(
    pool: &SqlitePool,
    caller: &Caller,
    bill_id: i64,
    today: NaiveDate,
) -> Result<ReceiptResponse, ServiceError> {
    let row = BillRepository::new(pool.clone())
        .receipt(bill_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Bill not found"))?;
    caller.ensure_owner(row.tenant_id)?;

    Ok(ReceiptResponse {
        bill_id: row.bill_id,
        receipt_number: format!("REC-{:06}", row.bill_id),
        date: today,
        tenant_name: row.tenant_name,
        room_number: row.room_number.unwrap_or_else(|| "N/A".to_string()),
        building_name: row.building_name.unwrap_or_else(|| "N/A".to_string()),
        bill_type: row.bill_type,
        amount: row.amount,
        billing_month: row.billing_month,
        due_date: row.due_date,
        paid_date: row.paid_date,
        status: row.status,
        payment_method: row.payment_method,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn explicit_month_overrides_today() {
        let (month, due) = rent_period(Some("2023-12"), day(2024, 2, 20), 6).expect("period");
        assert_eq!(month, "2023-12");
        assert_eq!(due, day(2023, 12, 6));
    }

    #[test]
    fn malformed_months_are_rejected() {
        for month in ["2024-13", "2024-1", "24-01", "January"] {
            assert!(
                matches!(rent_period(Some(month), day(2024, 1, 1), 6), Err(ServiceError::BadRequest(_))),
                "{month} should be rejected"
            );
        }
    }

    #[test]
    fn blank_month_means_current() {
        let (month, _) = rent_period(Some(" "), day(2024, 7, 31), 28).expect("period");
        assert_eq!(month, "2024-07");
    }
}
