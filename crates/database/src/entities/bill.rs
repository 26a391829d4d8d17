//! Bills and the payment state machine they move through.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Bill {
    pub id: i64,
    pub tenant_id: i64,
    pub bill_type: BillType,
    pub amount: f64,
    pub billing_month: Option<String>,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: BillStatus,
    pub payment_screenshot: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub created_at: String,
}

/// Bill joined with the tenant it is owed by.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct BillListing {
    pub id: i64,
    pub tenant_id: i64,
    pub tenant_name: String,
    pub room_number: Option<String>,
    pub bill_type: BillType,
    pub amount: f64,
    pub billing_month: Option<String>,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: BillStatus,
    pub payment_screenshot: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub created_at: String,
}

/// Everything a receipt needs in one row.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ReceiptRow {
    pub bill_id: i64,
    pub tenant_id: i64,
    pub tenant_name: String,
    pub room_number: Option<String>,
    pub building_name: Option<String>,
    pub bill_type: BillType,
    pub amount: f64,
    pub billing_month: Option<String>,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: BillStatus,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BillType {
    Rent,
    Electricity,
    Water,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Pending,
    PendingApproval,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Manual,
    Screenshot,
    Gateway,
}

/// Something that can happen to a bill after it is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillAction {
    SubmitScreenshot,
    Approve,
    Reject,
    OverridePaid,
    GatewayPaid,
    MarkOverdue,
}

impl BillAction {
    fn describe(&self) -> &'static str {
        match self {
            BillAction::SubmitScreenshot => "upload a payment screenshot for",
            BillAction::Approve => "approve",
            BillAction::Reject => "reject",
            BillAction::OverridePaid => "mark as paid",
            BillAction::GatewayPaid => "record a gateway payment for",
            BillAction::MarkOverdue => "mark overdue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("bill is already paid")]
    AlreadyPaid,
    #[error("cannot {} a bill that is {}", .action.describe(), .from.as_str())]
    NotAllowed { from: BillStatus, action: BillAction },
}

impl BillType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillType::Rent => "rent",
            BillType::Electricity => "electricity",
            BillType::Water => "water",
            BillType::Maintenance => "maintenance",
        }
    }
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::PendingApproval => "pending_approval",
            BillStatus::Paid => "paid",
            BillStatus::Overdue => "overdue",
        }
    }

    /// Statuses from which a payment can still be made.
    pub fn is_payable(&self) -> bool {
        !matches!(self, BillStatus::Paid)
    }

    /// Next status after `action`. `past_due` is only consulted when a
    /// rejected screenshot sends the bill back to the unpaid pool.
    ///
    /// ```
    /// use rentease_database::{BillAction, BillStatus};
    ///
    /// let next = BillStatus::Pending.apply(BillAction::SubmitScreenshot, false);
    /// assert_eq!(next, Ok(BillStatus::PendingApproval));
    /// ```
    pub fn apply(self, action: BillAction, past_due: bool) -> Result<BillStatus, TransitionError> {
        use BillAction::*;
        use BillStatus::*;

        if self == Paid {
            return Err(TransitionError::AlreadyPaid);
        }

        match (self, action) {
            (Pending | Overdue | PendingApproval, SubmitScreenshot) => Ok(PendingApproval),
            (PendingApproval, Approve) => Ok(Paid),
            (PendingApproval, Reject) if past_due => Ok(Overdue),
            (PendingApproval, Reject) => Ok(Pending),
            (Pending | Overdue | PendingApproval, OverridePaid | GatewayPaid) => Ok(Paid),
            (Pending, MarkOverdue) => Ok(Overdue),
            (from, action) => Err(TransitionError::NotAllowed { from, action }),
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct NewBill {
    pub tenant_id: i64,
    pub bill_type: BillType,
    pub amount: f64,
    pub billing_month: Option<String>,
    pub due_date: NaiveDate,
}

/// Filters for bill listings. `tenant_id` is forced for tenant callers.
#[derive(Debug, Clone, Default)]
pub struct BillFilter {
    pub tenant_id: Option<i64>,
    pub status: Option<BillStatus>,
}

/// Outcome of a monthly rent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RentRun {
    pub created: u64,
    pub skipped: u64,
}
