//! Online payments through the gateway and the notifications they trigger.

use chrono::NaiveDate;
use rentease_database::{
    Bill, BillAction, BillRepository, BillStatus, PaymentMethod, User, UserRepository,
};
use rentease_payments::{to_minor_units, MailMessage, Mailer, PaymentGateway};
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::access::Caller;
use super::bill::find_bill;
use super::error::ServiceError;
use crate::routes::payments::{CreateOrderResponse, VerifyPaymentRequest};

/// Opens a gateway order for the full bill amount.
pub async fn create_order(
    pool: &SqlitePool,
    gateway: &PaymentGateway,
    caller: &Caller,
    bill_id: i64,
) -> Result<CreateOrderResponse, ServiceError> {
    let bill = find_bill(pool, bill_id).await?;
    caller.ensure_owner(bill.tenant_id)?;
    if !bill.status.is_payable() {
        return Err(ServiceError::conflict("Bill is already paid"));
    }

    let order = gateway
        .create_order(to_minor_units(bill.amount), &format!("bill_{bill_id}"))
        .await?;
    BillRepository::new(pool.clone())
        .set_gateway_order(bill_id, &order.id)
        .await?;

    info!(bill_id, order_id = %order.id, mock = gateway.is_mock(), "payment order opened");

    Ok(CreateOrderResponse {
        id: order.id,
        amount: order.amount,
        currency: order.currency,
        bill_id,
        key_id: gateway.key_id().map(str::to_string),
        mock: gateway.is_mock(),
    })
}

/// Outcome of a verification request.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    Settled(Bill),
    /// The same payment was already recorded; nothing changed.
    AlreadyRecorded(Bill),
}

/// Checks the gateway signature and settles the bill. Repeating the call
/// with the payment id that settled the bill succeeds without side effects.
pub async fn verify_payment(
    pool: &SqlitePool,
    gateway: &PaymentGateway,
    mailer: &dyn Mailer,
    caller: &Caller,
    req: VerifyPaymentRequest,
    today: NaiveDate,
) -> Result<Verification, ServiceError> {
    let bill = find_bill(pool, req.bill_id).await?;
    caller.ensure_owner(bill.tenant_id)?;

    if bill.status == BillStatus::Paid
        && bill.gateway_payment_id.as_deref() == Some(req.razorpay_payment_id.as_str())
    {
        return Ok(Verification::AlreadyRecorded(bill));
    }
    bill.status.apply(BillAction::GatewayPaid, bill.due_date < today)?;

    // Only the order opened for this bill carries its amount.
    if bill.gateway_order_id.as_deref() != Some(req.razorpay_order_id.as_str()) {
        return Err(ServiceError::bad_request(
            "Payment order does not belong to this bill",
        ));
    }

    gateway.verify_signature(
        &req.razorpay_order_id,
        &req.razorpay_payment_id,
        &req.razorpay_signature,
    )?;

    let settled = BillRepository::new(pool.clone())
        .settle(
            bill.id,
            bill.status,
            PaymentMethod::Gateway,
            today,
            Some(&req.razorpay_payment_id),
        )
        .await?;

    notify_payment(pool, mailer, &caller.user, &settled, &req.razorpay_payment_id).await;
    Ok(Verification::Settled(settled))
}

/// Sends the payer receipt and the admin notice. Failures are only logged.
async fn notify_payment(
    pool: &SqlitePool,
    mailer: &dyn Mailer,
    payer: &User,
    bill: &Bill,
    payment_id: &str,
) {
    let period = bill.billing_month.as_deref().unwrap_or("one-off");
    let bill_type = bill.bill_type.as_str();

    let receipt = MailMessage {
        to: payer.email.clone(),
        subject: "Payment Successful - RentEase".to_string(),
        body: format!(
            "Your payment of Rs. {:.2} for {bill_type} ({period}) was successful.\nTransaction ID: {payment_id}",
            bill.amount
        ),
    };
    if let Err(error) = mailer.send(&receipt).await {
        warn!(bill_id = bill.id, %error, "failed to send payment receipt");
    }

    let admin = match UserRepository::new(pool.clone()).first_admin().await {
        Ok(admin) => admin,
        Err(error) => {
            warn!(bill_id = bill.id, %error, "failed to look up admin for payment notice");
            return;
        }
    };
    let Some(admin) = admin else {
        return;
    };

    let notice = MailMessage {
        to: admin.email,
        subject: "New Payment Received".to_string(),
        body: format!(
            "Tenant {} paid Rs. {:.2} online.\nBill ID: {}",
            payer.username, bill.amount, bill.id
        ),
    };
    if let Err(error) = mailer.send(&notice).await {
        warn!(bill_id = bill.id, %error, "failed to send admin payment notice");
    }
}
