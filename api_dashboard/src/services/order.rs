use common::{
    error::{AppError, Res},
    misc::OrderPaymentStatus,
};
use db::models::{order::Order, payment::Payment};
use sqlx::{PgPool, types::BigDecimal};
use uuid::Uuid;

use crate::{
    dtos::order::OrderWithPayment,
    ledger::{Ledger, Settlement},
    services::payment::succeeded_payment,
};

pub(crate) async fn list_orders(pool: &PgPool, restaurant_id: Uuid) -> Res<Vec<Order>> {
    db::order::get_orders_by_restaurant(pool, restaurant_id).await
}

pub(crate) async fn get_order_with_payment(
    pool: &PgPool,
    restaurant_id: Uuid,
    order_id: Uuid,
) -> Res<OrderWithPayment> {
    let order = db::order::get_order_by_id(pool, restaurant_id, order_id)
        .await?
        .ok_or_else(order_not_found)?;
    let payment = match order.payment_intent_id.as_deref() {
        Some(intent) => db::payment::get_payment_by_intent(pool, intent).await?,
        None => None,
    };
    Ok(OrderWithPayment { order, payment })
}

/// Records a pay-per-order payment. Marking the order, counting it against
/// the quota and inserting the payment happen together or not at all.
pub(crate) async fn pay_order(
    ledger: &dyn Ledger,
    restaurant_id: Uuid,
    order_id: Uuid,
    amount: BigDecimal,
) -> Res<Payment> {
    if amount <= BigDecimal::from(0) {
        return Err(AppError::InvalidArgument(
            "Payment amount must be positive".to_string(),
        ));
    }

    let order = ledger
        .find_order(restaurant_id, order_id)
        .await?
        .ok_or_else(order_not_found)?;
    if order.payment_status == OrderPaymentStatus::Paid.to_string() {
        return Err(already_paid());
    }

    let payment = succeeded_payment(restaurant_id, Some(order.id), amount);
    match ledger.settle_order(restaurant_id, order.id, payment).await? {
        Settlement::Paid(payment) => {
            log::info!("Order {} paid with {}", order.id, payment.payment_intent_id);
            Ok(payment)
        }
        Settlement::AlreadyPaid => Err(already_paid()),
        Settlement::QuotaReached => Err(AppError::Forbidden(
            "Monthly order limit reached".to_string(),
        )),
    }
}

fn order_not_found() -> AppError {
    AppError::NotFound("Order not found".to_string())
}

fn already_paid() -> AppError {
    AppError::BadRequest("Order is already paid".to_string())
}
