use std::sync::Arc;

use async_trait::async_trait;
use common::error::Res;
use db::{
    dtos::payment::PaymentCreateRequest,
    models::{order::Order, payment::Payment},
};
use sqlx::{PgPool, types::BigDecimal};
use uuid::Uuid;

/// Result of charging an order.
#[derive(Debug)]
pub enum Settlement {
    Paid(Payment),
    /// Another payment got there first.
    AlreadyPaid,
    /// The restaurant has no orders left this month.
    QuotaReached,
}

/// Dashboard writes that must hold under concurrent requests: order
/// charges, refunds and drag-and-drop reorders. Each call is atomic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn find_order(&self, restaurant_id: Uuid, order_id: Uuid) -> Res<Option<Order>>;

    /// Marks the order paid, counts it against the quota and records the
    /// payment. Nothing is written unless the result is `Paid`.
    async fn settle_order(
        &self,
        restaurant_id: Uuid,
        order_id: Uuid,
        payment: PaymentCreateRequest,
    ) -> Res<Settlement>;

    async fn find_payment(&self, restaurant_id: Uuid, payment_id: Uuid) -> Res<Option<Payment>>;

    /// `None` when the refund no longer fits the remaining balance.
    async fn add_refund(
        &self,
        restaurant_id: Uuid,
        payment_id: Uuid,
        refund: BigDecimal,
    ) -> Res<Option<Payment>>;

    async fn category_exists(&self, restaurant_id: Uuid, category_id: Uuid) -> Res<bool>;

    /// `false` when some id is not one of the restaurant's categories; no
    /// position is changed then.
    async fn set_category_positions(
        &self,
        restaurant_id: Uuid,
        ids: Vec<Uuid>,
        positions: Vec<i32>,
    ) -> Res<bool>;

    /// Same contract as `set_category_positions`, for the items of one
    /// category.
    async fn set_item_positions(
        &self,
        category_id: Uuid,
        ids: Vec<Uuid>,
        positions: Vec<i32>,
    ) -> Res<bool>;
}

pub struct PgLedger {
    pool: Arc<PgPool>,
}

impl PgLedger {
    pub fn new(pool: Arc<PgPool>) -> Self {
        PgLedger { pool }
    }
}

#[async_trait]
impl Ledger for PgLedger {
    async fn find_order(&self, restaurant_id: Uuid, order_id: Uuid) -> Res<Option<Order>> {
        db::order::get_order_by_id(&*self.pool, restaurant_id, order_id).await
    }

    async fn settle_order(
        &self,
        restaurant_id: Uuid,
        order_id: Uuid,
        payment: PaymentCreateRequest,
    ) -> Res<Settlement> {
        // an early return drops the transaction, which rolls it back
        let mut tx = self.pool.begin().await?;
        let marked =
            db::order::mark_paid(&mut *tx, restaurant_id, order_id, &payment.payment_intent_id)
                .await?;
        if marked == 0 {
            return Ok(Settlement::AlreadyPaid);
        }
        if !db::restaurant::increment_orders_used(&mut *tx, restaurant_id).await? {
            return Ok(Settlement::QuotaReached);
        }
        let payment = db::payment::insert_payment(&mut *tx, payment).await?;
        tx.commit().await?;
        Ok(Settlement::Paid(payment))
    }

    async fn find_payment(&self, restaurant_id: Uuid, payment_id: Uuid) -> Res<Option<Payment>> {
        db::payment::get_payment_by_id(&*self.pool, restaurant_id, payment_id).await
    }

    async fn add_refund(
        &self,
        restaurant_id: Uuid,
        payment_id: Uuid,
        refund: BigDecimal,
    ) -> Res<Option<Payment>> {
        db::payment::add_refund(&*self.pool, restaurant_id, payment_id, refund).await
    }

    async fn category_exists(&self, restaurant_id: Uuid, category_id: Uuid) -> Res<bool> {
        db::menu::exists_category(&*self.pool, restaurant_id, category_id).await
    }

    async fn set_category_positions(
        &self,
        restaurant_id: Uuid,
        ids: Vec<Uuid>,
        positions: Vec<i32>,
    ) -> Res<bool> {
        let mut tx = self.pool.begin().await?;
        let updated =
            db::menu::set_category_positions(&mut *tx, restaurant_id, &ids, &positions).await?;
        if updated != ids.len() as u64 {
            return Ok(false);
        }
        tx.commit().await?;
        Ok(true)
    }

    async fn set_item_positions(
        &self,
        category_id: Uuid,
        ids: Vec<Uuid>,
        positions: Vec<i32>,
    ) -> Res<bool> {
        let mut tx = self.pool.begin().await?;
        let updated = db::menu::set_item_positions(&mut *tx, category_id, &ids, &positions).await?;
        if updated != ids.len() as u64 {
            return Ok(false);
        }
        tx.commit().await?;
        Ok(true)
    }
}
