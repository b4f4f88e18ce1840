//! Orders Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    bakeries::records::BakeryUuid,
    orders::{
        data::{DeliveryDetails, OrderFilter, OrderScope},
        records::{
            BakerySummary, CustomerSummary, DeliveryWorkerSummary, OrderRecord, OrderUuid,
            OrderView, StatusTally,
        },
        status::{OrderStatus, PaymentMethod},
    },
    users::records::UserUuid,
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_VIEW_SQL: &str = include_str!("../sql/get_order_view.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("../sql/count_orders.sql");
const SUMMARIZE_ORDERS_SQL: &str = include_str!("../sql/summarize_orders.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");
const ASSIGN_DELIVERY_WORKER_SQL: &str = include_str!("../sql/assign_delivery_worker.sql");

/// Row written when an order is placed; status and payment status take their defaults.
#[derive(Debug, Clone)]
pub(crate) struct OrderInsert {
    pub uuid: OrderUuid,
    pub customer_uuid: UserUuid,
    pub bakery_uuid: BakeryUuid,
    pub total_amount: u64,
    pub delivery: DeliveryDetails,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderInsert,
    ) -> Result<(), sqlx::Error> {
        let total_amount = try_into_amount(order.total_amount)?;

        query(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.customer_uuid.into_uuid())
            .bind(order.bakery_uuid.into_uuid())
            .bind(total_amount)
            .bind(SqlxDate::from(order.delivery.delivery_date))
            .bind(order.delivery.delivery_time)
            .bind(order.delivery.delivery_address)
            .bind(order.delivery.customer_phone)
            .bind(order.delivery.special_instructions)
            .bind(order.payment_method)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn find_order_view(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<OrderView>, sqlx::Error> {
        query_as::<Postgres, OrderView>(GET_ORDER_VIEW_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        scope: OrderScope,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderView>, sqlx::Error> {
        let (customer, bakery, delivery_boy) = scope_binds(scope);
        let offset = i64::try_from(filter.offset()).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, OrderView>(LIST_ORDERS_SQL)
            .bind(customer)
            .bind(bakery)
            .bind(delivery_boy)
            .bind(filter.status)
            .bind(i64::from(filter.limit))
            .bind(offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        scope: OrderScope,
        status: Option<OrderStatus>,
    ) -> Result<u64, sqlx::Error> {
        let (customer, bakery, delivery_boy) = scope_binds(scope);

        let total: i64 = query_scalar(COUNT_ORDERS_SQL)
            .bind(customer)
            .bind(bakery)
            .bind(delivery_boy)
            .bind(status)
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(total).map_err(|e| sqlx::Error::ColumnDecode {
            index: "total".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn summarize_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        scope: OrderScope,
    ) -> Result<Vec<StatusTally>, sqlx::Error> {
        let (customer, bakery, delivery_boy) = scope_binds(scope);

        query_as::<Postgres, StatusTally>(SUMMARIZE_ORDERS_SQL)
            .bind(customer)
            .bind(bakery)
            .bind(delivery_boy)
            .fetch_all(&mut **tx)
            .await
    }

    /// Move `order` to `to` only if it is still at `from`. Returns rows affected.
    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(from)
            .bind(to)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Hand a ready order to `worker` and mark it out for delivery in one write.
    pub(crate) async fn assign_delivery_worker(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        worker: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(ASSIGN_DELIVERY_WORKER_SQL)
            .bind(order.into_uuid())
            .bind(worker.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn scope_binds(scope: OrderScope) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
    match scope {
        OrderScope::All => (None, None, None),
        OrderScope::Customer(customer) => (Some(customer.into_uuid()), None, None),
        OrderScope::Bakery(bakery) => (None, Some(bakery.into_uuid()), None),
        OrderScope::DeliveryWorker(worker) => (None, None, Some(worker.into_uuid())),
    }
}

pub(super) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

pub(super) fn try_into_amount(amount: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: UserUuid::from_uuid(row.try_get("customer_uuid")?),
            bakery_uuid: BakeryUuid::from_uuid(row.try_get("bakery_uuid")?),
            delivery_boy_uuid: row
                .try_get::<Option<Uuid>, _>("delivery_boy_uuid")?
                .map(UserUuid::from_uuid),
            total_amount: try_get_amount(row, "total_amount")?,
            status: row.try_get("status")?,
            delivery_date: row.try_get::<SqlxDate, _>("delivery_date")?.to_jiff(),
            delivery_time: row.try_get("delivery_time")?,
            delivery_address: row.try_get("delivery_address")?,
            customer_phone: row.try_get("customer_phone")?,
            special_instructions: row.try_get("special_instructions")?,
            payment_method: row.try_get("payment_method")?,
            payment_status: row.try_get("payment_status")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderView {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let order = OrderRecord::from_row(row)?;

        let customer = CustomerSummary {
            uuid: order.customer_uuid,
            name: row.try_get("customer_name")?,
            phone: row.try_get("customer_contact_phone")?,
        };

        let bakery = BakerySummary {
            uuid: order.bakery_uuid,
            bakery_name: row.try_get("bakery_name")?,
            city: row.try_get("bakery_city")?,
        };

        let delivery_boy = match order.delivery_boy_uuid {
            Some(uuid) => Some(DeliveryWorkerSummary {
                uuid,
                name: row.try_get("delivery_boy_name")?,
                phone: row.try_get("delivery_boy_phone")?,
            }),
            None => None,
        };

        Ok(Self {
            order,
            customer,
            bakery,
            delivery_boy,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for StatusTally {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let count: i64 = row.try_get("order_count")?;

        Ok(Self {
            status: row.try_get("status")?,
            count: u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
                index: "order_count".to_string(),
                source: Box::new(e),
            })?,
            amount: try_get_amount(row, "amount")?,
        })
    }
}
