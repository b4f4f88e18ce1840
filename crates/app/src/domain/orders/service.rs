//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::{
    auth::Actor,
    database::Db,
    domain::{
        bakeries::repository::PgBakeriesRepository,
        orders::{
            data::{DeliveryDetails, MAX_PAGE_LIMIT, NewOrder, OrderFilter, OrderScope},
            errors::OrdersServiceError,
            pricing::price_cart,
            records::{OrderDetails, OrderPage, OrderSummary, OrderUuid, OrderView},
            repositories::{OrderInsert, PgOrderItemsRepository, PgOrdersRepository},
            status::OrderStatus,
            transitions::check_transition,
        },
        products::{records::ProductUuid, repository::PgProductsRepository},
        users::{
            records::{Role, UserUuid},
            repository::PgUsersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    products_repository: PgProductsRepository,
    bakeries_repository: PgBakeriesRepository,
    users_repository: PgUsersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            bakeries_repository: PgBakeriesRepository::new(),
            users_repository: PgUsersRepository::new(),
        }
    }

    /// Orders `actor` may list and summarise.
    async fn scope_for(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        actor: Actor,
    ) -> Result<OrderScope, OrdersServiceError> {
        match actor.role {
            Role::Customer => Ok(OrderScope::Customer(actor.user_uuid)),
            Role::Delivery => Ok(OrderScope::DeliveryWorker(actor.user_uuid)),
            Role::Admin => Ok(OrderScope::All),
            Role::Baker => self
                .bakeries_repository
                .find_bakery_by_owner(tx, actor.user_uuid)
                .await?
                .map(|bakery| OrderScope::Bakery(bakery.uuid))
                .ok_or(OrdersServiceError::NotFound),
        }
    }

    /// Whether `actor` runs the bakery fulfilling `order`.
    async fn owns_bakery_of(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        actor: Actor,
        order: &OrderView,
    ) -> Result<bool, OrdersServiceError> {
        if actor.role != Role::Baker {
            return Ok(false);
        }

        let bakery = self
            .bakeries_repository
            .find_bakery_by_owner(tx, actor.user_uuid)
            .await?;

        Ok(bakery.is_some_and(|bakery| bakery.uuid == order.order.bakery_uuid))
    }

    async fn fetch_view(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderView, OrdersServiceError> {
        self.orders_repository
            .find_order_view(tx, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)
    }
}

fn required(field: &str, value: String) -> Result<String, OrdersServiceError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(OrdersServiceError::ValidationError(format!(
            "{field} is required"
        )));
    }

    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn normalize_delivery(delivery: DeliveryDetails) -> Result<DeliveryDetails, OrdersServiceError> {
    Ok(DeliveryDetails {
        delivery_date: delivery.delivery_date,
        delivery_address: required("delivery_address", delivery.delivery_address)?,
        delivery_time: required("delivery_time", delivery.delivery_time)?,
        customer_phone: required("customer_phone", delivery.customer_phone)?,
        special_instructions: optional(delivery.special_instructions),
    })
}

fn validate_filter(filter: &OrderFilter) -> Result<(), OrdersServiceError> {
    if filter.page == 0 {
        return Err(OrdersServiceError::ValidationError(
            "page must be at least 1".to_string(),
        ));
    }

    if filter.limit == 0 || filter.limit > MAX_PAGE_LIMIT {
        return Err(OrdersServiceError::ValidationError(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}"
        )));
    }

    Ok(())
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(
        &self,
        actor: Actor,
        order: NewOrder,
    ) -> Result<OrderDetails, OrdersServiceError> {
        if actor.role != Role::Customer {
            return Err(OrdersServiceError::Unauthorized);
        }

        if order.items.is_empty() {
            return Err(OrdersServiceError::EmptyOrder);
        }

        let mut tx = self.db.begin_transaction().await?;

        let mut product_uuids: Vec<ProductUuid> =
            order.items.iter().map(|line| line.product_uuid).collect();

        product_uuids.sort_unstable();
        product_uuids.dedup();

        let catalogue: FxHashMap<ProductUuid, _> = self
            .products_repository
            .get_products(&mut tx, &product_uuids)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        let mut cart = price_cart(&order.items, &catalogue)?;

        for line in &mut cart.lines {
            line.custom_message = optional(line.custom_message.take());
        }

        let delivery = normalize_delivery(order.delivery)?;

        self.bakeries_repository
            .find_bakery(&mut tx, order.bakery_uuid)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        self.orders_repository
            .create_order(
                &mut tx,
                OrderInsert {
                    uuid: order.uuid,
                    customer_uuid: actor.user_uuid,
                    bakery_uuid: order.bakery_uuid,
                    total_amount: cart.total_amount,
                    delivery,
                    payment_method: order.payment_method,
                },
            )
            .await?;

        for (position, line) in cart.lines.into_iter().enumerate() {
            self.items_repository
                .create_order_item(&mut tx, order.uuid, position, line)
                .await?;
        }

        let view = self.fetch_view(&mut tx, order.uuid).await?;
        let items = self.items_repository.get_order_items(&mut tx, order.uuid).await?;

        tx.commit().await?;

        info!(
            order = %order.uuid,
            bakery = %order.bakery_uuid,
            total_amount = view.order.total_amount,
            items = items.len(),
            "order placed"
        );

        Ok(OrderDetails { view, items })
    }

    async fn list_orders(
        &self,
        actor: Actor,
        filter: OrderFilter,
    ) -> Result<OrderPage, OrdersServiceError> {
        validate_filter(&filter)?;

        let mut tx = self.db.begin_transaction().await?;

        let scope = self.scope_for(&mut tx, actor).await?;

        let orders = self
            .orders_repository
            .list_orders(&mut tx, scope, &filter)
            .await?;

        let total = self
            .orders_repository
            .count_orders(&mut tx, scope, filter.status)
            .await?;

        tx.commit().await?;

        Ok(OrderPage {
            orders,
            total,
            total_pages: filter.total_pages(total),
            current_page: filter.page,
        })
    }

    async fn get_order(
        &self,
        _actor: Actor,
        order: OrderUuid,
    ) -> Result<OrderDetails, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let view = self.fetch_view(&mut tx, order).await?;
        let items = self.items_repository.get_order_items(&mut tx, order).await?;

        tx.commit().await?;

        Ok(OrderDetails { view, items })
    }

    async fn order_summary(&self, actor: Actor) -> Result<OrderSummary, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let scope = self.scope_for(&mut tx, actor).await?;
        let tallies = self.orders_repository.summarize_orders(&mut tx, scope).await?;

        tx.commit().await?;

        Ok(OrderSummary::from_tallies(&tallies))
    }

    async fn update_status(
        &self,
        actor: Actor,
        order: OrderUuid,
        requested: OrderStatus,
    ) -> Result<OrderView, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.fetch_view(&mut tx, order).await?;

        match actor.role {
            Role::Baker => {
                if !self.owns_bakery_of(&mut tx, actor, &current).await? {
                    return Err(OrdersServiceError::Unauthorized);
                }
            }
            Role::Delivery => {
                if current
                    .order
                    .delivery_boy_uuid
                    .is_some_and(|worker| worker != actor.user_uuid)
                {
                    return Err(OrdersServiceError::Unauthorized);
                }
            }
            Role::Admin | Role::Customer => {}
        }

        let from = current.order.status;

        check_transition(actor.role, from, requested)?;

        let rows_affected = self
            .orders_repository
            .update_status(&mut tx, order, from, requested)
            .await?;

        if rows_affected == 0 {
            debug!(order = %order, %from, to = %requested, "status changed concurrently");

            return Err(OrdersServiceError::InvalidState(
                "order status changed concurrently",
            ));
        }

        let updated = self.fetch_view(&mut tx, order).await?;

        tx.commit().await?;

        info!(
            order = %order,
            actor = %actor.user_uuid,
            role = %actor.role,
            %from,
            to = %requested,
            "order status updated"
        );

        Ok(updated)
    }

    async fn assign_delivery_worker(
        &self,
        actor: Actor,
        order: OrderUuid,
        worker: UserUuid,
    ) -> Result<OrderView, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.fetch_view(&mut tx, order).await?;

        if current.order.status != OrderStatus::Ready {
            return Err(OrdersServiceError::InvalidState(
                "order must be ready for delivery",
            ));
        }

        let permitted = match actor.role {
            Role::Admin => true,
            Role::Baker => self.owns_bakery_of(&mut tx, actor, &current).await?,
            Role::Customer | Role::Delivery => false,
        };

        if !permitted {
            return Err(OrdersServiceError::Unauthorized);
        }

        let is_delivery_worker = self
            .users_repository
            .find_user(&mut tx, worker)
            .await?
            .is_some_and(|user| user.role == Role::Delivery);

        if !is_delivery_worker {
            return Err(OrdersServiceError::ValidationError(format!(
                "user {worker} is not a delivery worker"
            )));
        }

        let rows_affected = self
            .orders_repository
            .assign_delivery_worker(&mut tx, order, worker)
            .await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::InvalidState(
                "order must be ready for delivery",
            ));
        }

        let updated = self.fetch_view(&mut tx, order).await?;

        tx.commit().await?;

        info!(order = %order, worker = %worker, "delivery worker assigned");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
/// Order placement, lifecycle and read operations.
pub trait OrdersService: Send + Sync {
    /// Price the cart against live products and persist the order with its items.
    async fn create_order(
        &self,
        actor: Actor,
        order: NewOrder,
    ) -> Result<OrderDetails, OrdersServiceError>;

    /// One page of the orders visible to `actor`, newest first.
    async fn list_orders(
        &self,
        actor: Actor,
        filter: OrderFilter,
    ) -> Result<OrderPage, OrdersServiceError>;

    /// A single order with its items.
    async fn get_order(
        &self,
        actor: Actor,
        order: OrderUuid,
    ) -> Result<OrderDetails, OrdersServiceError>;

    /// Per-status counts and amounts over the orders visible to `actor`.
    async fn order_summary(&self, actor: Actor) -> Result<OrderSummary, OrdersServiceError>;

    /// Move an order to `requested`, subject to the actor's role.
    async fn update_status(
        &self,
        actor: Actor,
        order: OrderUuid,
        requested: OrderStatus,
    ) -> Result<OrderView, OrdersServiceError>;

    /// Hand a ready order to a delivery worker, moving it out for delivery.
    async fn assign_delivery_worker(
        &self,
        actor: Actor,
        order: OrderUuid,
        worker: UserUuid,
    ) -> Result<OrderView, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use testresult::TestResult;

    use crate::{
        domain::{bakeries::records::BakeryUuid, orders::data::OrderFilter},
        test::{
            TestContext,
            helpers::{self, Marketplace},
        },
    };

    use super::*;

    async fn advance(
        ctx: &TestContext,
        actor: Actor,
        order: OrderUuid,
        path: &[OrderStatus],
    ) -> Result<(), OrdersServiceError> {
        for status in path {
            ctx.orders.update_status(actor, order, *status).await?;
        }

        Ok(())
    }

    async fn ready_order(ctx: &TestContext, market: &Marketplace) -> TestResult<OrderUuid> {
        let created = ctx
            .orders
            .create_order(market.customer, market.cake_order())
            .await?;
        let order = created.view.order.uuid;

        advance(
            ctx,
            market.baker,
            order,
            &[OrderStatus::Confirmed, OrderStatus::Baking, OrderStatus::Ready],
        )
        .await?;

        Ok(order)
    }

    async fn order_count(ctx: &TestContext) -> TestResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(ctx.db.pool())
            .await?;

        Ok(count)
    }

    /// Hold an uncommitted `status` write on `order` so later updates of the row block.
    async fn hold_status(
        pool: &PgPool,
        order: OrderUuid,
        status: &str,
    ) -> TestResult<Transaction<'static, Postgres>> {
        let mut blocker = pool.begin().await?;

        sqlx::query("UPDATE orders SET status = $2::order_status WHERE uuid = $1")
            .bind(order.into_uuid())
            .bind(status)
            .execute(&mut *blocker)
            .await?;

        Ok(blocker)
    }

    /// Poll until some session in this database waits on a row lock.
    async fn wait_for_lock_waiter(pool: &PgPool) -> Result<bool, sqlx::Error> {
        for _ in 0..2_000 {
            let waiting: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM pg_stat_activity \
                 WHERE datname = current_database() AND wait_event_type = 'Lock'",
            )
            .fetch_one(pool)
            .await?;

            if waiting > 0 {
                return Ok(true);
            }

            tokio::task::yield_now().await;
        }

        Ok(false)
    }

    fn is_lost_race(result: &Result<OrderView, OrdersServiceError>) -> bool {
        matches!(
            result,
            Err(OrdersServiceError::InvalidState(_) | OrdersServiceError::InvalidTransition { .. })
        )
    }

    #[tokio::test]
    async fn create_order_prices_from_catalogue() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let created = ctx
            .orders
            .create_order(market.customer, market.cake_order())
            .await?;

        assert_eq!(created.view.order.total_amount, 40);
        assert_eq!(created.view.order.status, OrderStatus::Ordered);
        assert_eq!(created.view.order.customer_uuid, market.customer.user_uuid);
        assert_eq!(created.view.bakery.bakery_name, market.bakery.bakery_name);
        assert!(created.view.delivery_boy.is_none());

        assert_eq!(created.items.len(), 1);
        assert_eq!(created.items[0].price, 20);
        assert_eq!(created.items[0].quantity, 2);
        assert_eq!(created.items[0].weight, "1kg");
        assert_eq!(created.items[0].product_name, "Chocolate Cake");

        Ok(())
    }

    #[tokio::test]
    async fn create_order_sums_every_line() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let cookies =
            helpers::create_product(&ctx, market.bakery.uuid, "Butter Cookies", &[("tin", 7)])
                .await?;

        let order = helpers::new_order(
            market.bakery.uuid,
            vec![
                helpers::line(market.cake.uuid, "500g", 1),
                helpers::line(cookies.uuid, "tin", 3),
                helpers::line(market.cake.uuid, "1kg", 1),
            ],
        );

        let created = ctx.orders.create_order(market.customer, order).await?;

        assert_eq!(created.view.order.total_amount, 12 + 7 * 3 + 20);

        let weights: Vec<&str> = created
            .items
            .iter()
            .map(|item| item.weight.as_str())
            .collect();

        assert_eq!(weights, ["500g", "tin", "1kg"]);

        Ok(())
    }

    #[tokio::test]
    async fn create_order_with_empty_cart_persists_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let result = ctx
            .orders
            .create_order(market.customer, helpers::new_order(market.bakery.uuid, vec![]))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::EmptyOrder)),
            "expected EmptyOrder, got {result:?}"
        );
        assert_eq!(order_count(&ctx).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn create_order_with_unknown_weight_persists_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let order = helpers::new_order(
            market.bakery.uuid,
            vec![
                helpers::line(market.cake.uuid, "1kg", 1),
                helpers::line(market.cake.uuid, "3kg", 1),
            ],
        );

        let result = ctx.orders.create_order(market.customer, order).await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidWeightOption { ref weight, .. }) if weight == "3kg"),
            "expected InvalidWeightOption, got {result:?}"
        );
        assert_eq!(order_count(&ctx).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn create_order_with_unavailable_product_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        sqlx::query("UPDATE products SET is_available = false WHERE uuid = $1")
            .bind(market.cake.uuid.into_uuid())
            .execute(ctx.db.pool())
            .await?;

        let result = ctx
            .orders
            .create_order(market.customer, market.cake_order())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::ProductUnavailable(product)) if product == market.cake.uuid),
            "expected ProductUnavailable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_order_with_zero_quantity_is_validation_error() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let order = helpers::new_order(
            market.bakery.uuid,
            vec![helpers::line(market.cake.uuid, "1kg", 0)],
        );

        let result = ctx.orders.create_order(market.customer, order).await;

        assert!(
            matches!(result, Err(OrdersServiceError::ValidationError(_))),
            "expected ValidationError, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_order_with_unstorable_total_is_validation_error() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let wedding_cake = helpers::create_product(
            &ctx,
            market.bakery.uuid,
            "Wedding Cake",
            &[("1kg", 10_000_000_000_000)],
        )
        .await?;

        let order = helpers::new_order(
            market.bakery.uuid,
            vec![helpers::line(wedding_cake.uuid, "1kg", 1_000_000)],
        );

        let result = ctx.orders.create_order(market.customer, order).await;

        assert!(
            matches!(result, Err(OrdersServiceError::ValidationError(_))),
            "expected ValidationError, got {result:?}"
        );
        assert_eq!(order_count(&ctx).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn create_order_requires_delivery_details() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let mut order = market.cake_order();
        order.delivery.delivery_address = "   ".to_string();

        let result = ctx.orders.create_order(market.customer, order).await;

        assert!(
            matches!(result, Err(OrdersServiceError::ValidationError(ref message)) if message.contains("delivery_address")),
            "expected ValidationError, got {result:?}"
        );
        assert_eq!(order_count(&ctx).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn create_order_for_unknown_bakery_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let mut order = market.cake_order();
        order.bakery_uuid = BakeryUuid::new();

        let result = ctx.orders.create_order(market.customer, order).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn only_customers_place_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let result = ctx
            .orders
            .create_order(market.baker, market.cake_order())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Unauthorized)),
            "expected Unauthorized, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_order_trims_optional_text() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let mut order = market.cake_order();
        order.delivery.special_instructions = Some("  ring twice ".to_string());
        order.items[0].custom_message = Some("   ".to_string());

        let created = ctx.orders.create_order(market.customer, order).await?;

        assert_eq!(
            created.view.order.special_instructions.as_deref(),
            Some("ring twice")
        );
        assert_eq!(created.items[0].custom_message, None);

        Ok(())
    }

    #[tokio::test]
    async fn baker_moves_own_order_through_the_kitchen() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let order = ready_order(&ctx, &market).await?;

        let details = ctx.orders.get_order(market.customer, order).await?;

        assert_eq!(details.view.order.status, OrderStatus::Ready);

        Ok(())
    }

    #[tokio::test]
    async fn baker_of_another_bakery_is_unauthorized() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let rival = helpers::create_actor(&ctx, Role::Baker).await?;
        helpers::create_bakery(&ctx, rival.user_uuid).await?;

        let created = ctx
            .orders
            .create_order(market.customer, market.cake_order())
            .await?;

        let result = ctx
            .orders
            .update_status(rival, created.view.order.uuid, OrderStatus::Confirmed)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Unauthorized)),
            "expected Unauthorized, got {result:?}"
        );

        let unchanged = ctx.orders.get_order(market.admin, created.view.order.uuid).await?;

        assert_eq!(unchanged.view.order.status, OrderStatus::Ordered);

        Ok(())
    }

    #[tokio::test]
    async fn baker_without_bakery_is_unauthorized() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let drifter = helpers::create_actor(&ctx, Role::Baker).await?;

        let created = ctx
            .orders
            .create_order(market.customer, market.cake_order())
            .await?;

        let result = ctx
            .orders
            .update_status(drifter, created.view.order.uuid, OrderStatus::Confirmed)
            .await;

        assert!(matches!(result, Err(OrdersServiceError::Unauthorized)));

        Ok(())
    }

    #[tokio::test]
    async fn baker_cannot_set_delivery_statuses() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let order = ready_order(&ctx, &market).await?;

        let result = ctx
            .orders
            .update_status(market.baker, order, OrderStatus::OutForDelivery)
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InvalidTransition {
                    from: OrderStatus::Ready,
                    to: OrderStatus::OutForDelivery
                })
            ),
            "expected InvalidTransition, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn repeating_a_transition_fails() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let created = ctx
            .orders
            .create_order(market.customer, market.cake_order())
            .await?;
        let order = created.view.order.uuid;

        ctx.orders
            .update_status(market.baker, order, OrderStatus::Confirmed)
            .await?;

        let result = ctx
            .orders
            .update_status(market.baker, order, OrderStatus::Confirmed)
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InvalidTransition { .. } | OrdersServiceError::InvalidState(_))
            ),
            "expected the repeated transition to fail, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn customer_cannot_change_status() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let created = ctx
            .orders
            .create_order(market.customer, market.cake_order())
            .await?;

        let result = ctx
            .orders
            .update_status(market.customer, created.view.order.uuid, OrderStatus::Cancelled)
            .await;

        assert!(matches!(result, Err(OrdersServiceError::Unauthorized)));

        Ok(())
    }

    #[tokio::test]
    async fn update_status_of_missing_order_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let result = ctx
            .orders
            .update_status(market.admin, OrderUuid::new(), OrderStatus::Cancelled)
            .await;

        assert!(matches!(result, Err(OrdersServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn admin_overrides_the_lifecycle() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let created = ctx
            .orders
            .create_order(market.customer, market.cake_order())
            .await?;
        let order = created.view.order.uuid;

        let delivered = ctx
            .orders
            .update_status(market.admin, order, OrderStatus::Delivered)
            .await?;

        assert_eq!(delivered.order.status, OrderStatus::Delivered);

        let reopened = ctx
            .orders
            .update_status(market.admin, order, OrderStatus::Ordered)
            .await?;

        assert_eq!(reopened.order.status, OrderStatus::Ordered);

        Ok(())
    }

    #[tokio::test]
    async fn assignment_sets_worker_and_status_together() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let order = ready_order(&ctx, &market).await?;

        let assigned = ctx
            .orders
            .assign_delivery_worker(market.baker, order, market.courier.user_uuid)
            .await?;

        assert_eq!(assigned.order.status, OrderStatus::OutForDelivery);
        assert_eq!(
            assigned.order.delivery_boy_uuid,
            Some(market.courier.user_uuid)
        );
        assert_eq!(
            assigned.delivery_boy.map(|worker| worker.uuid),
            Some(market.courier.user_uuid)
        );

        let delivered = ctx
            .orders
            .update_status(market.courier, order, OrderStatus::Delivered)
            .await?;

        assert_eq!(delivered.order.status, OrderStatus::Delivered);

        Ok(())
    }

    #[tokio::test]
    async fn assignment_while_baking_is_invalid_state() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let created = ctx
            .orders
            .create_order(market.customer, market.cake_order())
            .await?;
        let order = created.view.order.uuid;

        advance(
            &ctx,
            market.baker,
            order,
            &[OrderStatus::Confirmed, OrderStatus::Baking],
        )
        .await?;

        let result = ctx
            .orders
            .assign_delivery_worker(market.courier, order, market.courier.user_uuid)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidState(_))),
            "expected InvalidState, got {result:?}"
        );

        let unchanged = ctx.orders.get_order(market.admin, order).await?;

        assert_eq!(unchanged.view.order.status, OrderStatus::Baking);
        assert_eq!(unchanged.view.order.delivery_boy_uuid, None);

        Ok(())
    }

    #[tokio::test]
    async fn assignment_by_delivery_worker_is_unauthorized() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let order = ready_order(&ctx, &market).await?;

        let result = ctx
            .orders
            .assign_delivery_worker(market.courier, order, market.courier.user_uuid)
            .await;

        assert!(matches!(result, Err(OrdersServiceError::Unauthorized)));

        Ok(())
    }

    #[tokio::test]
    async fn assignment_to_non_delivery_user_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let order = ready_order(&ctx, &market).await?;

        let result = ctx
            .orders
            .assign_delivery_worker(market.admin, order, market.customer.user_uuid)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::ValidationError(_))),
            "expected ValidationError, got {result:?}"
        );

        let unchanged = ctx.orders.get_order(market.admin, order).await?;

        assert_eq!(unchanged.view.order.status, OrderStatus::Ready);

        Ok(())
    }

    #[tokio::test]
    async fn second_assignment_is_invalid_state() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let order = ready_order(&ctx, &market).await?;

        ctx.orders
            .assign_delivery_worker(market.admin, order, market.courier.user_uuid)
            .await?;

        let result = ctx
            .orders
            .assign_delivery_worker(market.admin, order, market.courier.user_uuid)
            .await;

        assert!(matches!(result, Err(OrdersServiceError::InvalidState(_))));

        Ok(())
    }

    #[tokio::test]
    async fn other_delivery_worker_cannot_touch_assigned_order() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let order = ready_order(&ctx, &market).await?;
        let other = helpers::create_actor(&ctx, Role::Delivery).await?;

        ctx.orders
            .assign_delivery_worker(market.baker, order, market.courier.user_uuid)
            .await?;

        let result = ctx
            .orders
            .update_status(other, order, OrderStatus::Delivered)
            .await;

        assert!(matches!(result, Err(OrdersServiceError::Unauthorized)));

        Ok(())
    }

    #[tokio::test]
    async fn delivery_worker_self_dispatches_unassigned_ready_order() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let order = ready_order(&ctx, &market).await?;

        let dispatched = ctx
            .orders
            .update_status(market.courier, order, OrderStatus::OutForDelivery)
            .await?;

        assert_eq!(dispatched.order.status, OrderStatus::OutForDelivery);
        assert_eq!(dispatched.order.delivery_boy_uuid, None);
        assert!(dispatched.delivery_boy.is_none());

        // Nobody is recorded as the worker, so the order stays off every worker's list.
        let mine = ctx
            .orders
            .list_orders(market.courier, OrderFilter::default())
            .await?;

        assert_eq!(mine.total, 0);

        let other = helpers::create_actor(&ctx, Role::Delivery).await?;

        let delivered = ctx
            .orders
            .update_status(other, order, OrderStatus::Delivered)
            .await?;

        assert_eq!(delivered.order.status, OrderStatus::Delivered);
        assert_eq!(delivered.order.delivery_boy_uuid, None);

        Ok(())
    }

    #[tokio::test]
    async fn status_changed_underneath_update_is_invalid_state() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let created = ctx
            .orders
            .create_order(market.customer, market.cake_order())
            .await?;
        let order = created.view.order.uuid;

        let pool = ctx.db.pool();
        let blocker = hold_status(pool, order, "cancelled").await?;

        let (result, released) = tokio::join!(
            ctx.orders.update_status(market.baker, order, OrderStatus::Confirmed),
            async move {
                let blocked = wait_for_lock_waiter(pool).await?;
                blocker.commit().await?;

                Ok::<bool, sqlx::Error>(blocked)
            }
        );

        assert!(released?, "update should have waited on the row lock");
        assert!(
            matches!(result, Err(OrdersServiceError::InvalidState(_))),
            "expected InvalidState, got {result:?}"
        );

        let current = ctx.orders.get_order(market.admin, order).await?;

        assert_eq!(current.view.order.status, OrderStatus::Cancelled);

        Ok(())
    }

    #[tokio::test]
    async fn status_changed_underneath_assignment_is_invalid_state() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let order = ready_order(&ctx, &market).await?;

        let pool = ctx.db.pool();
        let blocker = hold_status(pool, order, "cancelled").await?;

        let (result, released) = tokio::join!(
            ctx.orders.assign_delivery_worker(market.admin, order, market.courier.user_uuid),
            async move {
                let blocked = wait_for_lock_waiter(pool).await?;
                blocker.commit().await?;

                Ok::<bool, sqlx::Error>(blocked)
            }
        );

        assert!(released?, "assignment should have waited on the row lock");
        assert!(
            matches!(result, Err(OrdersServiceError::InvalidState(_))),
            "expected InvalidState, got {result:?}"
        );

        let current = ctx.orders.get_order(market.admin, order).await?;

        assert_eq!(current.view.order.status, OrderStatus::Cancelled);
        assert_eq!(current.view.order.delivery_boy_uuid, None);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_confirmations_let_exactly_one_through() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let created = ctx
            .orders
            .create_order(market.customer, market.cake_order())
            .await?;
        let order = created.view.order.uuid;

        let (first, second) = tokio::join!(
            ctx.orders.update_status(market.baker, order, OrderStatus::Confirmed),
            ctx.orders.update_status(market.baker, order, OrderStatus::Confirmed),
        );

        assert_eq!(
            usize::from(first.is_ok()) + usize::from(second.is_ok()),
            1,
            "expected exactly one winner, got {first:?} and {second:?}"
        );
        assert!(
            is_lost_race(&first) || is_lost_race(&second),
            "the loser should see a conflict, got {first:?} and {second:?}"
        );

        let current = ctx.orders.get_order(market.admin, order).await?;

        assert_eq!(current.view.order.status, OrderStatus::Confirmed);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_assignments_let_exactly_one_through() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let order = ready_order(&ctx, &market).await?;
        let rival = helpers::create_actor(&ctx, Role::Delivery).await?;

        let (first, second) = tokio::join!(
            ctx.orders.assign_delivery_worker(market.baker, order, market.courier.user_uuid),
            ctx.orders.assign_delivery_worker(market.admin, order, rival.user_uuid),
        );

        assert_eq!(
            usize::from(first.is_ok()) + usize::from(second.is_ok()),
            1,
            "expected exactly one winner, got {first:?} and {second:?}"
        );

        let winner = if first.is_ok() {
            market.courier.user_uuid
        } else {
            rival.user_uuid
        };

        assert!(
            is_lost_race(&first) || is_lost_race(&second),
            "the loser should see a conflict, got {first:?} and {second:?}"
        );

        let current = ctx.orders.get_order(market.admin, order).await?;

        assert_eq!(current.view.order.status, OrderStatus::OutForDelivery);
        assert_eq!(current.view.order.delivery_boy_uuid, Some(winner));

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_is_scoped_by_role() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let other_customer = helpers::create_actor(&ctx, Role::Customer).await?;

        ctx.orders
            .create_order(market.customer, market.cake_order())
            .await?;
        ctx.orders
            .create_order(market.customer, market.cake_order())
            .await?;
        ctx.orders
            .create_order(other_customer, market.cake_order())
            .await?;

        let own = ctx
            .orders
            .list_orders(market.customer, OrderFilter::default())
            .await?;
        let bakery = ctx
            .orders
            .list_orders(market.baker, OrderFilter::default())
            .await?;
        let courier = ctx
            .orders
            .list_orders(market.courier, OrderFilter::default())
            .await?;
        let admin = ctx
            .orders
            .list_orders(market.admin, OrderFilter::default())
            .await?;

        assert_eq!(own.total, 2);
        assert!(
            own.orders
                .iter()
                .all(|view| view.order.customer_uuid == market.customer.user_uuid)
        );
        assert_eq!(bakery.total, 3);
        assert_eq!(courier.total, 0);
        assert_eq!(admin.total, 3);

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_paginates_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let mut placed = Vec::new();

        for _ in 0..3 {
            let created = ctx
                .orders
                .create_order(market.customer, market.cake_order())
                .await?;

            placed.push(created.view.order.uuid);
        }

        let filter = OrderFilter {
            status: None,
            page: 1,
            limit: 2,
        };

        let first = ctx.orders.list_orders(market.customer, filter).await?;
        let second = ctx
            .orders
            .list_orders(market.customer, OrderFilter { page: 2, ..filter })
            .await?;

        assert_eq!(first.total, 3);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.current_page, 1);
        assert_eq!(first.orders.len(), 2);
        assert_eq!(first.orders[0].order.uuid, placed[2]);
        assert_eq!(second.orders.len(), 1);
        assert_eq!(second.orders[0].order.uuid, placed[0]);

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_filters_by_status() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        ready_order(&ctx, &market).await?;
        ctx.orders
            .create_order(market.customer, market.cake_order())
            .await?;

        let ready = ctx
            .orders
            .list_orders(
                market.baker,
                OrderFilter {
                    status: Some(OrderStatus::Ready),
                    ..OrderFilter::default()
                },
            )
            .await?;

        assert_eq!(ready.total, 1);
        assert_eq!(ready.orders[0].order.status, OrderStatus::Ready);

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_rejects_bad_pagination() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        for filter in [
            OrderFilter {
                page: 0,
                ..OrderFilter::default()
            },
            OrderFilter {
                limit: 0,
                ..OrderFilter::default()
            },
            OrderFilter {
                limit: 101,
                ..OrderFilter::default()
            },
        ] {
            let result = ctx.orders.list_orders(market.customer, filter).await;

            assert!(
                matches!(result, Err(OrdersServiceError::ValidationError(_))),
                "expected ValidationError for {filter:?}, got {result:?}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_for_baker_without_bakery_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let baker = helpers::create_actor(&ctx, Role::Baker).await?;

        let result = ctx.orders.list_orders(baker, OrderFilter::default()).await;

        assert!(matches!(result, Err(OrdersServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn summary_counts_orders_and_delivered_revenue() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;
        let order = ready_order(&ctx, &market).await?;

        ctx.orders
            .assign_delivery_worker(market.baker, order, market.courier.user_uuid)
            .await?;
        ctx.orders
            .update_status(market.courier, order, OrderStatus::Delivered)
            .await?;
        ctx.orders
            .create_order(market.customer, market.cake_order())
            .await?;

        let summary = ctx.orders.order_summary(market.baker).await?;

        assert_eq!(summary.total_orders, 2);
        assert_eq!(summary.count_for(OrderStatus::Delivered), 1);
        assert_eq!(summary.count_for(OrderStatus::Ordered), 1);
        assert_eq!(summary.delivered_revenue, 40);

        let courier = ctx.orders.order_summary(market.courier).await?;

        assert_eq!(courier.total_orders, 1);

        Ok(())
    }

    #[tokio::test]
    async fn get_missing_order_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let market = Marketplace::seed(&ctx).await?;

        let result = ctx.orders.get_order(market.customer, OrderUuid::new()).await;

        assert!(matches!(result, Err(OrdersServiceError::NotFound)));

        Ok(())
    }
}
