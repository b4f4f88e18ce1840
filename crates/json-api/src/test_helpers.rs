//! Test helpers.

use std::sync::Arc;

use bakehouse_app::{
    auth::{Actor, MockAuthService},
    context::AppContext,
    domain::{
        orders::MockOrdersService,
        users::records::{Role, UserUuid},
    },
};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER: Actor =
    Actor::new(UserUuid::from_uuid(Uuid::from_u128(1)), Role::Customer);

pub(crate) const TEST_BAKER: Actor =
    Actor::new(UserUuid::from_uuid(Uuid::from_u128(2)), Role::Baker);

pub(crate) const TEST_COURIER: Actor =
    Actor::new(UserUuid::from_uuid(Uuid::from_u128(3)), Role::Delivery);

pub(crate) const TEST_ADMIN: Actor =
    Actor::new(UserUuid::from_uuid(Uuid::from_u128(4)), Role::Admin);

/// Stands in for the auth middleware with a fixed actor.
pub(crate) struct InjectActor(pub(crate) Actor);

#[salvo::handler]
impl InjectActor {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_actor(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_create_order().never();
    orders.expect_list_orders().never();
    orders.expect_get_order().never();
    orders.expect_order_summary().never();
    orders.expect_update_status().never();
    orders.expect_assign_delivery_worker().never();

    orders
}

fn state(orders: MockOrdersService, auth: MockAuthService) -> Arc<State> {
    State::from_app_context(AppContext {
        orders: Arc::new(orders),
        auth: Arc::new(auth),
    })
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state(strict_orders_mock(), auth)
}

pub(crate) fn orders_service_as(actor: Actor, orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(orders, strict_auth_mock())))
            .hoop(InjectActor(actor))
            .push(route),
    )
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    orders_service_as(TEST_CUSTOMER, orders, route)
}
