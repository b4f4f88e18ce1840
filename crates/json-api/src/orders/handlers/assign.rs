//! Assign Delivery Worker Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    observability::record_status_change,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Assign Delivery Worker Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AssignDeliveryRequest {
    pub delivery_boy_uuid: Uuid,
}

/// Assign Delivery Worker Handler
///
/// Hands a ready order to a delivery worker and moves it out for delivery.
#[endpoint(
    tags("orders"),
    summary = "Assign Delivery Worker",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order assigned"),
        (status_code = StatusCode::BAD_REQUEST, description = "Worker is not a delivery user"),
        (status_code = StatusCode::FORBIDDEN, description = "Not allowed to act on this order"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order is not ready for delivery"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.assign",
    skip(order, json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty,
        delivery_boy_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<AssignDeliveryRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let order = order.into_inner();
    let worker = json.into_inner().delivery_boy_uuid;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(actor.user_uuid));
    span.record("order_uuid", tracing::field::display(order));
    span.record("delivery_boy_uuid", tracing::field::display(worker));

    let view = state
        .app
        .orders
        .assign_delivery_worker(actor, order.into(), worker.into())
        .await
        .map_err(into_status_error)?;

    record_status_change(view.order.status);

    Ok(Json(view.into()))
}
