//! Order Summary Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderSummaryResponse},
    state::State,
};

/// Order Summary Handler
///
/// Per-status counts and amounts over the orders the caller can see.
#[endpoint(
    tags("orders"),
    summary = "Order Summary",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order summary"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrderSummaryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let summary = state
        .app
        .orders
        .order_summary(actor)
        .await
        .map_err(into_status_error)?;

    Ok(Json(summary.into()))
}
