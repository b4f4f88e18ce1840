//! Order Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use bakehouse_app::domain::orders::data::OrderFilter;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrdersResponse},
    state::State,
};

/// Order Index Handler
///
/// Returns one page of the orders the caller can see, newest first.
#[endpoint(
    tags("orders"),
    summary = "List My Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Orders page"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid status or pagination"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let defaults = OrderFilter::default();

    let filter = OrderFilter {
        status: status.into_status_filter()?,
        page: page.into_inner().unwrap_or(defaults.page),
        limit: limit.into_inner().unwrap_or(defaults.limit),
    };

    let page = state
        .app
        .orders
        .list_orders(actor, filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}
