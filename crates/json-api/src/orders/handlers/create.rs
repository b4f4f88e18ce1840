//! Create Order Handler

use std::sync::Arc;

use jiff::civil::Date;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bakehouse_app::domain::orders::{
    data::{DeliveryDetails, NewOrder, NewOrderLine},
    records::OrderUuid,
    status::{EggType, PaymentMethod},
};

use crate::{
    extensions::*,
    observability::record_order_placed,
    orders::{errors::into_status_error, models::OrderDetailsResponse},
    state::State,
};

/// One cart line. Any price sent by the client is ignored.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderItemRequest {
    pub product_uuid: Uuid,
    pub quantity: u32,

    /// Weight option label, e.g. `1kg`
    pub weight: String,

    /// `egg` or `eggless`
    pub egg_type: String,

    #[serde(default)]
    pub custom_message: Option<String>,
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub bakery_uuid: Uuid,
    pub items: Vec<CreateOrderItemRequest>,

    /// Requested delivery day, `YYYY-MM-DD`
    pub delivery_date: String,
    pub delivery_time: String,
    pub delivery_address: String,
    pub customer_phone: String,

    #[serde(default)]
    pub special_instructions: Option<String>,

    /// `cod` or `online`, defaults to `cod`
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl CreateOrderRequest {
    fn into_new_order(self) -> Result<NewOrder, StatusError> {
        let items = self
            .items
            .into_iter()
            .map(|item| {
                Ok(NewOrderLine {
                    product_uuid: item.product_uuid.into(),
                    quantity: item.quantity,
                    weight: item.weight,
                    egg_type: item.egg_type.parse::<EggType>().or_400("Invalid egg type")?,
                    custom_message: item.custom_message,
                })
            })
            .collect::<Result<Vec<_>, StatusError>>()?;

        let delivery_date = self
            .delivery_date
            .parse::<Date>()
            .or_400("Invalid delivery date")?;

        let payment_method = self
            .payment_method
            .as_deref()
            .map(str::parse::<PaymentMethod>)
            .transpose()
            .or_400("Invalid payment method")?
            .unwrap_or_default();

        Ok(NewOrder {
            uuid: OrderUuid::new(),
            bakery_uuid: self.bakery_uuid.into(),
            items,
            delivery: DeliveryDetails {
                delivery_date,
                delivery_time: self.delivery_time,
                delivery_address: self.delivery_address,
                customer_phone: self.customer_phone,
                special_instructions: self.special_instructions,
            },
            payment_method,
        })
    }
}

/// Create Order Handler
///
/// Prices the cart from the current catalogue and places the order.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid cart or delivery details"),
        (status_code = StatusCode::FORBIDDEN, description = "Only customers place orders"),
        (status_code = StatusCode::NOT_FOUND, description = "Bakery not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderDetailsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let order = json.into_inner().into_new_order()?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(actor.user_uuid));
    span.record("order_uuid", tracing::field::display(order.uuid));

    let details = state
        .app
        .orders
        .create_order(actor, order)
        .await
        .map_err(into_status_error)?;

    record_order_placed();

    res.add_header(
        LOCATION,
        format!("/orders/{}", details.view.order.uuid),
        true,
    )
    .or_500("failed to set location header")?
    .status_code(StatusCode::CREATED);

    Ok(Json(details.into()))
}
