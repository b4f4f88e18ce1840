//! Order response models

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bakehouse_app::domain::orders::records::{
    BakerySummary, CustomerSummary, DeliveryWorkerSummary, OrderDetails, OrderItemRecord,
    OrderPage, OrderSummary, OrderView,
};

/// A user attached to an order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PersonResponse {
    pub uuid: Uuid,
    pub name: String,
    pub phone: String,
}

impl From<CustomerSummary> for PersonResponse {
    fn from(customer: CustomerSummary) -> Self {
        PersonResponse {
            uuid: customer.uuid.into(),
            name: customer.name,
            phone: customer.phone,
        }
    }
}

impl From<DeliveryWorkerSummary> for PersonResponse {
    fn from(worker: DeliveryWorkerSummary) -> Self {
        PersonResponse {
            uuid: worker.uuid.into(),
            name: worker.name,
            phone: worker.phone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BakeryResponse {
    pub uuid: Uuid,
    pub bakery_name: String,
    pub city: String,
}

impl From<BakerySummary> for BakeryResponse {
    fn from(bakery: BakerySummary) -> Self {
        BakeryResponse {
            uuid: bakery.uuid.into(),
            bakery_name: bakery.bakery_name,
            city: bakery.city,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    pub customer: PersonResponse,

    pub bakery: BakeryResponse,

    /// The assigned delivery worker, once the order is out for delivery
    pub delivery_boy: Option<PersonResponse>,

    /// Server-computed total in minor currency units
    pub total_amount: u64,

    pub status: String,

    /// Requested delivery day, `YYYY-MM-DD`
    pub delivery_date: String,

    pub delivery_time: String,

    pub delivery_address: String,

    pub customer_phone: String,

    pub special_instructions: Option<String>,

    pub payment_method: String,

    pub payment_status: String,

    /// The date and time the order was placed
    pub created_at: String,

    /// The date and time the order last changed
    pub updated_at: String,
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        let OrderView {
            order,
            customer,
            bakery,
            delivery_boy,
        } = view;

        OrderResponse {
            uuid: order.uuid.into(),
            customer: customer.into(),
            bakery: bakery.into(),
            delivery_boy: delivery_boy.map(Into::into),
            total_amount: order.total_amount,
            status: order.status.to_string(),
            delivery_date: order.delivery_date.to_string(),
            delivery_time: order.delivery_time,
            delivery_address: order.delivery_address,
            customer_phone: order.customer_phone,
            special_instructions: order.special_instructions,
            payment_method: label(order.payment_method),
            payment_status: label(order.payment_status),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub product_name: String,
    pub quantity: u32,

    /// Unit price captured when the order was placed
    pub price: u64,

    pub weight: String,
    pub egg_type: String,
    pub custom_message: Option<String>,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.price,
            weight: item.weight,
            egg_type: label(item.egg_type),
            custom_message: item.custom_message,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderDetailsResponse {
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderDetails> for OrderDetailsResponse {
    fn from(details: OrderDetails) -> Self {
        OrderDetailsResponse {
            order: details.view.into(),
            items: details.items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub orders: Vec<OrderResponse>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

impl From<OrderPage> for OrdersResponse {
    fn from(page: OrderPage) -> Self {
        OrdersResponse {
            orders: page.orders.into_iter().map(Into::into).collect(),
            total: page.total,
            total_pages: page.total_pages,
            current_page: page.current_page,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatusCountResponse {
    pub status: String,
    pub count: u64,
    pub amount: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderSummaryResponse {
    /// One entry per order status, zero when no order has it
    pub statuses: Vec<StatusCountResponse>,
    pub total_orders: u64,

    /// Sum of `total_amount` over delivered orders
    pub delivered_revenue: u64,
}

impl From<OrderSummary> for OrderSummaryResponse {
    fn from(summary: OrderSummary) -> Self {
        OrderSummaryResponse {
            statuses: summary
                .tallies
                .iter()
                .map(|tally| StatusCountResponse {
                    status: tally.status.to_string(),
                    count: tally.count,
                    amount: tally.amount,
                })
                .collect(),
            total_orders: summary.total_orders,
            delivered_revenue: summary.delivered_revenue,
        }
    }
}

/// The snake_case wire label of a closed enum.
fn label<T: Serialize>(value: T) -> String {
    serde_json::to_value(value)
        .ok()
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use bakehouse_app::domain::orders::status::{EggType, PaymentMethod, PaymentStatus};

    use super::*;

    #[test]
    fn labels_use_wire_names() {
        assert_eq!(label(PaymentMethod::Cod), "cod");
        assert_eq!(label(PaymentStatus::Pending), "pending");
        assert_eq!(label(EggType::Eggless), "eggless");
    }
}
