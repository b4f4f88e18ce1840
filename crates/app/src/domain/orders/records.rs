//! Order Records

use jiff::{Timestamp, civil::Date};

use crate::{
    domain::{
        bakeries::records::BakeryUuid,
        orders::status::{EggType, OrderStatus, PaymentMethod, PaymentStatus},
        products::records::ProductUuid,
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub customer_uuid: UserUuid,
    pub bakery_uuid: BakeryUuid,
    pub delivery_boy_uuid: Option<UserUuid>,
    pub total_amount: u64,
    pub status: OrderStatus,
    pub delivery_date: Date,
    pub delivery_time: String,
    pub delivery_address: String,
    pub customer_phone: String,
    pub special_instructions: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub quantity: u32,

    /// Unit price captured when the order was placed.
    pub price: u64,
    pub weight: String,
    pub egg_type: EggType,
    pub custom_message: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSummary {
    pub uuid: UserUuid,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BakerySummary {
    pub uuid: BakeryUuid,
    pub bakery_name: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryWorkerSummary {
    pub uuid: UserUuid,
    pub name: String,
    pub phone: String,
}

/// An order with the parties it references resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub order: OrderRecord,
    pub customer: CustomerSummary,
    pub bakery: BakerySummary,
    pub delivery_boy: Option<DeliveryWorkerSummary>,
}

/// An order view together with its line items.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub view: OrderView,
    pub items: Vec<OrderItemRecord>,
}

/// One page of orders, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPage {
    pub orders: Vec<OrderView>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTally {
    pub status: OrderStatus,
    pub count: u64,
    pub amount: u64,
}

/// Dashboard figures over the orders an actor can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    /// One entry per status, zeroes included.
    pub tallies: Vec<StatusTally>,
    pub total_orders: u64,
    pub delivered_revenue: u64,
}

impl OrderSummary {
    /// Fill the per-status table from the grouped rows storage returned.
    #[must_use]
    pub fn from_tallies(found: &[StatusTally]) -> Self {
        let tallies: Vec<StatusTally> = OrderStatus::ALL
            .into_iter()
            .map(|status| {
                found
                    .iter()
                    .find(|tally| tally.status == status)
                    .copied()
                    .unwrap_or(StatusTally {
                        status,
                        count: 0,
                        amount: 0,
                    })
            })
            .collect();

        let total_orders = tallies.iter().map(|tally| tally.count).sum();

        let delivered_revenue = tallies
            .iter()
            .find(|tally| tally.status == OrderStatus::Delivered)
            .map_or(0, |tally| tally.amount);

        Self {
            tallies,
            total_orders,
            delivered_revenue,
        }
    }

    #[must_use]
    pub fn count_for(&self, status: OrderStatus) -> u64 {
        self.tallies
            .iter()
            .find(|tally| tally.status == status)
            .map_or(0, |tally| tally.count)
    }
}
