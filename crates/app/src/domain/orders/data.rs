//! Orders Data

use jiff::civil::Date;

use crate::domain::{
    bakeries::records::BakeryUuid,
    orders::{
        records::OrderUuid,
        status::{EggType, OrderStatus, PaymentMethod},
    },
    products::records::ProductUuid,
    users::records::UserUuid,
};

/// Default page size for order listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Largest page size a listing accepts.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// A checkout request. Prices are never part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub bakery_uuid: BakeryUuid,
    pub items: Vec<NewOrderLine>,
    pub delivery: DeliveryDetails,
    pub payment_method: PaymentMethod,
}

/// One cart line: a product, the weight tier and how many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub weight: String,
    pub egg_type: EggType,
    pub custom_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryDetails {
    pub delivery_date: Date,
    pub delivery_time: String,
    pub delivery_address: String,
    pub customer_phone: String,
    pub special_instructions: Option<String>,
}

/// Listing filter: optional status plus 1-based pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub page: u32,
    pub limit: u32,
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            status: None,
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl OrderFilter {
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    #[must_use]
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit.max(1)))
    }
}

/// Which orders an actor can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OrderScope {
    All,
    Customer(UserUuid),
    Bakery(BakeryUuid),
    DeliveryWorker(UserUuid),
}
