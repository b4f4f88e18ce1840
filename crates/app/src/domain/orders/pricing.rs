//! Cart pricing.
//!
//! Prices every cart line against the live catalogue. Nothing here touches storage, so
//! the service can fetch the products first and validate the whole cart before writing.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::domain::{
    orders::{data::NewOrderLine, status::EggType},
    products::records::{ProductRecord, ProductUuid},
};

/// Largest quantity a single line may carry.
pub const MAX_LINE_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Largest amount the `BIGINT` money columns can hold.
pub const MAX_AMOUNT: u64 = i64::MAX.unsigned_abs();

/// Reasons a cart cannot be priced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The cart has no lines.
    #[error("order has no items")]
    EmptyOrder,

    /// A line quantity is zero or above [`MAX_LINE_QUANTITY`].
    #[error("quantity for product {product} must be between 1 and {MAX_LINE_QUANTITY}")]
    InvalidQuantity { product: ProductUuid },

    /// The product does not exist or is not for sale.
    #[error("product {0} is not available")]
    ProductUnavailable(ProductUuid),

    /// The product does not offer the requested weight.
    #[error("product {product} has no \"{weight}\" weight option")]
    InvalidWeightOption { product: ProductUuid, weight: String },

    /// A line total or the order total exceeds [`MAX_AMOUNT`].
    #[error("order total is too large")]
    Overflow,
}

/// A cart line with its server-side unit price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    /// Product being ordered.
    pub product_uuid: ProductUuid,

    /// Units ordered, between 1 and [`MAX_LINE_QUANTITY`].
    pub quantity: u32,

    /// Unit price of the matched weight option.
    pub price: u64,

    /// Weight option label.
    pub weight: String,

    /// Requested egg preference.
    pub egg_type: EggType,

    /// Optional message to write on the product.
    pub custom_message: Option<String>,
}

impl PricedLine {
    fn line_total(&self) -> Option<u64> {
        self.price
            .checked_mul(u64::from(self.quantity))
            .filter(|total| *total <= MAX_AMOUNT)
    }
}

/// A fully priced cart, ready to be written as one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCart {
    /// Priced lines in request order.
    pub lines: Vec<PricedLine>,

    /// Sum of every line total, never above [`MAX_AMOUNT`].
    pub total_amount: u64,
}

/// Price `lines` against `catalogue`, failing on the first invalid line.
///
/// # Errors
///
/// - [`PricingError::EmptyOrder`] when there are no lines.
/// - [`PricingError::InvalidQuantity`] when a quantity is zero or too large to store.
/// - [`PricingError::ProductUnavailable`] when a product is missing or not for sale.
/// - [`PricingError::InvalidWeightOption`] when the weight label is not offered.
/// - [`PricingError::Overflow`] when a line or the order total exceeds [`MAX_AMOUNT`].
pub fn price_cart(
    lines: &[NewOrderLine],
    catalogue: &FxHashMap<ProductUuid, ProductRecord>,
) -> Result<PricedCart, PricingError> {
    if lines.is_empty() {
        return Err(PricingError::EmptyOrder);
    }

    let mut priced = Vec::with_capacity(lines.len());
    let mut total_amount: u64 = 0;

    for line in lines {
        if line.quantity == 0 || line.quantity > MAX_LINE_QUANTITY {
            return Err(PricingError::InvalidQuantity {
                product: line.product_uuid,
            });
        }

        let product = catalogue
            .get(&line.product_uuid)
            .filter(|product| product.is_available)
            .ok_or(PricingError::ProductUnavailable(line.product_uuid))?;

        let price =
            product
                .price_for(&line.weight)
                .ok_or_else(|| PricingError::InvalidWeightOption {
                    product: line.product_uuid,
                    weight: line.weight.clone(),
                })?;

        let priced_line = PricedLine {
            product_uuid: line.product_uuid,
            quantity: line.quantity,
            price,
            weight: line.weight.clone(),
            egg_type: line.egg_type,
            custom_message: line.custom_message.clone(),
        };

        total_amount = priced_line
            .line_total()
            .and_then(|line_total| total_amount.checked_add(line_total))
            .filter(|total| *total <= MAX_AMOUNT)
            .ok_or(PricingError::Overflow)?;

        priced.push(priced_line);
    }

    Ok(PricedCart {
        lines: priced,
        total_amount,
    })
}
