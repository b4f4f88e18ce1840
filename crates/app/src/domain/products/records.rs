//! Product Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{domain::bakeries::records::BakeryUuid, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// A weight tier a product is sold under, e.g. `"1kg"` at 2000.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightOption {
    pub weight: String,
    pub price: u64,
}

pub type WeightOptions = SmallVec<[WeightOption; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Cake,
    Pastry,
    Cookie,
    Custom,
}

/// Egg variants a product can be baked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_egg_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductEggType {
    Egg,
    Eggless,
    Both,
}

#[derive(Debug, Error)]
#[error("unknown {kind} \"{value}\"")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for ProductCategory {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cake" => Ok(Self::Cake),
            "pastry" => Ok(Self::Pastry),
            "cookie" => Ok(Self::Cookie),
            "custom" => Ok(Self::Custom),
            other => Err(UnknownVariant {
                kind: "product category",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for ProductEggType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "egg" => Ok(Self::Egg),
            "eggless" => Ok(Self::Eggless),
            "both" => Ok(Self::Both),
            other => Err(UnknownVariant {
                kind: "egg type",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cake => "cake",
            Self::Pastry => "pastry",
            Self::Cookie => "cookie",
            Self::Custom => "custom",
        })
    }
}

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub bakery_uuid: BakeryUuid,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub egg_type: ProductEggType,
    pub weight_options: WeightOptions,
    pub is_available: bool,
    pub custom_message_available: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductRecord {
    /// Current unit price for the given weight label.
    #[must_use]
    pub fn price_for(&self, weight: &str) -> Option<u64> {
        self.weight_options
            .iter()
            .find(|option| option.weight == weight)
            .map(|option| option.price)
    }
}
