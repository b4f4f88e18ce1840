//! Products Data

use std::str::FromStr;

use thiserror::Error;

use crate::domain::{
    bakeries::records::BakeryUuid,
    products::records::{ProductCategory, ProductEggType, ProductUuid, WeightOption, WeightOptions},
};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub bakery_uuid: BakeryUuid,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub egg_type: ProductEggType,
    pub weight_options: WeightOptions,
    pub is_available: bool,
    pub custom_message_available: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeightOptionParseError {
    #[error("expected WEIGHT=PRICE, e.g. 1kg=2000")]
    MissingSeparator,

    #[error("weight label cannot be empty")]
    EmptyWeight,

    #[error("price must be a non-negative integer amount")]
    InvalidPrice,
}

impl FromStr for WeightOption {
    type Err = WeightOptionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (weight, price) = value
            .split_once('=')
            .ok_or(WeightOptionParseError::MissingSeparator)?;

        let weight = weight.trim();

        if weight.is_empty() {
            return Err(WeightOptionParseError::EmptyWeight);
        }

        let price = price
            .trim()
            .parse::<u64>()
            .map_err(|_parse_error| WeightOptionParseError::InvalidPrice)?;

        Ok(Self {
            weight: weight.to_string(),
            price,
        })
    }
}
