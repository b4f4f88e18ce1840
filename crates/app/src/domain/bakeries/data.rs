//! Bakery Data

use crate::domain::{bakeries::records::BakeryUuid, users::records::UserUuid};

/// New Bakery Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewBakery {
    pub uuid: BakeryUuid,
    pub owner_uuid: UserUuid,
    pub bakery_name: String,
    pub city: String,
    pub address: String,
    pub description: Option<String>,
}
