//! Bakery Records

use jiff::Timestamp;

use crate::{domain::users::records::UserUuid, uuids::TypedUuid};

/// Bakery UUID
pub type BakeryUuid = TypedUuid<BakeryRecord>;

/// Bakery Record
#[derive(Debug, Clone)]
pub struct BakeryRecord {
    pub uuid: BakeryUuid,

    /// The baker who runs this bakery. A baker owns at most one bakery.
    pub owner_uuid: UserUuid,

    pub bakery_name: String,
    pub city: String,
    pub address: String,
    pub description: Option<String>,

    /// Average rating in `0.0..=5.0`.
    pub rating: f64,

    /// Unapproved bakeries are hidden from public listings.
    pub is_approved: bool,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
