//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    orders::{pricing::PricingError, status::OrderStatus, transitions::TransitionError},
    products::records::ProductUuid,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("not allowed to act on this order")]
    Unauthorized,

    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("{0}")]
    InvalidState(&'static str),

    #[error("order has no items")]
    EmptyOrder,

    #[error("product {0} is not available")]
    ProductUnavailable(ProductUuid),

    #[error("product {product} has no \"{weight}\" weight option")]
    InvalidWeightOption { product: ProductUuid, weight: String },

    #[error("{0}")]
    ValidationError(String),

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<PricingError> for OrdersServiceError {
    fn from(error: PricingError) -> Self {
        match error {
            PricingError::EmptyOrder => Self::EmptyOrder,
            PricingError::ProductUnavailable(product) => Self::ProductUnavailable(product),
            PricingError::InvalidWeightOption { product, weight } => {
                Self::InvalidWeightOption { product, weight }
            }
            PricingError::InvalidQuantity { .. } | PricingError::Overflow => {
                Self::ValidationError(error.to_string())
            }
        }
    }
}

impl From<TransitionError> for OrdersServiceError {
    fn from(error: TransitionError) -> Self {
        match error {
            TransitionError::Forbidden(_) => Self::Unauthorized,
            TransitionError::NotAllowed { from, to } => Self::InvalidTransition { from, to },
        }
    }
}
