//! Orders
//!
//! Order creation prices a cart against the live catalogue. After that only the
//! lifecycle operations of [`OrdersService`] change an order, and only its status and
//! assigned delivery worker.

pub mod data;
pub mod errors;
pub mod pricing;
pub mod records;
mod repositories;
pub mod service;
pub mod status;
pub mod transitions;

pub use errors::OrdersServiceError;
pub use service::*;
