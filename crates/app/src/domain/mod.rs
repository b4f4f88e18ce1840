//! Bakery marketplace domain concerns.

pub mod bakeries;
pub mod orders;
pub mod products;
pub mod users;
