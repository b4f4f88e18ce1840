//! Order Handlers

pub(crate) mod assign;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod status;
pub(crate) mod summary;
