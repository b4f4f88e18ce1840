//! Order status query parsing helpers.

use bakehouse_app::domain::orders::status::OrderStatus;
use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use crate::extensions::*;

pub(crate) trait StatusParamExt {
    fn into_status_filter(self) -> Result<Option<OrderStatus>, StatusError>;
}

impl StatusParamExt for QueryParam<String, false> {
    fn into_status_filter(self) -> Result<Option<OrderStatus>, StatusError> {
        self.into_inner()
            .filter(|value| !value.is_empty())
            .map(|value| value.parse::<OrderStatus>())
            .transpose()
            .or_400("could not parse \"status\" query parameter")
    }
}
