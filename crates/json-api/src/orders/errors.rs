//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use bakehouse_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Unauthorized => {
            StatusError::forbidden().brief("Not allowed to act on this order")
        }
        OrdersServiceError::InvalidTransition { from, to } => StatusError::bad_request()
            .brief("Invalid status transition")
            .detail(format!("cannot move order from {from} to {to}")),
        OrdersServiceError::InvalidState(reason) => {
            StatusError::conflict().brief("Order is not in a valid state").detail(reason)
        }
        OrdersServiceError::EmptyOrder => StatusError::bad_request().brief("Order has no items"),
        error @ OrdersServiceError::ProductUnavailable(_) => StatusError::bad_request()
            .brief("Product is not available")
            .detail(error.to_string()),
        error @ OrdersServiceError::InvalidWeightOption { .. } => StatusError::bad_request()
            .brief("Invalid weight option")
            .detail(error.to_string()),
        OrdersServiceError::ValidationError(reason) => {
            StatusError::bad_request().brief("Invalid order payload").detail(reason)
        }
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order data")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
