//! App Router

use salvo::Router;

use crate::{auth, orders};

pub(crate) fn app_router() -> Router {
    Router::new().hoop(auth::middleware::handler).push(
        Router::with_path("orders")
            .post(orders::create::handler)
            .push(Router::with_path("my").get(orders::index::handler))
            .push(Router::with_path("summary").get(orders::summary::handler))
            .push(
                Router::with_path("{order}")
                    .get(orders::get::handler)
                    .push(Router::with_path("status").put(orders::status::handler))
                    .push(Router::with_path("assign").put(orders::assign::handler)),
            ),
    )
}
