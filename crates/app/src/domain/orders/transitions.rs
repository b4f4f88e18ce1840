//! Role-gated order status transitions.

use thiserror::Error;

use crate::domain::{orders::status::OrderStatus, users::records::Role};

/// Statuses a role may request, before the graph is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGrant {
    /// Moderation override: any status, graph ignored.
    Any,
    /// These targets, each reachable only along a forward edge.
    Only(&'static [OrderStatus]),

    /// No status changes at all.
    Nothing,
}

const BAKER_TARGETS: &[OrderStatus] = &[
    OrderStatus::Confirmed,
    OrderStatus::Baking,
    OrderStatus::Ready,
    OrderStatus::Cancelled,
];

const DELIVERY_TARGETS: &[OrderStatus] = &[OrderStatus::OutForDelivery, OrderStatus::Delivered];

/// The grant `role` holds over order statuses.
#[must_use]
pub const fn grant_for(role: Role) -> RoleGrant {
    match role {
        Role::Baker => RoleGrant::Only(BAKER_TARGETS),
        Role::Delivery => RoleGrant::Only(DELIVERY_TARGETS),
        Role::Admin => RoleGrant::Any,
        Role::Customer => RoleGrant::Nothing,
    }
}

/// Whether `from -> to` is an edge of the lifecycle graph.
#[must_use]
pub const fn is_forward_edge(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::{Baking, Cancelled, Confirmed, Delivered, OutForDelivery, Ordered, Ready};

    matches!(
        (from, to),
        (Ordered, Confirmed)
            | (Confirmed, Baking)
            | (Baking, Ready)
            | (Ready, OutForDelivery)
            | (OutForDelivery, Delivered)
            | (Ordered | Confirmed | Baking | Ready, Cancelled)
    )
}

/// Why a status change was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The role may not change statuses at all.
    #[error("{0} users cannot change order status")]
    Forbidden(Role),

    /// The target is outside the role's grant or not reachable from `from`.
    #[error("cannot move order from {from} to {to}")]
    NotAllowed { from: OrderStatus, to: OrderStatus },
}

/// Check that `role` may move an order from `from` to `to`.
///
/// Ownership and assignment are the caller's concern; this only consults the role table
/// and the lifecycle graph.
///
/// # Errors
///
/// [`TransitionError::Forbidden`] for roles without any grant and
/// [`TransitionError::NotAllowed`] when the target is outside the grant or not a
/// forward edge from the current status.
pub fn check_transition(
    role: Role,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<(), TransitionError> {
    match grant_for(role) {
        RoleGrant::Any => Ok(()),
        RoleGrant::Nothing => Err(TransitionError::Forbidden(role)),
        RoleGrant::Only(targets) if targets.contains(&to) && is_forward_edge(from, to) => Ok(()),
        RoleGrant::Only(_) => Err(TransitionError::NotAllowed { from, to }),
    }
}
