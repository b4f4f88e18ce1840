//! Order status and the other closed order enums.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where an order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed by the customer, not yet seen by the bakery.
    Ordered,
    /// Accepted by the bakery.
    Confirmed,
    /// In the oven.
    Baking,
    /// Waiting for a delivery worker.
    Ready,
    /// On its way to the customer.
    OutForDelivery,
    /// Handed over.
    Delivered,
    /// Abandoned before delivery.
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order with `Cancelled` last.
    pub const ALL: [Self; 7] = [
        Self::Ordered,
        Self::Confirmed,
        Self::Baking,
        Self::Ready,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Label used in storage and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ordered => "ordered",
            Self::Confirmed => "confirmed",
            Self::Baking => "baking",
            Self::Ready => "ready",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// No transition leaves a terminal status except an admin override.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A label that names no [`OrderStatus`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status \"{0}\"")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownOrderStatus(value.to_string()))
    }
}

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cod,
    /// Paid online.
    Online,
}

/// Recorded only; nothing settles payments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Not settled yet.
    #[default]
    Pending,
    /// Settled.
    Paid,
    /// Settlement failed.
    Failed,
}

/// Egg variant chosen for a single order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "egg_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EggType {
    /// Made with eggs.
    Egg,
    /// Made without eggs.
    Eggless,
}

/// A label outside one of the closed order enums.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} \"{value}\"")]
pub struct UnknownLabel {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected label.
    pub value: String,
}

impl FromStr for EggType {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "egg" => Ok(Self::Egg),
            "eggless" => Ok(Self::Eggless),
            other => Err(UnknownLabel {
                kind: "egg type",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cod" => Ok(Self::Cod),
            "online" => Ok(Self::Online),
            other => Err(UnknownLabel {
                kind: "payment method",
                value: other.to_string(),
            }),
        }
    }
}
