//! Status and discriminator enums for marketplace entities.

use serde::{Deserialize, Serialize};

/// Delivery status of an order.
///
/// Statuses form a fixed sequence; an order only ever moves forward
/// through it. There is no cancellation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
    Preparing,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const SEQUENCE: [Self; 5] = [
        Self::Pending,
        Self::Accepted,
        Self::Preparing,
        Self::OutForDelivery,
        Self::Delivered,
    ];

    /// Position of this status in [`Self::SEQUENCE`].
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Accepted => 1,
            Self::Preparing => 2,
            Self::OutForDelivery => 3,
            Self::Delivered => 4,
        }
    }

    /// The status that directly follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Accepted),
            Self::Accepted => Some(Self::Preparing),
            Self::Preparing => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// Whether an order in this status may move to `target`.
    ///
    /// Only strictly forward moves are allowed. Intermediate statuses may be
    /// skipped (a courier can pick up an accepted order before the store
    /// marks it as preparing).
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        target.rank() > self.rank()
    }

    /// Whether the order has reached the end of its lifecycle.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Wire name, as used in URLs and serialized data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Preparing => "preparing",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
        }
    }

    /// Human-readable label for status badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Preparing => "Preparing",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SEQUENCE
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// The kind of account a user signed up as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserKind {
    #[default]
    Customer,
    Store,
    Delivery,
}

impl UserKind {
    /// Wire name, as used in URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Store => "store",
            Self::Delivery => "delivery",
        }
    }

    /// Display name used before a real name is known.
    #[must_use]
    pub const fn default_display_name(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Store => "Store Owner",
            Self::Delivery => "Delivery Partner",
        }
    }

    /// Where a user of this kind lands after logging in.
    #[must_use]
    pub const fn home_path(self) -> &'static str {
        match self {
            Self::Customer => "/location",
            Self::Store => "/store/dashboard",
            Self::Delivery => "/delivery/orders",
        }
    }

    /// Where a user of this kind continues after signing up.
    #[must_use]
    pub const fn onboarding_path(self) -> &'static str {
        match self {
            Self::Customer => "/location",
            Self::Store => "/store/setup",
            Self::Delivery => "/delivery/setup",
        }
    }
}

impl std::fmt::Display for UserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "store" => Ok(Self::Store),
            "delivery" => Ok(Self::Delivery),
            _ => Err(format!("invalid user kind: {s}")),
        }
    }
}

/// How the customer pays at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Upi,
}

impl PaymentMethod {
    /// Form value, as serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Upi => "upi",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash on Delivery",
            Self::Card => "Credit/Debit Card",
            Self::Upi => "UPI",
        }
    }
}

/// Courier gender, as collected during delivery partner setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
