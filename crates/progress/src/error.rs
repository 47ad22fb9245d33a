//! Errors returned by progress store operations.

use walkschool_core::ShopItem;

/// Result type for progress store operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// A rejected store operation. Rejected calls never change state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    /// The draft route is too short to save
    #[error("a route needs at least {required} waypoints, {actual} added")]
    InsufficientWaypoints {
        /// Minimum waypoints for a saved route
        required: usize,
        /// Waypoints in the draft
        actual: usize,
    },

    /// No saved route is marked as the route to school
    #[error("no school route set; pick or create a route first")]
    NoSchoolRouteSet,

    /// The item was bought before
    #[error("you already own {0}")]
    AlreadyOwned(String),

    /// The balance does not cover the price
    #[error("not enough points: costs {price}, balance is {balance}")]
    InsufficientPoints {
        /// Item price
        price: u32,
        /// Balance at the time of the attempt
        balance: i64,
    },
}

impl ProgressError {
    pub(crate) fn insufficient_points(item: &ShopItem, balance: i64) -> Self {
        ProgressError::InsufficientPoints {
            price: item.price,
            balance,
        }
    }

    /// Points missing for a purchase, if this is an `InsufficientPoints` error.
    pub fn shortfall(&self) -> Option<i64> {
        match self {
            ProgressError::InsufficientPoints { price, balance } => {
                Some(i64::from(*price).saturating_sub(*balance))
            }
            _ => None,
        }
    }
}

/// Errors loading a [`StoreConfig`](crate::StoreConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}
