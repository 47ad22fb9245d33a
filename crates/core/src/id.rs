//! Unique identifiers for walkschool entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a saved Route.
///
/// Route ids are ULIDs, so they sort in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RouteId(Ulid);

impl RouteId {
    /// Generate a new RouteId
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Wrap an already generated ULID.
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }
}

impl Default for RouteId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RouteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RouteId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}
