//! Location collaborator contract.
//!
//! The platform asks for permission and resolves a fix on its own time.
//! The store is only handed the final answer.

use serde::{Deserialize, Serialize};
use walkschool_core::Coordinate;

/// Map centre used until a location fix is known.
pub const DEFAULT_MAP_CENTER: Coordinate = Coordinate::new(37.78825, -122.4324);

/// Outcome of a one-shot location request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationFix {
    /// The device reported a position
    Resolved(Coordinate),
    /// The user refused location permission
    Denied,
}

/// Something that can produce a location fix once asked.
pub trait LocationProvider {
    /// Request permission if needed and resolve the current position.
    fn request_fix(&mut self) -> LocationFix;
}

/// Provider that always answers with the same fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticLocation(pub LocationFix);

impl LocationProvider for StaticLocation {
    fn request_fix(&mut self) -> LocationFix {
        self.0
    }
}
