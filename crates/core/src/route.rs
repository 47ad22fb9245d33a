//! Route model - saved walking routes and arrival history.

use serde::{Deserialize, Serialize};

use crate::geo::{self, Coordinate};
use crate::id::RouteId;

/// A route the user drew on the map and saved.
///
/// Routes are never mutated after they are saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Unique identifier
    pub id: RouteId,

    /// Display name, e.g. "Route 3"
    pub name: String,

    /// Creation date, already formatted for display
    pub date: String,

    /// Ordered path, at least two points
    pub waypoints: Vec<Coordinate>,
}

impl Route {
    /// Display name for the route saved after `saved_count` others.
    pub fn name_for(saved_count: usize) -> String {
        format!("Route {}", saved_count + 1)
    }

    /// Start of the path.
    pub fn start(&self) -> Option<&Coordinate> {
        self.waypoints.first()
    }

    /// End of the path.
    pub fn end(&self) -> Option<&Coordinate> {
        self.waypoints.last()
    }

    /// Path length in meters.
    pub fn length_meters(&self) -> f64 {
        geo::path_length(&self.waypoints)
    }
}

/// One simulated arrival, as listed under "Recent Routes".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentRouteEntry {
    /// Arrival date, formatted for display
    pub date: String,

    /// Points awarded for the arrival
    pub points: i64,
}
