//! What the map screen highlights.

use walkschool_core::{Coordinate, Route};

use crate::store::ProgressStore;

/// Paths and centre for the map screen, derived from store state.
///
/// Route ids that no longer resolve to a saved route draw nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOverlay<'a> {
    /// Where the map is centred
    pub center: Coordinate,

    /// Route picked from "My Routes", if any
    pub viewed_route: Option<&'a Route>,

    /// School route, when "go to school" was requested
    pub school_route: Option<&'a Route>,

    /// Waypoints of the route being drawn; empty outside drafting
    pub draft: &'a [Coordinate],
}

impl MapOverlay<'_> {
    /// Whether anything besides the base map is drawn.
    pub fn is_empty(&self) -> bool {
        self.viewed_route.is_none() && self.school_route.is_none() && self.draft.is_empty()
    }
}

impl ProgressStore {
    /// Build the overlay for the current state.
    pub fn map_overlay(&self) -> MapOverlay<'_> {
        let viewed_route = self.viewed_route_id().and_then(|id| self.route(id));
        let school_route = if self.show_school_route() {
            self.school_route()
        } else {
            None
        };
        let draft: &[Coordinate] = if self.is_drafting() {
            self.draft_waypoints()
        } else {
            &[]
        };

        MapOverlay {
            center: self.map_center(),
            viewed_route,
            school_route,
            draft,
        }
    }
}
