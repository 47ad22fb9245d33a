//! Point-in-time view of the store for rendering and export.

use serde::Serialize;
use walkschool_core::{RecentRouteEntry, Route, RouteId, Time};

use crate::clock::Clock;
use crate::store::ProgressStore;

/// A snapshot of progress at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    /// When snapshot was taken
    pub timestamp: Time,

    /// Ledger total
    pub points: i64,

    /// Simulated arrivals so far
    pub arrival_count: u32,

    /// Saved routes in creation order
    pub saved_routes: Vec<Route>,

    /// School route selection
    pub school_route: Option<RouteId>,

    /// Route highlighted on the map
    pub viewed_route: Option<RouteId>,

    /// Whether the school route is highlighted
    pub show_school_route: bool,

    /// Recent arrivals as displayed, most recent first
    pub recent_routes: Vec<RecentRouteEntry>,

    /// Unlocked achievement indices
    pub unlocked_achievements: Vec<usize>,

    /// Finished quiz ids
    pub completed_quizzes: Vec<String>,

    /// Bought item ids
    pub purchased_items: Vec<String>,
}

impl ProgressStore {
    /// Take a progress snapshot, stamped with `clock`.
    pub fn snapshot_at(&self, clock: &dyn Clock) -> ProgressSnapshot {
        ProgressSnapshot {
            timestamp: clock.now(),
            points: self.points(),
            arrival_count: self.arrival_count(),
            saved_routes: self.saved_routes().to_vec(),
            school_route: self.school_route_id(),
            viewed_route: self.viewed_route_id(),
            show_school_route: self.show_school_route(),
            recent_routes: self.recent_routes_for_display().cloned().collect(),
            unlocked_achievements: self.unlocked_achievements().iter().copied().collect(),
            completed_quizzes: self.completed_quizzes().map(str::to_string).collect(),
            purchased_items: self.purchased_items().map(str::to_string).collect(),
        }
    }

    /// Take a progress snapshot, stamped with the wall clock.
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.snapshot_at(&crate::clock::SystemClock)
    }
}
