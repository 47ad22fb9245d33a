//! The progress store - single owner of route and gamification state.
//!
//! Every operation runs to completion before returning and leaves the store
//! consistent. Rejected operations return an error and change nothing.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt::Write;

use tracing::{debug, info, warn};
use ulid::{Generator, Ulid};
use walkschool_core::{
    Achievement, Coordinate, RecentRouteEntry, Route, RouteId, ShopItem, ACHIEVEMENTS,
};

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::{ProgressError, Result};
use crate::location::{LocationFix, LocationProvider, DEFAULT_MAP_CENTER};

/// Outcome of a simulated arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalOutcome {
    /// Total arrivals after this one
    pub arrival_count: u32,

    /// Achievement indices unlocked by this arrival. At most one; empty once
    /// the catalog is exhausted or the index was already unlocked.
    pub newly_unlocked: Vec<usize>,

    /// Points added to the ledger
    pub points_awarded: i64,
}

/// Outcome of finishing a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCompletion {
    /// First finish; points were added
    FirstTime {
        /// Points added to the ledger
        points_awarded: i64,
    },
    /// Finished before; nothing awarded
    AlreadyCompleted,
}

/// Single source of truth for routes, points and unlocks.
///
/// Created once at startup and handed to screens by reference.
pub struct ProgressStore {
    config: StoreConfig,
    clock: Box<dyn Clock>,
    ids: Generator,

    points: i64,

    drafting: bool,
    draft: Vec<Coordinate>,
    saved_routes: Vec<Route>,
    school_route: Option<RouteId>,
    viewed_route: Option<RouteId>,
    show_school_route: bool,

    recent_routes: VecDeque<RecentRouteEntry>,
    arrival_count: u32,
    unlocked: BTreeSet<usize>,

    completed_quizzes: BTreeMap<String, bool>,
    purchased: BTreeSet<String>,

    last_fix: Option<LocationFix>,
    last_position: Option<Coordinate>,
}

impl Default for ProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressStore {
    /// Create an empty store with the default config and the system clock.
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
            clock: Box::new(SystemClock),
            ids: Generator::new(),
            points: 0,
            drafting: false,
            draft: Vec::new(),
            saved_routes: Vec::new(),
            school_route: None,
            viewed_route: None,
            show_school_route: false,
            recent_routes: VecDeque::new(),
            arrival_count: 0,
            unlocked: BTreeSet::new(),
            completed_quizzes: BTreeMap::new(),
            purchased: BTreeSet::new(),
            last_fix: None,
            last_position: None,
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the clock used for route and arrival dates.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn today(&self) -> String {
        let date = self.clock.today();
        let mut formatted = String::new();
        if write!(formatted, "{}", date.format(&self.config.date_format)).is_err() {
            warn!("Bad date format {:?}, using ISO dates", self.config.date_format);
            return date.to_string();
        }
        formatted
    }

    fn next_route_id(&mut self) -> RouteId {
        // The monotonic generator only fails if 2^80 ids are drawn in one millisecond.
        let ulid = self.ids.generate().unwrap_or_else(|_| Ulid::new());
        RouteId::from_ulid(ulid)
    }

    // === Points ===

    /// Add `amount` to the ledger. Negative amounts subtract; nothing is clamped.
    ///
    /// Returns `false`, leaving the ledger untouched, when the total would
    /// overflow `i64`.
    pub fn add_points(&mut self, amount: i64) -> bool {
        match self.points.checked_add(amount) {
            Some(total) => {
                self.points = total;
                debug!("Points {:+} -> {}", amount, self.points);
                true
            }
            None => {
                warn!("Ignoring {:+} points: ledger at {} would overflow", amount, self.points);
                false
            }
        }
    }

    /// Current ledger total.
    pub fn points(&self) -> i64 {
        self.points
    }

    // === Arrivals & achievements ===

    /// Simulate reaching school: award points, log the trip, count the
    /// arrival and unlock the matching achievement.
    pub fn record_arrival(&mut self) -> ArrivalOutcome {
        let reward = if self.add_points(self.config.arrival_reward) {
            self.config.arrival_reward
        } else {
            0
        };

        let date = self.today();
        self.recent_routes.push_front(RecentRouteEntry {
            date,
            points: reward,
        });

        self.arrival_count = self.arrival_count.saturating_add(1);

        let mut newly_unlocked = Vec::new();
        let index = self.arrival_count as usize - 1;
        if index < ACHIEVEMENTS.len() && self.unlocked.insert(index) {
            info!(
                "Achievement unlocked: {} (arrival {})",
                ACHIEVEMENTS[index].title, self.arrival_count
            );
            newly_unlocked.push(index);
        }

        debug!("Arrival {} recorded", self.arrival_count);

        ArrivalOutcome {
            arrival_count: self.arrival_count,
            newly_unlocked,
            points_awarded: reward,
        }
    }

    /// Total simulated arrivals.
    pub fn arrival_count(&self) -> u32 {
        self.arrival_count
    }

    /// All arrivals, most recent first.
    pub fn recent_routes(&self) -> impl Iterator<Item = &RecentRouteEntry> {
        self.recent_routes.iter()
    }

    /// The arrivals the pet page lists, most recent first.
    pub fn recent_routes_for_display(&self) -> impl Iterator<Item = &RecentRouteEntry> {
        self.recent_routes
            .iter()
            .take(self.config.recent_display_limit)
    }

    /// Unlocked achievement indices, ascending.
    pub fn unlocked_achievements(&self) -> &BTreeSet<usize> {
        &self.unlocked
    }

    /// Whether the achievement at `index` is unlocked.
    pub fn is_achievement_unlocked(&self, index: usize) -> bool {
        self.unlocked.contains(&index)
    }

    /// Achievement catalog paired with unlock state.
    pub fn achievements(&self) -> impl Iterator<Item = (&'static Achievement, bool)> + '_ {
        ACHIEVEMENTS
            .iter()
            .enumerate()
            .map(|(i, a)| (a, self.unlocked.contains(&i)))
    }

    // === Route drafting ===

    /// Start composing a new route, discarding any unsaved waypoints.
    pub fn start_draft_route(&mut self) {
        self.draft.clear();
        self.drafting = true;
        debug!("Draft route started");
    }

    /// Append a waypoint to the draft.
    pub fn add_waypoint(&mut self, coordinate: Coordinate) {
        if !self.drafting {
            debug!("Waypoint added outside drafting; starting a draft");
            self.drafting = true;
        }
        self.draft.push(coordinate);
        debug!("Waypoint {} added at {}", self.draft.len(), coordinate);
    }

    /// Throw the draft away and leave drafting mode.
    pub fn cancel_draft_route(&mut self) {
        self.draft.clear();
        self.drafting = false;
        debug!("Draft route cancelled");
    }

    /// Save the draft as a new route and return its id.
    pub fn save_draft_route(&mut self) -> Result<RouteId> {
        let required = self.config.min_route_waypoints;
        if self.draft.len() < required {
            return Err(ProgressError::InsufficientWaypoints {
                required,
                actual: self.draft.len(),
            });
        }

        let route = Route {
            id: self.next_route_id(),
            name: Route::name_for(self.saved_routes.len()),
            date: self.today(),
            waypoints: std::mem::take(&mut self.draft),
        };
        self.drafting = false;

        let id = route.id;
        info!("Saved {} ({}) with {} waypoints", route.name, id, route.waypoints.len());
        self.saved_routes.push(route);
        Ok(id)
    }

    /// Whether a draft is in progress.
    pub fn is_drafting(&self) -> bool {
        self.drafting
    }

    /// Waypoints placed so far.
    pub fn draft_waypoints(&self) -> &[Coordinate] {
        &self.draft
    }

    // === Saved routes ===

    /// Saved routes in creation order.
    pub fn saved_routes(&self) -> &[Route] {
        &self.saved_routes
    }

    /// Look up a saved route.
    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.saved_routes.iter().find(|r| r.id == id)
    }

    /// Mark a route as the route to school.
    ///
    /// The id is stored as given. Callers pass ids from [`saved_routes`](Self::saved_routes).
    pub fn set_school_route(&mut self, route_id: RouteId) {
        if self.route(route_id).is_none() {
            warn!("School route set to unknown route {}", route_id);
        }
        self.school_route = Some(route_id);
        debug!("School route set to {}", route_id);
    }

    /// Id of the school route, if chosen.
    pub fn school_route_id(&self) -> Option<RouteId> {
        self.school_route
    }

    /// The school route, if chosen and saved.
    pub fn school_route(&self) -> Option<&Route> {
        self.school_route.and_then(|id| self.route(id))
    }

    /// Show a route on the map, independent of the school route.
    pub fn select_route_for_display(&mut self, route_id: RouteId) {
        if self.route(route_id).is_none() {
            warn!("Viewing unknown route {}", route_id);
        }
        self.viewed_route = Some(route_id);
        debug!("Viewing route {}", route_id);
    }

    /// Route currently highlighted on the map.
    pub fn viewed_route_id(&self) -> Option<RouteId> {
        self.viewed_route
    }

    /// Highlight the school route on the map.
    pub fn request_go_to_school(&mut self) -> Result<()> {
        let Some(id) = self.school_route else {
            return Err(ProgressError::NoSchoolRouteSet);
        };
        self.show_school_route = true;
        self.viewed_route = None;
        debug!("Showing school route {}", id);
        Ok(())
    }

    /// Whether the map should highlight the school route.
    pub fn show_school_route(&self) -> bool {
        self.show_school_route
    }

    // === Learning ===

    /// Record a finished quiz. Points are only awarded the first time.
    pub fn complete_quiz(&mut self, quiz_id: &str, reward_points: u32) -> QuizCompletion {
        if self.is_quiz_completed(quiz_id) {
            debug!("Quiz {} already completed", quiz_id);
            return QuizCompletion::AlreadyCompleted;
        }

        self.completed_quizzes.insert(quiz_id.to_string(), true);
        let reward = i64::from(reward_points);
        let points = if self.add_points(reward) { reward } else { 0 };
        info!("Quiz {} completed, +{} points", quiz_id, points);

        QuizCompletion::FirstTime {
            points_awarded: points,
        }
    }

    /// Whether a quiz was finished before.
    pub fn is_quiz_completed(&self, quiz_id: &str) -> bool {
        self.completed_quizzes.get(quiz_id).copied().unwrap_or(false)
    }

    /// Ids of finished quizzes.
    pub fn completed_quizzes(&self) -> impl Iterator<Item = &str> {
        self.completed_quizzes
            .iter()
            .filter(|(_, done)| **done)
            .map(|(id, _)| id.as_str())
    }

    // === Shop ===

    /// Buy `item` with points.
    pub fn purchase_item(&mut self, item: &ShopItem) -> Result<()> {
        if self.owns_item(item.id) {
            return Err(ProgressError::AlreadyOwned(item.id.to_string()));
        }
        if self.points < i64::from(item.price) {
            return Err(ProgressError::insufficient_points(item, self.points));
        }

        self.add_points(-i64::from(item.price));
        self.purchased.insert(item.id.to_string());
        info!("Purchased {} for {} points", item.name, item.price);
        Ok(())
    }

    /// Whether the item was bought.
    pub fn owns_item(&self, item_id: &str) -> bool {
        self.purchased.contains(item_id)
    }

    /// Ids of bought items, sorted.
    pub fn purchased_items(&self) -> impl Iterator<Item = &str> {
        self.purchased.iter().map(String::as_str)
    }

    // === Location ===

    /// Remember the outcome of a location request.
    pub fn record_location(&mut self, fix: LocationFix) {
        match fix {
            LocationFix::Resolved(position) => {
                self.last_position = Some(position);
                debug!("Location resolved at {}", position);
            }
            LocationFix::Denied => warn!("Location permission denied"),
        }
        self.last_fix = Some(fix);
    }

    /// Ask `provider` for a fix once and record it.
    pub fn locate(&mut self, provider: &mut dyn LocationProvider) -> LocationFix {
        let fix = provider.request_fix();
        self.record_location(fix);
        fix
    }

    /// Latest answer from the location provider.
    pub fn last_location(&self) -> Option<LocationFix> {
        self.last_fix
    }

    /// Where the map should centre: the last known position, or the default.
    pub fn map_center(&self) -> Coordinate {
        self.last_position.unwrap_or(DEFAULT_MAP_CENTER)
    }
}
