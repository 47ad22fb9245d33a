//! Interactive session - one command per line against a single store.

use std::fmt::Write;

use clap::{Parser, Subcommand};
use tracing::debug;
use walkschool_core::{
    find_quiz, find_shop_item, shop_items_in, Coordinate, QuizSession, RouteId, SessionStep,
    ShopCategory, ACHIEVEMENTS, QUIZZES,
};
use walkschool_progress::{LocationFix, ProgressError, ProgressStore, QuizCompletion};

/// One line of session input.
#[derive(Parser, Debug)]
#[command(name = "session", no_binary_name = true, disable_version_flag = true)]
pub struct Line {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show points, arrivals and recent routes
    Status {
        /// Print the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add (or, with a negative amount, remove) points
    AddPoints {
        #[arg(allow_hyphen_values = true)]
        amount: i64,
    },
    /// Simulate arriving at school
    Arrive,
    /// Start drawing a new route
    Draft,
    /// Add a waypoint to the route being drawn
    Waypoint {
        #[arg(allow_hyphen_values = true)]
        latitude: f64,
        #[arg(allow_hyphen_values = true)]
        longitude: f64,
    },
    /// Save the route being drawn
    Save,
    /// Discard the route being drawn
    Cancel,
    /// List saved routes
    Routes,
    /// Mark a route as the route to school (number from `routes`, or id)
    School { route: String },
    /// Highlight a route on the map (number from `routes`, or id)
    View { route: String },
    /// Show the school route on the map
    GoToSchool,
    /// Describe what the map shows
    Map,
    /// Report the device location
    Locate {
        #[arg(allow_hyphen_values = true, required_unless_present = "denied")]
        latitude: Option<f64>,
        #[arg(allow_hyphen_values = true, required_unless_present = "denied")]
        longitude: Option<f64>,
        /// Location permission was refused
        #[arg(long, conflicts_with_all = ["latitude", "longitude"])]
        denied: bool,
    },
    /// List quizzes
    Quizzes,
    /// Answer a quiz; one option number per question, starting at 1
    Quiz {
        id: String,
        answers: Vec<usize>,
    },
    /// List shop items
    Shop {
        /// pets or accessories
        #[arg(long)]
        category: Option<ShopCategory>,
    },
    /// Buy a shop item
    Buy { item: String },
    /// List achievements
    Achievements,
    /// End the session
    Quit,
}

/// What the caller should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Print and keep reading
    Continue(String),
    /// Stop reading
    Quit,
}

/// Drives a store from text commands.
pub struct Session {
    store: ProgressStore,
}

impl Session {
    pub fn new(store: ProgressStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    /// Parse and run one line. Blank lines and `#` comments do nothing.
    pub fn run_line(&mut self, line: &str) -> Flow {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Flow::Continue(String::new());
        }

        match Line::try_parse_from(line.split_whitespace()) {
            Ok(Line { command: Command::Quit }) => Flow::Quit,
            Ok(Line { command }) => {
                debug!("Running {:?}", command);
                Flow::Continue(self.execute(command))
            }
            Err(e) => Flow::Continue(e.render().to_string()),
        }
    }

    fn execute(&mut self, command: Command) -> String {
        match command {
            Command::Status { json } => self.status(json),
            Command::AddPoints { amount } => {
                if !self.store.add_points(amount) {
                    return format!(
                        "Points unchanged: total {} cannot take {:+}",
                        self.store.points(),
                        amount
                    );
                }
                format!("{:+} points, total {}", amount, self.store.points())
            }
            Command::Arrive => {
                let outcome = self.store.record_arrival();
                let mut out = format!(
                    "Arrived! +{}pts (arrival {})",
                    outcome.points_awarded, outcome.arrival_count
                );
                let unlocked = outcome.newly_unlocked.iter().filter_map(|&i| ACHIEVEMENTS.get(i));
                for achievement in unlocked {
                    let _ = write!(
                        out,
                        "\n🎉 Achievement unlocked: {} {}",
                        achievement.icon, achievement.title
                    );
                }
                out
            }
            Command::Draft => {
                self.store.start_draft_route();
                "Drawing a new route; add waypoints with `waypoint <lat> <lon>`".to_string()
            }
            Command::Waypoint { latitude, longitude } => {
                self.store.add_waypoint(Coordinate::new(latitude, longitude));
                format!("{} waypoints added", self.store.draft_waypoints().len())
            }
            Command::Save => match self.store.save_draft_route() {
                Ok(id) => {
                    let name = self.store.route(id).map(|r| r.name.as_str()).unwrap_or("Route");
                    format!("Saved {} ({})", name, id)
                }
                Err(e) => message(&e),
            },
            Command::Cancel => {
                self.store.cancel_draft_route();
                "Route discarded".to_string()
            }
            Command::Routes => self.routes(),
            Command::School { route } => match self.resolve_route(&route) {
                Some(id) => {
                    self.store.set_school_route(id);
                    format!("✓ School route set to {}", id)
                }
                None => format!("No route {}", route),
            },
            Command::View { route } => match self.resolve_route(&route) {
                Some(id) => {
                    self.store.select_route_for_display(id);
                    format!("Viewing {}", id)
                }
                None => format!("No route {}", route),
            },
            Command::GoToSchool => match self.store.request_go_to_school() {
                Ok(()) => "Showing your route to school".to_string(),
                Err(e) => message(&e),
            },
            Command::Map => self.map(),
            Command::Locate {
                latitude,
                longitude,
                denied,
            } => {
                let fix = match (latitude, longitude) {
                    (Some(lat), Some(lon)) if !denied => {
                        LocationFix::Resolved(Coordinate::new(lat, lon))
                    }
                    _ => LocationFix::Denied,
                };
                self.store.record_location(fix);
                match fix {
                    LocationFix::Resolved(at) => format!("You are here: {}", at),
                    LocationFix::Denied => "Permission to access location was denied".to_string(),
                }
            }
            Command::Quizzes => {
                let mut out = String::new();
                for quiz in QUIZZES {
                    let done = if self.store.is_quiz_completed(quiz.id) { " ✓" } else { "" };
                    let _ = writeln!(
                        out,
                        "{} - {} ({} questions • {} points){}",
                        quiz.id,
                        quiz.title,
                        quiz.slides.len(),
                        quiz.points,
                        done
                    );
                }
                out.trim_end().to_string()
            }
            Command::Quiz { id, answers } => self.quiz(&id, &answers),
            Command::Shop { category } => self.shop(category),
            Command::Buy { item } => {
                let Some(item) = find_shop_item(&item) else {
                    return format!("No shop item {}", item);
                };
                match self.store.purchase_item(item) {
                    Ok(()) => {
                        format!("Bought {} {} for {} points", item.emoji, item.name, item.price)
                    }
                    Err(e) => message(&e),
                }
            }
            Command::Achievements => {
                let mut out = String::new();
                for (achievement, unlocked) in self.store.achievements() {
                    let mark = if unlocked { "✓" } else { "·" };
                    let _ = writeln!(
                        out,
                        "{} {} {} - {}",
                        mark, achievement.icon, achievement.title, achievement.subtitle
                    );
                }
                out.trim_end().to_string()
            }
            Command::Quit => String::new(),
        }
    }

    /// Accept a 1-based position from `routes` or a full route id.
    fn resolve_route(&self, raw: &str) -> Option<RouteId> {
        if let Ok(n) = raw.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| self.store.saved_routes().get(i))
                .map(|r| r.id);
        }
        raw.parse().ok()
    }

    fn status(&self, json: bool) -> String {
        if json {
            return serde_json::to_string_pretty(&self.store.snapshot())
                .unwrap_or_else(|e| format!("failed to encode snapshot: {}", e));
        }

        let mut out = format!(
            "{} pts | {} arrivals | {} routes",
            self.store.points(),
            self.store.arrival_count(),
            self.store.saved_routes().len()
        );
        let mut recent = self.store.recent_routes_for_display().peekable();
        if recent.peek().is_none() {
            out.push_str("\nNo recent routes yet. Run `arrive` to add one!");
        }
        for entry in recent {
            let _ = write!(out, "\n  {}  +{}pts", entry.date, entry.points);
        }
        out
    }

    fn routes(&self) -> String {
        let routes = self.store.saved_routes();
        if routes.is_empty() {
            return "No routes yet. Create your first route!".to_string();
        }

        let school = self.store.school_route_id();
        let mut out = String::new();
        for (i, route) in routes.iter().enumerate() {
            let tag = if school == Some(route.id) { "  ✓ School Route" } else { "" };
            let _ = writeln!(
                out,
                "{}. {} ({}) {:.0} m, {}{}",
                i + 1,
                route.name,
                route.date,
                route.length_meters(),
                route.id,
                tag
            );
            if let (Some(start), Some(end)) = (route.start(), route.end()) {
                let _ = writeln!(out, "   from {} to {}", start, end);
            }
        }
        out.trim_end().to_string()
    }

    fn map(&self) -> String {
        let overlay = self.store.map_overlay();
        let mut out = format!("Centre: {}", overlay.center);
        if let Some(route) = overlay.viewed_route {
            let _ = write!(out, "\nViewing {} ({} points)", route.name, route.waypoints.len());
        }
        if let Some(route) = overlay.school_route {
            let _ = write!(out, "\nSchool route {} ({} points)", route.name, route.waypoints.len());
        }
        if !overlay.draft.is_empty() {
            let _ = write!(out, "\nDrawing ({} waypoints)", overlay.draft.len());
        }
        out
    }

    fn quiz(&mut self, id: &str, answers: &[usize]) -> String {
        let Some(quiz) = find_quiz(id) else {
            return format!("No quiz {}", id);
        };

        let mut session = QuizSession::new(quiz);
        let mut out = format!("{}\n", session.quiz().title);
        let mut answers = answers.iter();
        loop {
            let Some(slide) = session.current_slide() else {
                return format!("Quiz {} has no questions", id);
            };
            let _ = writeln!(
                out,
                "Question {} of {}: {}",
                session.slide_index() + 1,
                session.slide_count(),
                slide.question
            );

            let Some(&answer) = answers.next() else {
                out.push_str("Please select an answer");
                return out;
            };
            // Options are numbered from 1 on screen; 0 maps to an out-of-range index.
            match session.select_answer(answer.checked_sub(1).unwrap_or(usize::MAX)) {
                Ok(feedback) if feedback.is_correct() => out.push_str("  ✓ correct\n"),
                Ok(feedback) => {
                    let right = slide.options.get(feedback.correct).copied().unwrap_or("?");
                    let _ = writeln!(out, "  ✗ answer: {}", right);
                }
                Err(e) => {
                    out.push_str(&e.to_string());
                    return out;
                }
            }

            match session.next() {
                Ok(SessionStep::Advanced { .. }) => continue,
                Ok(SessionStep::Finished {
                    correct_answers,
                    total,
                }) => {
                    let _ = writeln!(out, "{}/{} correct", correct_answers, total);
                    break;
                }
                Err(e) => {
                    out.push_str(&e.to_string());
                    return out;
                }
            }
        }

        match self.store.complete_quiz(quiz.id, quiz.points) {
            QuizCompletion::FirstTime { points_awarded } => {
                let _ = write!(out, "Quiz completed! +{} points earned!", points_awarded);
            }
            QuizCompletion::AlreadyCompleted => {
                out.push_str("Quiz completed! Already completed before");
            }
        }
        out
    }

    fn shop(&self, category: Option<ShopCategory>) -> String {
        let categories = match category {
            Some(c) => vec![c],
            None => vec![ShopCategory::Pets, ShopCategory::Accessories],
        };

        let mut out = format!("{} pts", self.store.points());
        for category in categories {
            let _ = write!(out, "\n[{}]", category.as_str());
            for item in shop_items_in(category) {
                let state = if self.store.owns_item(item.id) { "Owned" } else { "Buy" };
                let _ = write!(
                    out,
                    "\n  {:<6} {} {:<12} {:>3} pts  {}",
                    item.id, item.emoji, item.name, item.price, state
                );
            }
        }
        out
    }
}

/// User-facing text for a rejected operation.
fn message(err: &ProgressError) -> String {
    match err {
        ProgressError::InsufficientWaypoints { required, .. } => {
            format!("Please add at least {} waypoints to create a route", required)
        }
        ProgressError::NoSchoolRouteSet => {
            "No school route set. Pick or create a route under `routes`.".to_string()
        }
        ProgressError::AlreadyOwned(_) => "Already Owned: You already own this item!".to_string(),
        ProgressError::InsufficientPoints { .. } => format!(
            "Not Enough Points: You need {} more points to purchase this item.",
            err.shortfall().unwrap_or_default()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use walkschool_progress::FixedClock;

    fn session() -> Session {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        Session::new(ProgressStore::new().with_clock(clock))
    }

    fn output(session: &mut Session, line: &str) -> String {
        match session.run_line(line) {
            Flow::Continue(out) => out,
            Flow::Quit => panic!("unexpected quit on {line:?}"),
        }
    }

    #[test]
    fn blank_and_comment_lines_are_ignored() {
        let mut s = session();
        assert_eq!(s.run_line("   "), Flow::Continue(String::new()));
        assert_eq!(s.run_line("# setup"), Flow::Continue(String::new()));
        assert_eq!(s.run_line("quit"), Flow::Quit);
    }

    #[test]
    fn unknown_command_reports_instead_of_failing() {
        let mut s = session();
        let out = output(&mut s, "fly-to-school");
        assert!(out.contains("unrecognized subcommand"), "{out}");
    }

    #[test]
    fn draw_save_and_pick_school_route() {
        let mut s = session();
        output(&mut s, "draft");
        output(&mut s, "waypoint 54.2861 10.2219");
        assert!(output(&mut s, "save").starts_with("Please add at least 2"));

        output(&mut s, "waypoint 54.2885 10.2262");
        assert!(output(&mut s, "save").starts_with("Saved Route 1"));

        assert!(output(&mut s, "go-to-school").starts_with("No school route set"));
        assert!(output(&mut s, "school 1").starts_with("✓ School route set"));
        assert_eq!(output(&mut s, "go-to-school"), "Showing your route to school");
        let routes = output(&mut s, "routes");
        assert!(routes.contains("✓ School Route"), "{routes}");
        assert!(routes.ends_with("from 54.28610, 10.22190 to 54.28850, 10.22620"), "{routes}");
        assert!(output(&mut s, "map").contains("School route Route 1"));
    }

    #[test]
    fn unknown_route_number_is_reported() {
        let mut s = session();
        assert_eq!(output(&mut s, "school 3"), "No route 3");
        assert!(s.store().school_route_id().is_none());
    }

    #[test]
    fn overflowing_points_are_refused() {
        let mut s = session();
        assert_eq!(
            output(&mut s, "add-points 9223372036854775807"),
            "+9223372036854775807 points, total 9223372036854775807"
        );
        assert_eq!(
            output(&mut s, "add-points 1"),
            "Points unchanged: total 9223372036854775807 cannot take +1"
        );
        assert!(output(&mut s, "arrive").starts_with("Arrived! +0pts (arrival 1)"));
        assert_eq!(s.store().points(), i64::MAX);
    }

    #[test]
    fn negative_amounts_parse() {
        let mut s = session();
        assert_eq!(output(&mut s, "add-points -4"), "-4 points, total -4");
    }

    #[test]
    fn shop_shortfall_then_purchase() {
        let mut s = session();
        assert_eq!(
            output(&mut s, "buy pet4"),
            "Not Enough Points: You need 30 more points to purchase this item."
        );
        output(&mut s, "add-points 30");
        assert!(output(&mut s, "buy pet4").starts_with("Bought"));
        assert_eq!(output(&mut s, "buy pet4"), "Already Owned: You already own this item!");
        assert!(output(&mut s, "shop --category pets").contains("Owned"));
    }

    #[test]
    fn arrivals_announce_unlocks_once() {
        let mut s = session();
        assert!(output(&mut s, "arrive").contains("First Steps"));
        assert!(output(&mut s, "arrive").contains("Week Warrior"));
        assert!(output(&mut s, "arrive").contains("Distance Master"));
        assert!(!output(&mut s, "arrive").contains("unlocked"));
        assert!(output(&mut s, "status").contains("10/16/2026  +5pts"));
    }

    #[test]
    fn quiz_pays_once() {
        let mut s = session();
        let first = output(&mut s, "quiz cycling-lanes 1 2 3");
        assert!(first.starts_with("How to use cycling lanes\n"), "{first}");
        assert!(first.contains("3/3 correct"), "{first}");
        assert!(first.ends_with("+10 points earned!"));

        let second = output(&mut s, "quiz cycling-lanes 2 2 3");
        assert!(second.contains("2/3 correct"), "{second}");
        assert!(second.ends_with("Already completed before"));
        assert_eq!(s.store().points(), 10);
    }

    #[test]
    fn quiz_without_enough_answers_awards_nothing() {
        let mut s = session();
        let out = output(&mut s, "quiz air-pollution 3");
        assert!(out.ends_with("Please select an answer"));
        assert_eq!(s.store().points(), 0);
    }

    #[test]
    fn status_json_is_valid() {
        let mut s = session();
        output(&mut s, "arrive");
        let json: serde_json::Value =
            serde_json::from_str(&output(&mut s, "status --json")).unwrap();
        assert_eq!(json["points"], 5);
    }

    #[test]
    fn denied_location_centres_on_default() {
        let mut s = session();
        assert_eq!(
            output(&mut s, "locate --denied"),
            "Permission to access location was denied"
        );
        assert!(output(&mut s, "map").contains("37.78825"));
    }
}
