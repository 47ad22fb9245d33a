//! Progress tracking for the walk-to-school app.
//!
//! [`ProgressStore`] owns saved routes, the school route, the points ledger,
//! arrival history, achievements, finished quizzes and shop purchases.
//! Screens call its operations and re-read its state afterwards.

#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod error;
pub mod location;
pub mod map;
pub mod snapshot;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::StoreConfig;
pub use error::{ConfigError, ProgressError, Result};
pub use location::{LocationFix, LocationProvider, StaticLocation, DEFAULT_MAP_CENTER};
pub use map::MapOverlay;
pub use snapshot::ProgressSnapshot;
pub use store::{ArrivalOutcome, ProgressStore, QuizCompletion};
