//! Walkschool core data models.
//!
//! This crate defines the data structures behind the walk-to-school app:
//! routes drawn on the map, the shop, quiz and achievement catalogs, and
//! the quiz answering flow.

#![warn(missing_docs)]

// Core identities
mod id;

// Map data
mod geo;
mod route;

// Static tables
pub mod catalog;

// Learning
mod quiz;

// Re-exports
pub use id::RouteId;

pub use geo::{path_length, Coordinate};
pub use route::{RecentRouteEntry, Route};

pub use catalog::{
    find_quiz, find_shop_item, shop_items_in, Achievement, Quiz, QuizSlide, ShopCategory,
    ShopItem, ACHIEVEMENTS, QUIZZES, SHOP_ITEMS,
};

pub use quiz::{AnswerFeedback, QuizError, QuizSession, SessionStep};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
