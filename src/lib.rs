//! Scoring and gesture core for the accommodation scam-spotting swipe game.
//!
//! [`game::AccommodationGame`] walks a list of listings and scores accept /
//! reject decisions against each listing's hidden scam flag.
//! [`card::SwipeCard`] turns drag input into those decisions. The two only
//! meet through a boolean callback.

pub mod card;
pub mod config;
pub mod domain;
pub mod game;
pub mod gesture;
pub mod journal;
pub mod listings;
pub mod monitoring;
pub mod progress;
pub mod tips;

pub use card::{CardSurface, SwipeCard, SwipeHandlers};
pub use domain::{DecisionRecord, Difficulty, Explanation, FinalScore, Listing, Rating, SwipeDirection};
pub use game::{AccommodationGame, GameError};
pub use gesture::{CardTransform, GestureParams, Point, Release, SwipeGesture};
