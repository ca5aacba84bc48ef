//! MathQuest - progress tracking for story-driven mathematics lessons
//!
//! MathQuest records study events for each learner and course, turns them
//! into XP, daily streaks and achievements, and produces learning analytics
//! and a leaderboard for the dashboard.

pub mod config;
pub mod study;
pub mod tracker;

pub use config::Config;
pub use study::StudySession;
pub use tracker::{ProgressStore, TrackerError};
