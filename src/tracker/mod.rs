//! Progress tracking and gamification
//!
//! This module records study events per user and course, derives XP, daily
//! streaks and achievements from them, and produces learning analytics and a
//! leaderboard for the dashboard.

pub mod achievements;
pub mod analytics;
pub mod clock;
pub mod error;
pub mod model;
pub mod storage;
pub mod store;

// Re-exports
pub use achievements::{Achievement, AchievementKey};
pub use analytics::{AnalyticsProvider, PlaceholderAnalytics, XpLevel};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TrackerError;
pub use model::{AnalyticsSummary, LeaderboardEntry, ProgressExport, ProgressRecord};
pub use storage::{JsonFileRepository, SnapshotRepository, StoreSnapshot};
pub use store::ProgressStore;
