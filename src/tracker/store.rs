//! The progress store
//!
//! Single authority for study events. It owns every [`ProgressRecord`] and
//! the per-user [`AnalyticsSummary`], derives XP, streaks and achievements as
//! events arrive, and answers progress, analytics and leaderboard queries.
//!
//! One store instance is expected per process; the caller constructs it and
//! passes it where it is needed. All state sits behind a single `RwLock`:
//! [`ProgressStore::record_event`] holds the write guard for the whole
//! read-modify-write, and reads clone what they return under the read guard.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::TimeDelta;

use super::achievements;
use super::analytics::{self, AnalyticsProvider, PlaceholderAnalytics};
use super::clock::{Clock, SystemClock};
use super::error::TrackerError;
use super::model::{AnalyticsSummary, LeaderboardEntry, ProgressExport, ProgressRecord};
use super::storage::StoreSnapshot;
use crate::config::{Config, Curriculum};

/// XP for every completed exercise
pub const BASE_XP: u64 = 10;

/// Extra XP per day of streak on each completed exercise
pub const STREAK_BONUS_PER_DAY: u64 = 2;

/// In-memory progress tracker
pub struct ProgressStore {
    /// Course tables
    curriculum: Curriculum,

    /// Source of event timestamps
    clock: Arc<dyn Clock>,

    /// Supplies accuracy, learning time and difficult topics
    analytics_provider: Box<dyn AnalyticsProvider>,

    /// Maximum age of the user's last activity for a streak to continue
    streak_window: TimeDelta,

    /// Records and analytics
    state: RwLock<StoreSnapshot>,
}

impl ProgressStore {
    /// Create an empty store using the system clock
    pub fn new(curriculum: Curriculum) -> Self {
        Self {
            curriculum,
            clock: Arc::new(SystemClock),
            analytics_provider: Box::new(PlaceholderAnalytics),
            streak_window: TimeDelta::days(1),
            state: RwLock::new(StoreSnapshot::default()),
        }
    }

    /// Create an empty store from application configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.curriculum.clone()).with_streak_window(config.streak_window())
    }

    /// Use a different time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a different analytics provider
    pub fn with_analytics_provider(mut self, provider: Box<dyn AnalyticsProvider>) -> Self {
        self.analytics_provider = provider;
        self
    }

    /// Change how long a streak survives without activity
    pub fn with_streak_window(mut self, window: TimeDelta) -> Self {
        self.streak_window = window;
        self
    }

    /// Replace the store contents with a previously taken snapshot
    pub fn with_snapshot(self, snapshot: StoreSnapshot) -> Self {
        *self.write() = snapshot;
        self
    }

    /// Record one study event and return the updated course record
    ///
    /// Creates the (user, course) record on first use. When an exercise was
    /// completed the streak continues if the user was active in *any* course
    /// within the streak window, and resets to 1 otherwise. Time is added
    /// whether or not an exercise was completed.
    pub fn record_event(
        &self,
        user_id: &str,
        course_id: &str,
        lesson_id: i64,
        exercise_completed: bool,
        minutes_spent: f64,
    ) -> Result<ProgressRecord, TrackerError> {
        validate_id("user_id", user_id)?;
        validate_id("course_id", course_id)?;
        if !minutes_spent.is_finite() || minutes_spent < 0.0 {
            return Err(TrackerError::invalid(
                "minutes_spent",
                format!("must be a non-negative number, got {minutes_spent}"),
            ));
        }

        let mut state = self.write();
        // Read under the guard so events commit in timestamp order
        let now = self.clock.now();
        // A window reaching past the earliest representable time covers all history
        let cutoff = now.checked_sub_signed(self.streak_window);
        let records = state.users.entry(user_id.to_string()).or_default();

        // Checked across every course before this event touches anything
        let continues_streak = records
            .iter()
            .map(|r| r.last_accessed)
            .max()
            .is_some_and(|last| cutoff.is_none_or(|cutoff| last >= cutoff));

        let index = match records.iter().position(|r| r.course_id == course_id) {
            Some(index) => index,
            None => {
                let total = self.curriculum.total_exercises(course_id);
                tracing::info!(
                    "Starting progress for {} in {} ({} exercises)",
                    user_id,
                    course_id,
                    total
                );
                records.push(ProgressRecord::new(user_id, course_id, lesson_id, total, now));
                records.len() - 1
            }
        };

        let record = &mut records[index];
        record.lesson_id = lesson_id;

        if exercise_completed {
            record.completed_exercises = record.completed_exercises.saturating_add(1);
            record.streak = if continues_streak { record.streak.saturating_add(1) } else { 1 };
            record.xp_earned += BASE_XP + u64::from(record.streak) * STREAK_BONUS_PER_DAY;
        }

        record.time_spent += minutes_spent;
        record.last_accessed = now;
        record.completion_percentage = record.derived_completion();

        for key in achievements::evaluate(record) {
            if record.achievements.insert(key) {
                tracing::info!("{} unlocked {} in {}", user_id, key.info().name, course_id);
            }
        }

        tracing::debug!(
            "Recorded event for {}/{}: completed={} xp={} streak={} time={:.1}m",
            user_id,
            course_id,
            record.completed_exercises,
            record.xp_earned,
            record.streak,
            record.time_spent
        );

        let updated = record.clone();
        let summary =
            analytics::summarize(&updated, self.analytics_provider.as_ref(), &self.curriculum);
        state.analytics.insert(user_id.to_string(), summary);

        Ok(updated)
    }

    /// All course records for a user, empty if the user is unknown
    pub fn progress(&self, user_id: &str) -> Vec<ProgressRecord> {
        self.read().users.get(user_id).cloned().unwrap_or_default()
    }

    /// The user's last computed analytics, `None` before their first event
    pub fn analytics(&self, user_id: &str) -> Option<AnalyticsSummary> {
        self.read().analytics.get(user_id).cloned()
    }

    /// All users ranked by total XP, ties broken by user id
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let state = self.read();

        let mut board: Vec<LeaderboardEntry> = state
            .users
            .iter()
            .map(|(user_id, records)| LeaderboardEntry {
                user_id: user_id.clone(),
                total_xp: records.iter().map(|r| r.xp_earned).sum(),
                max_streak: records.iter().map(|r| r.streak).max().unwrap_or(0),
            })
            .collect();

        board.sort_by(|a, b| b.total_xp.cmp(&a.total_xp).then_with(|| a.user_id.cmp(&b.user_id)));
        board
    }

    /// The first `limit` leaderboard entries
    pub fn leaderboard_top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut board = self.leaderboard();
        board.truncate(limit);
        board
    }

    /// 1-based leaderboard position of a user
    pub fn rank_of(&self, user_id: &str) -> Option<usize> {
        self.leaderboard().iter().position(|e| e.user_id == user_id).map(|i| i + 1)
    }

    /// XP summed across the user's courses
    pub fn total_xp(&self, user_id: &str) -> u64 {
        self.read()
            .users
            .get(user_id)
            .map_or(0, |records| records.iter().map(|r| r.xp_earned).sum())
    }

    /// Number of users with at least one record
    pub fn user_count(&self) -> usize {
        self.read().users.len()
    }

    /// Export a user's progress and analytics as pretty-printed JSON
    pub fn export_progress(&self, user_id: &str) -> Result<String, TrackerError> {
        let export = {
            let state = self.read();
            ProgressExport {
                progress: state.users.get(user_id).cloned().unwrap_or_default(),
                analytics: state.analytics.get(user_id).cloned(),
                export_date: self.clock.now(),
            }
        };

        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Copy of the full store contents, for persistence
    pub fn snapshot(&self) -> StoreSnapshot {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreSnapshot> {
        self.state.read().unwrap_or_else(|poisoned| {
            tracing::warn!("Progress store lock poisoned, continuing with last state");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreSnapshot> {
        self.state.write().unwrap_or_else(|poisoned| {
            tracing::warn!("Progress store lock poisoned, continuing with last state");
            PoisonError::into_inner(poisoned)
        })
    }
}

fn validate_id(field: &'static str, value: &str) -> Result<(), TrackerError> {
    if value.trim().is_empty() {
        return Err(TrackerError::invalid(field, "must not be blank"));
    }
    Ok(())
}
