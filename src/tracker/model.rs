//! Progress data model
//!
//! These types are what the store hands back to callers and what ends up in
//! the exported JSON, so field names are serialized in camelCase.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::achievements::AchievementKey;

/// Progress of one user through one course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// User identifier
    pub user_id: String,

    /// Course identifier (e.g. "logic")
    pub course_id: String,

    /// Last lesson touched
    pub lesson_id: i64,

    /// Exercises completed in this course, never decreases
    pub completed_exercises: u32,

    /// Exercises in the course, fixed when the record is created
    pub total_exercises: u32,

    /// `100 * completed / total`; may exceed 100 if the course table is stale
    pub completion_percentage: f64,

    /// Cumulative experience points
    pub xp_earned: u64,

    /// Cumulative study time (minutes)
    pub time_spent: f64,

    /// Time of the most recent event
    pub last_accessed: DateTime<Utc>,

    /// Consecutive-day counter
    pub streak: u32,

    /// Unlocked achievements
    pub achievements: BTreeSet<AchievementKey>,

    /// Reserved for the dashboard, never populated
    #[serde(default)]
    pub weak_areas: Vec<String>,

    /// Reserved for the dashboard, never populated
    #[serde(default)]
    pub strengths: Vec<String>,
}

impl ProgressRecord {
    /// Create an untouched record
    pub fn new(
        user_id: &str,
        course_id: &str,
        lesson_id: i64,
        total_exercises: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            lesson_id,
            completed_exercises: 0,
            total_exercises,
            completion_percentage: 0.0,
            xp_earned: 0,
            time_spent: 0.0,
            last_accessed: now,
            streak: 0,
            achievements: BTreeSet::new(),
            weak_areas: Vec::new(),
            strengths: Vec::new(),
        }
    }

    /// Completion derived from the counters
    pub fn derived_completion(&self) -> f64 {
        if self.total_exercises == 0 {
            return 0.0;
        }
        f64::from(self.completed_exercises) / f64::from(self.total_exercises) * 100.0
    }

    /// Minutes per completed exercise, 0 when nothing is completed yet
    pub fn average_minutes_per_exercise(&self) -> f64 {
        if self.completed_exercises == 0 {
            0.0
        } else {
            self.time_spent / f64::from(self.completed_exercises)
        }
    }
}

/// Derived learning analytics for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Minutes per exercise of the most recently updated course
    pub average_time_per_exercise: f64,

    /// Percentage of correct answers
    pub accuracy_rate: f64,

    /// Time of day the learner studies best (e.g. "morning")
    pub preferred_learning_time: String,

    /// Topics the learner struggles with
    pub most_difficult_topics: Vec<String>,

    /// Advice derived from the latest record
    pub improvement_suggestions: Vec<String>,

    /// Course to take next (the current course until it is mostly done)
    pub next_recommended_course: String,
}

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// User identifier
    #[serde(rename = "userId")]
    pub user_id: String,

    /// XP summed over all of the user's courses
    #[serde(rename = "totalXP")]
    pub total_xp: u64,

    /// Best streak over all of the user's courses
    #[serde(rename = "maxStreak")]
    pub max_streak: u32,
}

/// Downloadable snapshot of one user's data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressExport {
    /// All of the user's course records
    pub progress: Vec<ProgressRecord>,

    /// Last computed analytics, `null` before the first event
    pub analytics: Option<AnalyticsSummary>,

    /// When the export was produced
    pub export_date: DateTime<Utc>,
}
