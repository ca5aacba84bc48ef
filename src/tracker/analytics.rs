//! Learning analytics derived from progress records

use serde::{Deserialize, Serialize};

use super::model::{AnalyticsSummary, ProgressRecord};
use crate::config::Curriculum;

/// XP needed per level
const XP_PER_LEVEL: u64 = 1_000;

/// Supplies the analytics fields that cannot be derived from a single record
///
/// Implement this to plug in real answer-level statistics.
pub trait AnalyticsProvider: Send + Sync {
    /// Percentage of correct answers for the user in a course
    fn accuracy_rate(&self, user_id: &str, course_id: &str) -> f64;

    /// Time of day the user studies best
    fn preferred_learning_time(&self, user_id: &str) -> String;

    /// Topics the user finds hardest
    fn most_difficult_topics(&self, user_id: &str) -> Vec<String>;
}

/// Fixed values used until answer-level data is collected
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderAnalytics;

impl AnalyticsProvider for PlaceholderAnalytics {
    fn accuracy_rate(&self, _user_id: &str, _course_id: &str) -> f64 {
        85.0
    }

    fn preferred_learning_time(&self, _user_id: &str) -> String {
        "morning".to_string()
    }

    fn most_difficult_topics(&self, _user_id: &str) -> Vec<String> {
        vec!["proof_techniques".to_string(), "complex_analysis".to_string()]
    }
}

/// Build a user's summary from the record that was just updated
pub fn summarize(
    record: &ProgressRecord,
    provider: &dyn AnalyticsProvider,
    curriculum: &Curriculum,
) -> AnalyticsSummary {
    AnalyticsSummary {
        average_time_per_exercise: record.average_minutes_per_exercise(),
        accuracy_rate: provider.accuracy_rate(&record.user_id, &record.course_id),
        preferred_learning_time: provider.preferred_learning_time(&record.user_id),
        most_difficult_topics: provider.most_difficult_topics(&record.user_id),
        improvement_suggestions: improvement_suggestions(record),
        next_recommended_course: curriculum
            .next_for(&record.course_id, record.completion_percentage),
    }
}

/// Threshold-based advice for a record
pub fn improvement_suggestions(record: &ProgressRecord) -> Vec<String> {
    let mut suggestions = Vec::new();

    if record.completion_percentage < 50.0 {
        suggestions.push("Try to complete at least one lesson per day".to_string());
    }

    if record.streak < 7 {
        suggestions.push("Build a daily learning habit for better retention".to_string());
    }

    // Time spent without completing anything counts as slow
    let slow = if record.completed_exercises == 0 {
        record.time_spent > 0.0
    } else {
        record.average_minutes_per_exercise() > 30.0
    };
    if slow {
        suggestions.push("Focus on fundamental concepts to improve speed".to_string());
    }

    suggestions
}

/// Level reached for a total XP amount
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XpLevel {
    /// Current level, starting at 1
    pub level: u64,
    /// Total XP at which the next level starts
    pub next_level_xp: u64,
    /// Progress towards the next level (0-100)
    pub progress: f64,
}

impl XpLevel {
    /// Compute the level for `total_xp`
    pub fn from_xp(total_xp: u64) -> Self {
        let level = total_xp / XP_PER_LEVEL + 1;
        Self {
            level,
            next_level_xp: level * XP_PER_LEVEL,
            progress: (total_xp % XP_PER_LEVEL) as f64 / XP_PER_LEVEL as f64 * 100.0,
        }
    }
}
