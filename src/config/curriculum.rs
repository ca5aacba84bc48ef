//! Static course tables
//!
//! Exercise totals and the "what next" chain live in configuration rather
//! than code so that new courses can be added without a rebuild.

use std::collections::BTreeMap;

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Per-course reference data consumed by the progress store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curriculum {
    /// Exercises per course (course id -> count)
    pub exercise_counts: BTreeMap<String, u32>,

    /// Count used for courses missing from `exercise_counts`
    #[serde(default = "default_exercise_count")]
    pub default_exercise_count: u32,

    /// Course recommended once the current one is mostly done
    pub next_course: BTreeMap<String, String>,

    /// Recommendation for courses without an entry in `next_course`
    #[serde(default = "default_fallback_course")]
    pub fallback_course: String,

    /// Completion percentage at which the next course is recommended
    #[serde(default = "default_recommendation_threshold")]
    pub recommendation_threshold: f64,
}

fn default_exercise_count() -> u32 {
    100
}

fn default_fallback_course() -> String {
    "advanced-topics".to_string()
}

fn default_recommendation_threshold() -> f64 {
    80.0
}

impl Default for Curriculum {
    fn default() -> Self {
        let exercise_counts = [
            ("logic", 120),
            ("set-theory", 90),
            ("linear-algebra", 150),
            ("real-analysis", 180),
            ("abstract-algebra", 200),
        ]
        .into_iter()
        .map(|(course, count)| (course.to_string(), count))
        .collect();

        let next_course = [
            ("logic", "set-theory"),
            ("set-theory", "linear-algebra"),
            ("linear-algebra", "real-analysis"),
            ("proof-techniques", "abstract-algebra"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        Self {
            exercise_counts,
            default_exercise_count: default_exercise_count(),
            next_course,
            fallback_course: default_fallback_course(),
            recommendation_threshold: default_recommendation_threshold(),
        }
    }
}

impl Curriculum {
    /// Number of exercises in a course
    pub fn total_exercises(&self, course_id: &str) -> u32 {
        self.exercise_counts.get(course_id).copied().unwrap_or(self.default_exercise_count)
    }

    /// Course to take after `course_id`, ignoring completion
    pub fn recommended_after(&self, course_id: &str) -> &str {
        self.next_course.get(course_id).map_or(self.fallback_course.as_str(), String::as_str)
    }

    /// Recommendation given how far along the current course is
    pub fn next_for(&self, course_id: &str, completion_percentage: f64) -> String {
        if completion_percentage >= self.recommendation_threshold {
            self.recommended_after(course_id).to_string()
        } else {
            course_id.to_string()
        }
    }

    /// Reject tables that would break the completion arithmetic
    pub fn validate(&self) -> Result<()> {
        ensure!(self.default_exercise_count > 0, "default_exercise_count must be positive");
        for (course, count) in &self.exercise_counts {
            ensure!(*count > 0, "exercise count for '{}' must be positive", course);
        }
        ensure!(
            (0.0..=100.0).contains(&self.recommendation_threshold),
            "recommendation_threshold must be between 0 and 100, got {}",
            self.recommendation_threshold
        );
        Ok(())
    }
}
