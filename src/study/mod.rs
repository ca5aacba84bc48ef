//! Study sessions
//!
//! A session tallies exercises while the learner works through a lesson and
//! reports them to the [`ProgressStore`] as a single event when it ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tracker::{ProgressRecord, ProgressStore, TrackerError};

/// Session XP per completed exercise
const BASE_XP_PER_EXERCISE: u64 = 10;
/// Session XP for a perfect accuracy rate
const MAX_ACCURACY_BONUS: f64 = 50.0;
/// Minutes of study per time bonus
const MINUTES_PER_TIME_BONUS: u64 = 30;
/// XP per full block of study time
const TIME_BONUS_XP: u64 = 5;

/// An in-progress study session
#[derive(Debug, Clone)]
pub struct StudySession {
    user_id: String,
    course_id: String,
    lesson_id: i64,
    started_at: DateTime<Utc>,
    completed_exercises: u32,
    correct_answers: u32,
}

/// Outcome of a finished session, for the end-of-session screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Whole minutes the session lasted
    pub total_minutes: u64,
    pub completed_exercises: u32,
    pub correct_answers: u32,
    pub base_xp: u64,
    pub accuracy_bonus: u64,
    pub time_bonus: u64,
    /// Sum of the three XP parts
    pub xp_earned: u64,
}

impl StudySession {
    /// Begin a session on a lesson
    pub fn start(
        user_id: &str,
        course_id: &str,
        lesson_id: i64,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            lesson_id,
            started_at,
            completed_exercises: 0,
            correct_answers: 0,
        }
    }

    /// Count a finished exercise
    pub fn complete_exercise(&mut self, correct: bool) {
        self.completed_exercises += 1;
        if correct {
            self.correct_answers += 1;
        }
    }

    /// Exercises finished so far
    pub fn completed_exercises(&self) -> u32 {
        self.completed_exercises
    }

    /// Summary of the session if it ended at `ended_at`
    pub fn summary(&self, ended_at: DateTime<Utc>) -> SessionSummary {
        let total_minutes = (ended_at - self.started_at).num_minutes().max(0) as u64;
        let base_xp = u64::from(self.completed_exercises) * BASE_XP_PER_EXERCISE;
        let accuracy = f64::from(self.correct_answers) / f64::from(self.completed_exercises.max(1));
        let accuracy_bonus = (accuracy * MAX_ACCURACY_BONUS).floor() as u64;
        let time_bonus = total_minutes / MINUTES_PER_TIME_BONUS * TIME_BONUS_XP;

        SessionSummary {
            total_minutes,
            completed_exercises: self.completed_exercises,
            correct_answers: self.correct_answers,
            base_xp,
            accuracy_bonus,
            time_bonus,
            xp_earned: base_xp + accuracy_bonus + time_bonus,
        }
    }

    /// End the session and report it to the store as one event
    ///
    /// The event counts as a completed exercise if anything was completed,
    /// and carries the whole session duration. The returned summary is for
    /// display; the store's XP is what persists.
    pub fn finish(
        self,
        store: &ProgressStore,
        ended_at: DateTime<Utc>,
    ) -> Result<(SessionSummary, ProgressRecord), TrackerError> {
        let summary = self.summary(ended_at);
        let record = store.record_event(
            &self.user_id,
            &self.course_id,
            self.lesson_id,
            self.completed_exercises > 0,
            summary.total_minutes as f64,
        )?;

        tracing::debug!(
            "Finished session for {}/{} lesson {}: {} exercises, {} XP",
            self.user_id,
            self.course_id,
            self.lesson_id,
            summary.completed_exercises,
            summary.xp_earned
        );

        Ok((summary, record))
    }
}
