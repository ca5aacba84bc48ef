//! Achievement catalog and unlock rules
//!
//! Achievements are derived purely from a record's cumulative fields. Every
//! threshold is re-checked on each event and the result is unioned into the
//! record's set, so an achievement can never be lost.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::error::TrackerError;
use super::model::ProgressRecord;

/// Identifier of an unlockable achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKey {
    WeekWarrior,
    MonthMaster,
    CenturyScholar,
    ThousandPoints,
    FiveKChampion,
    TenKLegend,
    HalfwayHero,
    CourseConqueror,
    DedicatedLearner,
    TimeMaster,
}

impl AchievementKey {
    /// Every key, in catalog order
    pub const ALL: [AchievementKey; 10] = [
        AchievementKey::WeekWarrior,
        AchievementKey::MonthMaster,
        AchievementKey::CenturyScholar,
        AchievementKey::ThousandPoints,
        AchievementKey::FiveKChampion,
        AchievementKey::TenKLegend,
        AchievementKey::HalfwayHero,
        AchievementKey::CourseConqueror,
        AchievementKey::DedicatedLearner,
        AchievementKey::TimeMaster,
    ];

    /// Stable string key, as used in exports
    pub fn as_str(self) -> &'static str {
        match self {
            AchievementKey::WeekWarrior => "week_warrior",
            AchievementKey::MonthMaster => "month_master",
            AchievementKey::CenturyScholar => "century_scholar",
            AchievementKey::ThousandPoints => "thousand_points",
            AchievementKey::FiveKChampion => "five_k_champion",
            AchievementKey::TenKLegend => "ten_k_legend",
            AchievementKey::HalfwayHero => "halfway_hero",
            AchievementKey::CourseConqueror => "course_conqueror",
            AchievementKey::DedicatedLearner => "dedicated_learner",
            AchievementKey::TimeMaster => "time_master",
        }
    }

    /// Display metadata from the catalog
    pub fn info(self) -> &'static Achievement {
        &CATALOG[&self]
    }
}

impl fmt::Display for AchievementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AchievementKey {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AchievementKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| TrackerError::invalid("achievement", format!("unknown key '{s}'")))
    }
}

/// Static description of an achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    /// Display name
    pub name: &'static str,
    /// What the learner did to earn it
    pub description: &'static str,
    /// Badge glyph
    pub icon: &'static str,
    /// XP shown on the badge
    pub xp_bonus: u32,
}

static CATALOG: Lazy<BTreeMap<AchievementKey, Achievement>> = Lazy::new(|| {
    use AchievementKey::*;

    fn entry(
        name: &'static str,
        description: &'static str,
        icon: &'static str,
        xp_bonus: u32,
    ) -> Achievement {
        Achievement { name, description, icon, xp_bonus }
    }

    BTreeMap::from([
        (WeekWarrior, entry("Week Warrior", "Maintain a 7-day learning streak", "🔥", 50)),
        (MonthMaster, entry("Month Master", "Maintain a 30-day learning streak", "🏆", 200)),
        (
            CenturyScholar,
            entry("Century Scholar", "Maintain a 100-day learning streak", "🌟", 1000),
        ),
        (ThousandPoints, entry("Thousand Points", "Earn 1,000 XP", "💎", 100)),
        (FiveKChampion, entry("5K Champion", "Earn 5,000 XP", "🏅", 500)),
        (TenKLegend, entry("10K Legend", "Earn 10,000 XP", "👑", 1000)),
        (HalfwayHero, entry("Halfway Hero", "Complete 50% of a course", "🎯", 25)),
        (CourseConqueror, entry("Course Conqueror", "Complete an entire course", "🏰", 100)),
        (DedicatedLearner, entry("Dedicated Learner", "Study for 10 hours total", "📚", 75)),
        (TimeMaster, entry("Time Master", "Study for 30 hours total", "⏰", 200)),
    ])
});

/// Iterate the full catalog in key order
pub fn catalog() -> impl Iterator<Item = (AchievementKey, &'static Achievement)> {
    CATALOG.iter().map(|(key, achievement)| (*key, achievement))
}

/// All achievements a record currently qualifies for
pub fn evaluate(record: &ProgressRecord) -> Vec<AchievementKey> {
    use AchievementKey::*;

    let streak = record.streak;
    let xp = record.xp_earned;
    let completion = record.completion_percentage;
    let minutes = record.time_spent;

    let rules = [
        (streak >= 7, WeekWarrior),
        (streak >= 30, MonthMaster),
        (streak >= 100, CenturyScholar),
        (xp >= 1_000, ThousandPoints),
        (xp >= 5_000, FiveKChampion),
        (xp >= 10_000, TenKLegend),
        (completion >= 50.0, HalfwayHero),
        (completion >= 100.0, CourseConqueror),
        // 10 and 30 hours
        (minutes >= 600.0, DedicatedLearner),
        (minutes >= 1_800.0, TimeMaster),
    ];

    rules.into_iter().filter_map(|(earned, key)| earned.then_some(key)).collect()
}

/// Distinct achievements unlocked across a set of records
pub fn unlocked(records: &[ProgressRecord]) -> BTreeSet<AchievementKey> {
    records.iter().flat_map(|r| r.achievements.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record() -> ProgressRecord {
        ProgressRecord::new("u1", "logic", 1, 120, Utc::now())
    }

    #[test]
    fn fresh_record_earns_nothing() {
        assert!(evaluate(&record()).is_empty());
    }

    #[test]
    fn streak_thresholds_stack() {
        let mut r = record();
        r.streak = 30;
        assert_eq!(evaluate(&r), vec![AchievementKey::WeekWarrior, AchievementKey::MonthMaster]);

        r.streak = 100;
        assert_eq!(evaluate(&r).len(), 3);
    }

    #[test]
    fn xp_thresholds_are_inclusive() {
        let mut r = record();
        r.xp_earned = 999;
        assert!(evaluate(&r).is_empty());
        r.xp_earned = 1_000;
        assert_eq!(evaluate(&r), vec![AchievementKey::ThousandPoints]);
        r.xp_earned = 10_000;
        assert_eq!(evaluate(&r).len(), 3);
    }

    #[test]
    fn completion_at_exactly_one_hundred_conquers() {
        let mut r = record();
        r.completion_percentage = 100.0;
        assert_eq!(
            evaluate(&r),
            vec![AchievementKey::HalfwayHero, AchievementKey::CourseConqueror]
        );
    }

    #[test]
    fn time_thresholds_use_minutes() {
        let mut r = record();
        r.time_spent = 599.5;
        assert!(evaluate(&r).is_empty());
        r.time_spent = 1_800.0;
        assert_eq!(
            evaluate(&r),
            vec![AchievementKey::DedicatedLearner, AchievementKey::TimeMaster]
        );
    }

    #[test]
    fn catalog_covers_every_key() {
        assert_eq!(catalog().count(), AchievementKey::ALL.len());
        assert_eq!(AchievementKey::WeekWarrior.info().name, "Week Warrior");
        assert_eq!(AchievementKey::TimeMaster.info().xp_bonus, 200);
    }

    #[test]
    fn keys_serialize_as_snake_case() {
        for key in AchievementKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }

    #[test]
    fn parse_known_and_unknown_keys() {
        assert_eq!(
            "five_k_champion".parse::<AchievementKey>().unwrap(),
            AchievementKey::FiveKChampion
        );
        assert!("speed_demon".parse::<AchievementKey>().unwrap_err().is_invalid_input());
    }

    #[test]
    fn unlocked_deduplicates_across_courses() {
        let mut a = record();
        a.achievements.insert(AchievementKey::WeekWarrior);
        let mut b = ProgressRecord::new("u1", "set-theory", 1, 90, Utc::now());
        b.achievements.insert(AchievementKey::WeekWarrior);
        b.achievements.insert(AchievementKey::HalfwayHero);

        assert_eq!(unlocked(&[a, b]).len(), 2);
    }
}
