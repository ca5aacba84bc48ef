use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use mathquest::tracker::{
    JsonFileRepository, ManualClock, SnapshotRepository, XpLevel, achievements,
};
use mathquest::{Config, ProgressStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mathquest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a study event
    Record {
        /// Learner id
        #[arg(short, long)]
        user: String,
        /// Course id (e.g. logic, set-theory)
        #[arg(short, long)]
        course: String,
        /// Lesson number
        #[arg(short, long, default_value_t = 1)]
        lesson: i64,
        /// An exercise was completed
        #[arg(long)]
        completed: bool,
        /// Minutes spent
        #[arg(short, long, default_value_t = 0.0)]
        minutes: f64,
        /// Record the event at this RFC 3339 time instead of now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Show a learner's progress per course
    Progress {
        /// Learner id
        user: String,
    },
    /// Show a learner's analytics
    Analytics {
        /// Learner id
        user: String,
    },
    /// Show the leaderboard
    Leaderboard {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Export a learner's progress as JSON
    Export {
        /// Learner id
        user: String,
        /// Output path (defaults to mathquest-progress-<user>-<date>.json)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List all achievements
    Achievements {
        /// Mark the ones this learner has unlocked
        #[arg(short, long)]
        user: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mathquest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let repository = JsonFileRepository::new(config.snapshot_path()?);
    let mut store = ProgressStore::from_config(&config);
    if let Some(snapshot) = repository.load()? {
        store = store.with_snapshot(snapshot);
    }

    match cli.command {
        Commands::Record { user, course, lesson, completed, minutes, at } => {
            if let Some(at) = at {
                store = store.with_clock(Arc::new(ManualClock::new(at)));
            }
            let record = store.record_event(&user, &course, lesson, completed, minutes)?;
            repository.save(&store.snapshot())?;

            println!(
                "{} / {}: {}/{} exercises ({:.1}%), {} XP, {} day streak",
                record.user_id,
                record.course_id,
                record.completed_exercises,
                record.total_exercises,
                record.completion_percentage,
                record.xp_earned,
                record.streak
            );
        }
        Commands::Progress { user } => {
            let records = store.progress(&user);
            if records.is_empty() {
                println!("No progress recorded for {user}");
                return Ok(());
            }

            let level = XpLevel::from_xp(store.total_xp(&user));
            println!(
                "Level {} ({:.0}% to {} XP)",
                level.level, level.progress, level.next_level_xp
            );
            for record in records {
                println!(
                    "{:<20} {:>4}/{:<4} {:>6.1}%  {:>6} XP  {:>3} day streak  {:.0}h {:.0}m",
                    record.course_id,
                    record.completed_exercises,
                    record.total_exercises,
                    record.completion_percentage,
                    record.xp_earned,
                    record.streak,
                    (record.time_spent / 60.0).floor(),
                    record.time_spent % 60.0
                );
            }
        }
        Commands::Analytics { user } => {
            let Some(summary) = store.analytics(&user) else {
                println!("No analytics yet for {user}");
                return Ok(());
            };

            println!("Average time per exercise: {:.0} min", summary.average_time_per_exercise);
            println!("Accuracy rate: {}%", summary.accuracy_rate);
            println!("Preferred learning time: {}", summary.preferred_learning_time);
            println!("Most difficult topics: {}", summary.most_difficult_topics.join(", "));
            println!("Next recommended course: {}", summary.next_recommended_course);
            let options = textwrap::Options::new(76).initial_indent("- ").subsequent_indent("  ");
            for suggestion in &summary.improvement_suggestions {
                for line in textwrap::wrap(suggestion, &options) {
                    println!("{line}");
                }
            }
        }
        Commands::Leaderboard { limit } => {
            for (rank, entry) in store.leaderboard_top(limit).iter().enumerate() {
                println!(
                    "{:>3}. {:<20} {:>8} XP  {:>3} day streak",
                    rank + 1,
                    entry.user_id,
                    entry.total_xp,
                    entry.max_streak
                );
            }
        }
        Commands::Export { user, output } => {
            let output = output.unwrap_or_else(|| {
                format!("mathquest-progress-{}-{}.json", user, Utc::now().format("%Y-%m-%d"))
            });
            let json = store.export_progress(&user)?;
            std::fs::write(&output, json)
                .with_context(|| format!("Failed to write export to {:?}", output))?;
            println!("Exported progress for {user} to {output}");
        }
        Commands::Achievements { user } => {
            let unlocked = user
                .as_deref()
                .map(|u| achievements::unlocked(&store.progress(u)))
                .unwrap_or_default();

            if user.is_some() {
                println!(
                    "{} of {} achievements unlocked",
                    unlocked.len(),
                    achievements::AchievementKey::ALL.len()
                );
            }
            for (key, achievement) in achievements::catalog() {
                let mark = if unlocked.contains(&key) { "x" } else { " " };
                println!(
                    "[{}] {} {:<18} +{:<5} {}",
                    mark,
                    achievement.icon,
                    achievement.name,
                    achievement.xp_bonus,
                    achievement.description
                );
            }
        }
    }

    Ok(())
}
