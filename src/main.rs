// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Dojo Coach CLI
//!
//! Manage local goals, fitness assessments and workout history, chat with
//! the coordinator, and upload workouts.

use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use dojo_coach::{
    config::Config,
    db::LocalStore,
    models::{
        ActivityType, ChatMessage, ClimbStyle, CompletedRoute, CompletedRunning, CompletedWorkout,
        GradeValue, Goal, WorkoutSession,
    },
    services::{import_run, RunSamples, SyncService},
    time_utils::parse_wire_timestamp,
    SyncError,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "dojo-coach", version, about = "Goal, plan and workout sync for a remote coach")]
struct Cli {
    /// Keep all state in memory for this invocation
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a message to the coach, or show the conversation so far
    Chat {
        /// Message text; omit to print the saved transcript
        message: Option<String>,
    },
    /// Goal operations
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Fitness assessments
    Fitness {
        #[command(subcommand)]
        command: FitnessCommands,
    },
    /// Log a completed workout and upload it
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
    /// Completed workout history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Show the current training plan
    Plan,
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Add a goal
    Add {
        /// climbing or running
        activity: ActivityType,
        title: String,
        /// Deadline (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        deadline: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List goals, latest deadline first
    List,
    /// Mark a goal completed
    Done {
        id: Uuid,
        /// Mark it open again instead
        #[arg(long)]
        undo: bool,
    },
    /// Delete a goal
    Delete { id: Uuid },
}

#[derive(Subcommand)]
enum FitnessCommands {
    /// Show both assessments per activity
    Show,
    /// Set your own assessment for an activity
    Set {
        activity: ActivityType,
        assessment: String,
    },
}

#[derive(Subcommand)]
enum LogCommands {
    /// Log a run, from explicit figures or an exported samples file
    Run {
        /// JSON file with exported run samples
        #[arg(long, conflicts_with_all = ["distance_km", "heart_rate", "elevation_gain", "pace"])]
        samples: Option<PathBuf>,
        #[arg(long)]
        distance_km: Option<f64>,
        /// Average heart rate (bpm)
        #[arg(long)]
        heart_rate: Option<f64>,
        /// Elevation gain (m)
        #[arg(long)]
        elevation_gain: Option<f64>,
        /// Average pace (seconds per km)
        #[arg(long)]
        pace: Option<f64>,
        #[command(flatten)]
        common: LogArgs,
    },
    /// Log a climbing session
    Climb {
        /// GRADE[:ATTEMPTS[:STYLE]], e.g. 5.11a:3:redpoint or v4:1:nosend
        #[arg(long = "route", value_parser = parse_route, required = true)]
        routes: Vec<CompletedRoute>,
        #[command(flatten)]
        common: LogArgs,
    },
}

#[derive(clap::Args)]
struct LogArgs {
    #[arg(long, default_value = "")]
    notes: String,
    /// When the workout happened (RFC3339 or YYYY-MM-DD); defaults to now
    #[arg(long)]
    date: Option<String>,
    /// Save locally without uploading
    #[arg(long)]
    offline: bool,
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List completed workouts, latest first
    List,
    /// Delete a completed workout
    Delete { id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let store = if cli.ephemeral {
        LocalStore::open_in_memory()
    } else {
        LocalStore::open(&config.store_path)
    };
    let store = Arc::new(store.context("Failed to open store")?);
    store.ensure_fitness_levels()?;

    tracing::debug!(store = %config.store_path.display(), ephemeral = cli.ephemeral, "Store ready");

    match cli.command {
        Commands::Chat { message } => chat(&config, store, message.as_deref()).await,
        Commands::Goal { command } => goal(&store, command),
        Commands::Fitness { command } => fitness(&store, command),
        Commands::Log { command } => log_workout(&config, store, command).await,
        Commands::History { command } => history(&store, command),
        Commands::Plan => plan(&store),
    }
}

async fn chat(config: &Config, store: Arc<LocalStore>, message: Option<&str>) -> anyhow::Result<()> {
    let service = SyncService::from_config(config, store);
    let Some(message) = message else {
        for item in service.transcript()? {
            if let Some(text) = item.text() {
                let speaker = if item.is_user() { "you" } else { "coach" };
                println!("{speaker}: {text}");
            }
        }
        return Ok(());
    };
    if message.trim().is_empty() {
        bail!("Message is empty");
    }
    let outcome = finish_sync(&service, service.send_chat(message).await)?;
    if let Some(outcome) = outcome {
        let reply = outcome
            .messages
            .iter()
            .rev()
            .filter(|m| !m.is_user())
            .find_map(ChatMessage::text);
        match reply {
            Some(reply) => println!("{reply}"),
            None => println!("{}", outcome.server_msg),
        }
    }
    Ok(())
}

fn goal(store: &LocalStore, command: GoalCommands) -> anyhow::Result<()> {
    match command {
        GoalCommands::Add {
            activity,
            title,
            deadline,
            description,
        } => {
            let goal = Goal::new(activity, title, description, parse_date_arg(&deadline)?);
            store.insert_goal(&goal)?;
            println!("{}", goal.id);
        }
        GoalCommands::List => {
            let now = Utc::now();
            for goal in store.goals()? {
                println!(
                    "{}  [{}] {:<9} {}  ({} days left)",
                    goal.id,
                    if goal.is_completed { "x" } else { " " },
                    goal.activity.display_name(),
                    goal.title,
                    goal.days_remaining(now)
                );
            }
        }
        GoalCommands::Done { id, undo } => store.set_goal_completed(id, !undo)?,
        GoalCommands::Delete { id } => store.delete_goal(id)?,
    }
    Ok(())
}

fn fitness(store: &LocalStore, command: FitnessCommands) -> anyhow::Result<()> {
    match command {
        FitnessCommands::Show => {
            for level in store.fitness_levels()? {
                println!("{}", level.activity.display_name());
                println!("  You:   {}", level.user_assessment.as_deref().unwrap_or("-"));
                println!("  Coach: {}", level.agent_assessment.as_deref().unwrap_or("-"));
            }
        }
        FitnessCommands::Set { activity, assessment } => {
            store.set_user_assessment(activity, &assessment, Utc::now())?;
        }
    }
    Ok(())
}

async fn log_workout(
    config: &Config,
    store: Arc<LocalStore>,
    command: LogCommands,
) -> anyhow::Result<()> {
    let (workout, common) = match command {
        LogCommands::Run {
            samples,
            distance_km,
            heart_rate,
            elevation_gain,
            pace,
            common,
        } => {
            let date = date_or_now(common.date.as_deref())?;
            let workout = match samples {
                Some(path) => {
                    let raw = std::fs::read(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    let samples: RunSamples = serde_json::from_slice(&raw)
                        .with_context(|| format!("Invalid samples file {}", path.display()))?;
                    import_run(&samples).into_completed(common.notes.clone(), date)
                }
                None => CompletedWorkout::running(
                    common.notes.clone(),
                    date,
                    CompletedRunning {
                        distance_km: distance_km.unwrap_or_default(),
                        avg_heart_rate: heart_rate.unwrap_or_default(),
                        elevation_gain_m: elevation_gain.unwrap_or_default(),
                        avg_pace_sec_per_km: pace.unwrap_or_default(),
                    },
                ),
            };
            (workout, common)
        }
        LogCommands::Climb { routes, common } => {
            let date = date_or_now(common.date.as_deref())?;
            (CompletedWorkout::climbing(common.notes.clone(), date, routes), common)
        }
    };

    if common.offline {
        store.insert_completed_workout(&workout)?;
        println!("{}", workout.id);
        return Ok(());
    }

    let id = workout.id;
    let service = SyncService::from_config(config, store.clone());
    let result = service.submit_workout(workout).await;
    println!("{id}");
    let outcome = finish_sync(&service, result).with_context(|| {
        let saved = store
            .workout_history()
            .is_ok_and(|history| history.iter().any(|w| w.id == id));
        if saved {
            format!("Workout {id} is saved locally but the upload did not complete")
        } else {
            format!("Workout {id} was not saved")
        }
    })?;
    if let Some(outcome) = outcome {
        println!("{}", outcome.server_msg);
    }
    Ok(())
}

fn history(store: &LocalStore, command: HistoryCommands) -> anyhow::Result<()> {
    match command {
        HistoryCommands::List => {
            for workout in store.workout_history()? {
                println!(
                    "{}  {}  {:<9} {}",
                    workout.id,
                    workout.date.format("%Y-%m-%d"),
                    workout.activity().display_name(),
                    workout.notes
                );
            }
        }
        HistoryCommands::Delete { id } => store.delete_completed_workout(id)?,
    }
    Ok(())
}

fn plan(store: &LocalStore) -> anyhow::Result<()> {
    match store.last_synced_at()? {
        Some(at) => println!("Last synced {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => println!("Not synced yet"),
    }
    for day in store.plans()? {
        println!("{}", day.date.format("%a %Y-%m-%d"));
        for session in &day.sessions {
            println!("  {}: {}", session.activity().display_name(), session.description());
            if let WorkoutSession::Climbing(climb) = session {
                for route in &climb.routes {
                    println!("    {:<6} {}", route.grade.display(), route.description);
                }
            }
        }
    }
    Ok(())
}

/// Surface a sync result. A failed local save is retried once; if that also
/// fails the error is returned.
fn finish_sync<T>(service: &SyncService, result: Result<T, SyncError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_retryable_save() && service.has_pending() => {
            eprintln!("Saving the coach's changes failed ({e}), retrying once");
            service.retry_persist()?;
            eprintln!("Saved.");
            Ok(None)
        }
        Err(e) if e.is_network() => Err(e).context("Could not reach the coach"),
        Err(e) if e.is_server_response() => Err(e).context("The coach sent an unusable reply"),
        Err(e) => Err(e.into()),
    }
}

fn parse_date_arg(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(day) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Ok(parse_wire_timestamp(raw.trim())?)
}

fn date_or_now(raw: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    raw.map(parse_date_arg).transpose().map(|d| d.unwrap_or_else(Utc::now))
}

fn parse_route(raw: &str) -> Result<CompletedRoute, String> {
    let mut parts = raw.split(':');
    let grade = parts
        .next()
        .unwrap_or_default()
        .parse::<GradeValue>()
        .map_err(|e| e.to_string())?;
    let attempts = match parts.next() {
        Some(a) => a.trim().parse::<u32>().map_err(|e| format!("attempts: {e}"))?,
        None => 1,
    };
    let style = match parts.next() {
        Some(s) => s.parse::<ClimbStyle>()?,
        None => ClimbStyle::Redpoint,
    };
    if parts.next().is_some() {
        return Err(format!("expected GRADE[:ATTEMPTS[:STYLE]], got {raw:?}"));
    }
    Ok(CompletedRoute {
        grade,
        attempts,
        sent: style != ClimbStyle::NoSend,
        style,
    })
}

/// Initialize structured JSON logging on stderr.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dojo_coach=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
