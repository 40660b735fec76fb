//! Habitrack - local habit tracker
//!
//! CLI entry point for managing habits and viewing progress.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use habitrack::analytics::{self, DaySummary, MonthCalendar, RangeKpis};
use habitrack::cli::{Cli, Command};
use habitrack::color::{parse_hex, pick_color};
use habitrack::config::Config;
use habitrack::domain::{Habit, IdResolver, LogValue, Month, format_date, parse_date, today};
use habitrack::state::{HabitEdit, NewHabit, StateManager};

fn setup_logging(log_dir: &Path, cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("habitrack.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    setup_logging(
        &config.storage.log_dir(),
        cli.log_level.as_deref(),
        config.log_level.as_deref(),
    )
    .context("Failed to setup logging")?;
    info!(store_dir = %config.storage.store_dir, "Habitrack starting");

    let state = StateManager::spawn(config.storage.store_path()).context("Failed to open habit store")?;

    if config.seed.enabled {
        let habit = config.seed.habit.to_habit().context("Invalid seed habit in config")?;
        state.seed_defaults(habit).await?;
    }

    debug!(command = ?cli.command, "main: dispatching command");
    let result = run(&state, cli.command).await;

    state.shutdown().await?;
    result
}

async fn run(state: &StateManager, command: Command) -> Result<()> {
    match command {
        Command::List => cmd_list(state).await,
        Command::Add {
            name,
            kind,
            required,
            min_count,
            icon,
            color,
        } => {
            let kind = kind.to_kind(required, min_count)?;
            let habit = state
                .add_habit(NewHabit {
                    name,
                    icon,
                    kind,
                    color,
                })
                .await?;
            println!("{} {} {}", "Created".green(), describe(&habit), habit.id.dimmed());
            Ok(())
        }
        Command::Edit {
            habit,
            name,
            icon,
            color,
            required,
            min_count,
        } => {
            let id = resolve_habit(state, &habit).await?.id;
            let edit = HabitEdit {
                name,
                icon,
                color,
                required,
                min_count,
            };
            let habit = state.edit_habit(&id, edit).await?;
            println!("{} {}", "Updated".green(), describe(&habit));
            Ok(())
        }
        Command::Delete { habit } => {
            let habit = resolve_habit(state, &habit).await?;
            state.delete_habit(&habit.id).await?;
            println!("{} {}", "Deleted".red(), describe(&habit));
            Ok(())
        }
        Command::Move { habit, direction } => {
            let habit = resolve_habit(state, &habit).await?;
            if state.move_habit(&habit.id, direction).await? {
                cmd_list(state).await
            } else {
                println!("{} can't move {:?}", describe(&habit), direction);
                Ok(())
            }
        }
        Command::Check { habit, date } => {
            let date = date_or_today(date.as_deref())?;
            let habit = resolve_habit(state, &habit).await?;
            let done = state.toggle_check(date, &habit.id).await?;
            let mark = if done { "done".green() } else { "not done".yellow() };
            println!("{} {} on {}", describe(&habit), mark, format_date(date));
            Ok(())
        }
        Command::Inc { habit, by, date } => {
            let date = date_or_today(date.as_deref())?;
            let habit = resolve_habit(state, &habit).await?;
            let value = state.adjust_count(date, &habit.id, by).await?;
            print_count(&habit, date, value);
            Ok(())
        }
        Command::Set { habit, value, date } => {
            let date = date_or_today(date.as_deref())?;
            let habit = resolve_habit(state, &habit).await?;
            let value = state.set_count(date, &habit.id, value).await?;
            print_count(&habit, date, value);
            Ok(())
        }
        Command::Day { date } => {
            let date = date_or_today(date.as_deref())?;
            cmd_day(state, date).await
        }
        Command::Stats {
            habit,
            range,
            year,
            start,
            end,
        } => {
            let habit = resolve_habit(state, &habit).await?;
            let range = range
                .to_preset(today(), year, start.as_deref(), end.as_deref())?
                .resolve(today())?;
            let kpis = analytics::habit_range_kpis(state, &habit, range).await;
            println!("{}", describe(&habit));
            println!("  {}", range.to_string().dimmed());
            print_kpis(&kpis);
            Ok(())
        }
        Command::Calendar { month } => {
            let month = match month {
                Some(m) => Month::parse(&m)?,
                None => Month::containing(today()),
            };
            let habits = state.load_habits().await?;
            let calendar = analytics::month_calendar(state, &habits, month).await;
            print_calendar(&calendar);
            Ok(())
        }
        Command::SuggestColor => {
            let habits = state.get_habits().await?;
            let used: Vec<&str> = habits.iter().map(|h| h.color.as_str()).collect();
            let color = pick_color(&used);
            println!("{} {}", swatch(&color), color);
            Ok(())
        }
    }
}

async fn cmd_list(state: &StateManager) -> Result<()> {
    let habits = state.load_habits().await?;
    if habits.is_empty() {
        println!("No habits yet. Add one with: ht add <name>");
        return Ok(());
    }

    for habit in &habits {
        let kind = format!("({})", habit.kind);
        println!("{} {} {}", describe(habit), kind.dimmed(), habit.id.dimmed());
    }
    Ok(())
}

async fn cmd_day(state: &StateManager, date: chrono::NaiveDate) -> Result<()> {
    let habits = state.load_habits().await?;
    let entries = analytics::day_entries(state, &habits, date).await;
    let summary = DaySummary::from_entries(date, &entries);

    println!("{}", format_date(date).bold());
    for entry in &entries {
        let value = match (entry.value, entry.habit.kind.is_count()) {
            (Some(v), _) => v.to_string(),
            (None, true) => LogValue::Count(0).to_string(),
            (None, false) => LogValue::Check(false).to_string(),
        };
        let value = if entry.done { value.green() } else { value.normal() };
        println!("  {:>4}  {}", value, describe(&entry.habit));
    }

    println!();
    println!(
        "Required {}  Optional {}  Count total {}",
        percent_label(summary.required_percent),
        percent_label(summary.optional_percent),
        summary.count_total.to_string().bold()
    );
    Ok(())
}

fn print_kpis(kpis: &RangeKpis) {
    match kpis {
        RangeKpis::Check(k) => {
            println!("  Done     {}/{} days ({})", k.done, k.days, percent_label(k.percent));
            println!("  Missed   {}", k.missed);
        }
        RangeKpis::Count(k) => {
            println!("  Total    {}", k.total.to_string().bold());
            println!("  Average  {}/day", k.average());
            println!("  Max      {}", k.max);
        }
    }
}

fn print_calendar(calendar: &MonthCalendar) {
    println!("{}", calendar.month.label().bold());
    println!("{}", "Mo Tu We Th Fr Sa Su".dimmed());

    for week in calendar.weeks() {
        let cells: Vec<String> = week
            .iter()
            .map(|day| {
                let label = format!("{:>2}", chrono::Datelike::day(&day.date));
                match (&day.ring, day.in_month) {
                    (Some(ring), true) => paint(&label, &ring[0]).bold().to_string(),
                    (None, true) => label,
                    (_, false) => label.dimmed().to_string(),
                }
            })
            .collect();
        println!("{}", cells.join(" "));
    }

    let ringed: Vec<_> = calendar.days.iter().filter(|d| d.in_month && d.ring.is_some()).collect();
    if !ringed.is_empty() {
        println!();
    }
    for day in ringed {
        let ring: String = day.ring.iter().flatten().map(|c| swatch(c).to_string()).collect();
        println!("{} {}", format_date(day.date), ring);
    }
}

fn print_count(habit: &Habit, date: chrono::NaiveDate, value: u32) {
    let done = habit.is_done(&LogValue::Count(value));
    let value = if done {
        value.to_string().green()
    } else {
        value.to_string().normal()
    };
    println!("{} {} on {}", describe(habit), value, format_date(date));
}

/// Find a habit from an id, id prefix or name
async fn resolve_habit(state: &StateManager, reference: &str) -> Result<Habit> {
    let habits = state.get_habits().await?;
    let names: HashMap<String, String> = habits.iter().map(|h| (h.id.clone(), h.name.clone())).collect();

    match IdResolver::new(&names).resolve(reference) {
        Ok(Some(id)) => habits
            .into_iter()
            .find(|h| h.id == id)
            .ok_or_else(|| eyre!("Habit '{}' vanished", id)),
        Ok(None) => Err(eyre!("No habit matches '{}'", reference)),
        Err(candidates) => Err(eyre!(
            "'{}' matches several habits: {}",
            reference,
            candidates.join(", ")
        )),
    }
}

fn date_or_today(date: Option<&str>) -> Result<chrono::NaiveDate> {
    Ok(date.map(parse_date).transpose()?.unwrap_or_else(today))
}

fn describe(habit: &Habit) -> String {
    format!("{} {} {}", swatch(&habit.color), habit.icon, habit.name.bold())
}

fn swatch(color: &str) -> ColoredString {
    paint("●", color)
}

fn paint(text: &str, color: &str) -> ColoredString {
    match parse_hex(color) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

fn percent_label(percent: u32) -> ColoredString {
    let label = format!("{}%", percent);
    match percent {
        100 => label.green().bold(),
        50..=99 => label.yellow(),
        _ => label.red(),
    }
}
