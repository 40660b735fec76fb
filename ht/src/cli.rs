//! CLI command definitions and subcommands

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{DateRange, HabitKind, RangePreset, parse_date};
use crate::ordering::Direction;
use crate::state::StateError;

/// Habitrack - local habit tracker
#[derive(Parser)]
#[command(
    name = "ht",
    about = "Track daily check and count habits",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: <store-dir>/logs/habitrack.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, help = "Log level (trace, debug, info, warn, error)")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List habits in display order
    List,

    /// Create a habit
    Add {
        /// Display name
        name: String,

        /// Habit kind (check or count)
        #[arg(short, long, default_value = "check")]
        kind: KindArg,

        /// Count toward the required completion figure
        #[arg(short, long)]
        required: bool,

        /// Threshold for a required count habit (implies --required)
        #[arg(short, long)]
        min_count: Option<u32>,

        /// Icon shown next to the name
        #[arg(short, long)]
        icon: Option<String>,

        /// Color as #rrggbb; picked automatically when omitted
        #[arg(long)]
        color: Option<String>,
    },

    /// Edit a habit's name, icon, color or requirement
    Edit {
        /// Habit id, id prefix or name
        habit: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        icon: Option<String>,

        #[arg(long)]
        color: Option<String>,

        /// Make the habit required (true) or optional (false)
        #[arg(short, long)]
        required: Option<bool>,

        /// Threshold for a required count habit
        #[arg(short, long)]
        min_count: Option<u32>,
    },

    /// Delete a habit (its logs are kept)
    Delete {
        /// Habit id, id prefix or name
        habit: String,
    },

    /// Move a habit one slot up or down
    Move {
        /// Habit id, id prefix or name
        habit: String,

        /// up or down
        direction: Direction,
    },

    /// Toggle a check habit for a day
    Check {
        /// Habit id, id prefix or name
        habit: String,

        /// Date as YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Add to a count habit for a day
    Inc {
        /// Habit id, id prefix or name
        habit: String,

        /// Amount to add; negative to subtract
        #[arg(short, long, default_value = "1", allow_hyphen_values = true)]
        by: i64,

        /// Date as YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Set a count habit's value for a day
    Set {
        /// Habit id, id prefix or name
        habit: String,

        /// New value; negatives are stored as 0
        #[arg(allow_hyphen_values = true)]
        value: i64,

        /// Date as YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show every habit's state and the completion summary for a day
    Day {
        /// Date as YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show a habit's statistics over a range
    Stats {
        /// Habit id, id prefix or name
        habit: String,

        /// Range (7d, 30d, year, custom)
        #[arg(short, long, default_value = "7d")]
        range: RangeArg,

        /// Year for --range year (default: current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Start date for --range custom
        #[arg(long)]
        start: Option<String>,

        /// End date for --range custom
        #[arg(long)]
        end: Option<String>,
    },

    /// Show a month grid with completion rings
    Calendar {
        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Suggest a color distinct from the habits' current colors
    SuggestColor,
}

/// Habit kind as typed on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
    Check,
    Count,
}

impl KindArg {
    /// Resolve to a habit kind; a threshold makes a count habit required
    pub fn to_kind(self, required: bool, min_count: Option<u32>) -> Result<HabitKind, StateError> {
        match self {
            Self::Check if min_count.is_some() => Err(StateError::InvalidInput(
                "--min-count only applies to count habits".to_string(),
            )),
            Self::Check => Ok(HabitKind::check(required)),
            Self::Count if required || min_count.is_some() => Ok(HabitKind::count_at_least(min_count.unwrap_or(1))),
            Self::Count => Ok(HabitKind::count()),
        }
    }
}

impl std::str::FromStr for KindArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "check" => Ok(Self::Check),
            "count" => Ok(Self::Count),
            _ => Err(format!("Unknown kind: {}. Use: check or count", s)),
        }
    }
}

/// Statistics range as typed on the command line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RangeArg {
    #[default]
    Week,
    Month,
    Year,
    Custom,
}

impl RangeArg {
    /// Combine with the optional flags into a range preset
    pub fn to_preset(
        self,
        today: NaiveDate,
        year: Option<i32>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<RangePreset, StateError> {
        match self {
            Self::Week => Ok(RangePreset::Week),
            Self::Month => Ok(RangePreset::Month),
            Self::Year => Ok(RangePreset::Year(year.unwrap_or(today.year()))),
            Self::Custom => {
                let start = start.ok_or_else(|| StateError::InvalidInput("--range custom needs --start".to_string()))?;
                let end = end.map(parse_date).transpose()?.unwrap_or(today);
                Ok(RangePreset::Custom(DateRange::new(parse_date(start)?, end)))
            }
        }
    }
}

impl std::str::FromStr for RangeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "7d" | "week" => Ok(Self::Week),
            "30d" | "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "custom" => Ok(Self::Custom),
            _ => Err(format!("Unknown range: {}. Use: 7d, 30d, year, or custom", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from(["ht", "add", "Pushups", "--kind", "count", "--min-count", "20"]).unwrap();
        match cli.command {
            Command::Add {
                name, kind, min_count, ..
            } => {
                assert_eq!(name, "Pushups");
                assert_eq!(kind, KindArg::Count);
                assert_eq!(min_count, Some(20));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_negative_increment() {
        let cli = Cli::try_parse_from(["ht", "inc", "push", "--by", "-3"]).unwrap();
        assert!(matches!(cli.command, Command::Inc { by: -3, .. }));
    }

    #[test]
    fn test_parse_move_direction() {
        let cli = Cli::try_parse_from(["ht", "move", "surf", "up"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Move {
                direction: Direction::Up,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["ht", "move", "surf", "sideways"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ht", "list", "--config", "x.yml", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_kind_arg_to_kind() {
        assert_eq!(KindArg::Check.to_kind(true, None).unwrap(), HabitKind::check(true));
        assert_eq!(KindArg::Count.to_kind(false, None).unwrap(), HabitKind::count());
        assert_eq!(KindArg::Count.to_kind(true, None).unwrap(), HabitKind::count_at_least(1));
        assert_eq!(KindArg::Count.to_kind(false, Some(5)).unwrap(), HabitKind::count_at_least(5));
        assert!(KindArg::Check.to_kind(true, Some(5)).is_err());
    }

    #[test]
    fn test_range_arg_to_preset() {
        let today = d("2024-06-15");
        assert_eq!(RangeArg::Week.to_preset(today, None, None, None).unwrap(), RangePreset::Week);
        assert_eq!(
            RangeArg::Year.to_preset(today, None, None, None).unwrap(),
            RangePreset::Year(2024)
        );
        assert_eq!(
            RangeArg::Custom
                .to_preset(today, None, Some("2024-06-01"), None)
                .unwrap(),
            RangePreset::Custom(DateRange::new(d("2024-06-01"), today))
        );
        assert!(RangeArg::Custom.to_preset(today, None, None, None).is_err());
        assert!(RangeArg::Custom.to_preset(today, None, Some("June"), None).is_err());
        assert_eq!("30d".parse::<RangeArg>().unwrap(), RangeArg::Month);
        assert!("fortnight".parse::<RangeArg>().is_err());
    }
}
