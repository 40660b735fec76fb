//! Habitrack configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{DEFAULT_COLOR, Habit, HabitKind};

/// Main Habitrack configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error); the CLI flag wins
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Storage configuration
    pub storage: StorageConfig,

    /// First-run seeding
    pub seed: SeedConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .habitrack.yml
        let local_config = PathBuf::from(".habitrack.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/habitrack/habitrack.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("habitrack").join("habitrack.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the habit store and the log file
    #[serde(rename = "store-dir")]
    pub store_dir: String,
}

impl StorageConfig {
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.store_dir)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.store_path().join("logs")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        // XDG data directory (~/.local/share/habitrack on Linux)
        let store_dir = dirs::data_dir()
            .map(|d| d.join("habitrack"))
            .unwrap_or_else(|| PathBuf::from(".habitrack"))
            .to_string_lossy()
            .into_owned();

        Self { store_dir }
    }
}

/// Default habit installed on first run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Seed an empty store on first run
    pub enabled: bool,

    pub habit: SeedHabitConfig,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            habit: SeedHabitConfig::default(),
        }
    }
}

/// Shape of the seeded habit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedHabitConfig {
    pub id: String,
    pub name: String,
    pub icon: String,

    /// "check" or "count"
    pub kind: String,

    pub required: bool,

    #[serde(rename = "min-count")]
    pub min_count: Option<u32>,

    pub color: String,
}

impl Default for SeedHabitConfig {
    fn default() -> Self {
        Self {
            id: "surfing".to_string(),
            name: "Surfing".to_string(),
            icon: "🏄‍♀️".to_string(),
            kind: "count".to_string(),
            required: false,
            min_count: None,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl SeedHabitConfig {
    /// Build the habit record to seed
    pub fn to_habit(&self) -> Result<Habit> {
        let kind = match self.kind.to_lowercase().as_str() {
            "check" => HabitKind::check(self.required),
            "count" if self.required => HabitKind::count_at_least(self.min_count.unwrap_or(1)),
            "count" => HabitKind::count(),
            other => return Err(eyre::eyre!("Unknown seed habit kind '{}'. Use: check or count", other)),
        };

        let color = crate::color::normalize_hex(&self.color)
            .ok_or_else(|| eyre::eyre!("Invalid seed habit color '{}'", self.color))?;

        Ok(Habit::new(&self.id, &self.name, kind)
            .with_icon(&self.icon)
            .with_color(color)
            .with_order(0))
    }
}
