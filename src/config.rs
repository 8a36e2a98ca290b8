use crate::error::ConfigError;
use crate::grid::Coord;
use crate::obstacles::{OverlayPolicy, RemovalPolicy};
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Seed for grid generation; entropy is used when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub path: PathConfig,
    #[serde(default)]
    pub obstacles: ObstacleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    /// Upper bound for each axis
    #[serde(default = "default_max_size")]
    pub max_size: i32,
    /// Percent chance (0-100) that a generated cell is blocked
    #[serde(default = "default_probability")]
    pub obstacle_probability: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_start")]
    pub start: Coord,
    #[serde(default = "default_goal")]
    pub goal: Coord,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObstacleConfig {
    #[serde(default)]
    pub overlay: OverlayPolicy,
    #[serde(default)]
    pub removal: RemovalPolicy,
    /// Manual obstacles placed at startup
    #[serde(default)]
    pub initial: Vec<Coord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub enable_action_log: bool,
    #[serde(default = "default_action_log_path")]
    pub action_log_path: String,
}

// Default values
fn default_width() -> i32 { 5 }
fn default_height() -> i32 { 5 }
fn default_max_size() -> i32 { 20 }
fn default_probability() -> f32 { 20.0 }
fn default_start() -> Coord { Coord::new(0, 1) }
fn default_goal() -> Coord { Coord::new(4, 4) }
fn default_log_level() -> String { "info".to_string() }
fn default_action_log_path() -> String { "action_log.json".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            max_size: default_max_size(),
            obstacle_probability: default_probability(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            goal: default_goal(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            enable_action_log: false,
            action_log_path: default_action_log_path(),
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(contents)?)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }

    /// Load configuration from file, or use defaults if it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(ConfigError::Io(_)) => {
                info!("No {} found, using default configuration", path.display());
                Config::default()
            }
            Err(e) => {
                warn!("{}; using default configuration", e);
                Config::default()
            }
        }
    }
}
